//! Per-type descriptor records
//!
//! A [`TypeInfo`] is built once per canonical type and cached by the
//! [`Codec`](super::Codec) for its whole lifetime. Callers receive shared,
//! read-only views.

use std::fmt;

use bitflags::bitflags;

use super::typ3::{typ3_of, Typ3};
use crate::error::SchemaResult;
use crate::reflect::{Type, ZeroFn};

bitflags! {
    /// Built-in encodings that replace structural derivation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WellKnownFlags: u8 {
        /// Encoded with built-in binary functions
        const BINARY = 0x01;
        /// Encoded with built-in JSON functions
        const JSON = 0x02;
        /// The JSON Any representation uses the "value" field
        const JSON_ANY_VALUE = 0x04;
    }
}

/// Descriptor for a canonical (pointer-stripped) type
#[derive(Clone)]
pub struct TypeInfo {
    /// The described type
    pub ty: Type,
    /// Pointer-wrapped form of `ty`
    pub ptr_to_type: Type,
    /// Zero value constructor for default-initialization during decode
    pub zero: Option<ZeroFn>,
    pub concrete: ConcreteInfo,
    pub structure: StructInfo,
}

/// Concrete-type metadata
#[derive(Debug, Clone, Default)]
pub struct ConcreteInfo {
    /// Registered with `register_*`
    pub registered: bool,
    /// Decode into the pointer form if possible
    pub pointer_preferred: bool,
    /// `<domain and path>/<package>.<Type name>`; only set when registered
    pub type_url: Option<String>,
    /// Representative type of the marshal hook, if any
    pub marshal_repr: Option<Type>,
    /// Representative type of the unmarshal hook, if any
    pub unmarshal_repr: Option<Type>,
    pub well_known: WellKnownFlags,
    /// Element type of an array or slice; a key into the owning codec
    pub elem: Option<Type>,
}

/// Structural metadata; empty unless the type is a record
#[derive(Debug, Clone, Default)]
pub struct StructInfo {
    pub fields: Vec<FieldInfo>,
}

/// A retained record field
#[derive(Clone)]
pub struct FieldInfo {
    /// Field name, for diagnostics
    pub name: &'static str,
    pub ty: Type,
    /// Declaration-order index in the record (for decoding)
    pub index: usize,
    /// Could be absent for pointers, unlike `TypeInfo::zero`
    pub zero: Option<ZeroFn>,
    /// Encode as repeated length-delimited entries
    pub unpacked_list: bool,
    pub options: FieldOptions,
}

/// Per-field encoding options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// (JSON) field name
    pub json_name: String,
    /// (JSON) omitempty
    pub json_omit_empty: bool,
    /// (Binary) encode as fixed64
    pub bin_fixed64: bool,
    /// (Binary) encode as fixed32
    pub bin_fixed32: bool,
    /// (Binary) 1-based field number, max 1<<29-1
    pub bin_field_num: u32,

    /// e.g. if this field is a float
    pub is_unsafe: bool,
    /// Write empty structs and lists (default false except for pointers)
    pub write_empty: bool,
    /// List elements are never nil; decode 0x00 as an empty element
    pub empty_elements: bool,
    /// Decode Any timestamp and duration to the proto types
    pub use_google_types: bool,
}

impl TypeInfo {
    /// Wire representation of this type under the given field options
    pub fn typ3(&self, opts: &FieldOptions) -> SchemaResult<Typ3> {
        typ3_of(self.ty, opts)
    }

    /// Whether the type is registered for polymorphic decode
    pub fn is_registered(&self) -> bool {
        self.concrete.registered
    }

    /// Whether the type has a marshal hook
    pub fn is_marshaler(&self) -> bool {
        self.concrete.marshal_repr.is_some()
    }

    /// Whether the type has an unmarshal hook
    pub fn is_unmarshaler(&self) -> bool {
        self.concrete.unmarshal_repr.is_some()
    }

    pub fn is_binary_well_known(&self) -> bool {
        self.concrete.well_known.contains(WellKnownFlags::BINARY)
    }

    pub fn is_json_well_known(&self) -> bool {
        self.concrete.well_known.contains(WellKnownFlags::JSON)
    }

    pub fn is_json_any_value(&self) -> bool {
        self.concrete.well_known.contains(WellKnownFlags::JSON_ANY_VALUE)
    }

    /// Look up a retained field by name
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.structure.fields.iter().find(|f| f.name == name)
    }
}

impl FieldInfo {
    /// Wire representation of this field's value
    ///
    /// Pointer fields take the representation of their pointee.
    pub fn typ3(&self) -> SchemaResult<Typ3> {
        typ3_of(self.ty.deref(), &self.options)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("index", &self.index)
            .field("unpacked_list", &self.unpacked_list)
            .field("options", &self.options)
            .finish()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("concrete", &self.concrete)
            .field("fields", &self.structure.fields)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = |t: Option<Type>| t.map(|t| t.name()).unwrap_or_default();

        write!(f, "TypeInfo{{Type:{},", self.ty)?;
        if self.concrete.registered {
            write!(f, "Registered:true,")?;
            write!(f, "PointerPreferred:{},", self.concrete.pointer_preferred)?;
            write!(
                f,
                "TypeURL:\"{}\",",
                self.concrete.type_url.as_deref().unwrap_or_default()
            )?;
        } else {
            write!(f, "Registered:false,")?;
        }
        write!(f, "MarshalReprType:\"{}\",", repr(self.concrete.marshal_repr))?;
        write!(f, "UnmarshalReprType:\"{}\",", repr(self.concrete.unmarshal_repr))?;
        if !self.structure.fields.is_empty() {
            let names: Vec<_> = self
                .structure
                .fields
                .iter()
                .map(|field| format!("{}#{}", field.name, field.options.bin_field_num))
                .collect();
            write!(f, "Fields:[{}],", names.join(" "))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(ty: Type) -> TypeInfo {
        TypeInfo {
            ty,
            ptr_to_type: ty.pointer_to(),
            zero: ty.zero(),
            concrete: ConcreteInfo::default(),
            structure: StructInfo::default(),
        }
    }

    #[test]
    fn test_display_unregistered() {
        let info = info(Type::of::<i64>());
        assert_eq!(
            info.to_string(),
            "TypeInfo{Type:i64,Registered:false,MarshalReprType:\"\",UnmarshalReprType:\"\",}"
        );
    }

    #[test]
    fn test_display_registered() {
        let mut info = info(Type::of::<String>());
        info.concrete.registered = true;
        info.concrete.pointer_preferred = true;
        info.concrete.type_url = Some("acme.io/demo.Name".to_string());
        let text = info.to_string();
        assert!(text.contains("Registered:true,"));
        assert!(text.contains("PointerPreferred:true,"));
        assert!(text.contains("TypeURL:\"acme.io/demo.Name\","));
    }

    #[test]
    fn test_well_known_flags() {
        let mut info = info(Type::of::<i64>());
        assert!(!info.is_binary_well_known());
        info.concrete.well_known = WellKnownFlags::BINARY | WellKnownFlags::JSON_ANY_VALUE;
        assert!(info.is_binary_well_known());
        assert!(!info.is_json_well_known());
        assert!(info.is_json_any_value());
    }

    #[test]
    fn test_typ3_delegates_to_classifier() {
        let info = info(Type::of::<u64>());
        let opts = FieldOptions {
            bin_fixed64: true,
            ..Default::default()
        };
        assert_eq!(info.typ3(&FieldOptions::default()), Ok(Typ3::Varint));
        assert_eq!(info.typ3(&opts), Ok(Typ3::Fixed64));
    }
}
