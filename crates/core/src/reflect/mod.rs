//! Static type descriptors
//!
//! Rust has no universal runtime reflection, so every type the codec can
//! describe carries a static descriptor table instead. The table is produced
//! by `#[derive(Reflect)]` for records and by the impls in [`impls`] for std
//! types, and is consumed by the registry when it builds a [`TypeInfo`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────────┐
//! │ #[derive(Reflect)]       │      │ impls.rs                     │
//! │   struct Msg { .. }      │      │   i64, String, Vec<T>, ..    │
//! └────────────┬─────────────┘      └───────────────┬──────────────┘
//!              │  Reflect::type_desc() -> TypeDesc  │
//!              └────────────────┬───────────────────┘
//!                               ▼
//!              ┌──────────────────────────────────┐
//!              │ Type (Copy handle)               │
//!              │   TypeId + desc fn + ptr depth   │
//!              └──────────────────────────────────┘
//! ```
//!
//! Pointer indirection is not a separate Rust type here. A [`Type`] carries a
//! depth counter, so `Box<Msg>`, `Option<Msg>` and `&'static mut Msg` all
//! describe "pointer to `Msg`" and strip to the same canonical type.
//!
//! [`TypeInfo`]: crate::codec::TypeInfo

mod impls;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Constructor for a type's zero value
pub type ZeroFn = fn() -> Box<dyn Any>;

/// Error value returned by representation hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Zero value constructor backed by `Default`
pub fn zero_of<T: Default + 'static>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Types that can describe their own shape to the codec
///
/// Implemented by `#[derive(Reflect)]` for named-field structs. Polymorphic
/// (interface) types are declared with [`reflect_interface!`](crate::reflect_interface).
pub trait Reflect: 'static {
    /// Polymorphic (interface) type; set by `reflect_interface!`
    const IS_INTERFACE: bool = false;

    /// Build the static descriptor table for this type
    fn type_desc() -> TypeDesc;

    /// Get a handle for this type
    ///
    /// Never runs a descriptor function, so records may refer to
    /// themselves through pointers.
    fn type_of() -> Type {
        if Self::IS_INTERFACE {
            Type::interface::<Self>(Self::type_desc)
        } else {
            Type::new::<Self>(Self::type_desc)
        }
    }
}

// ============================================================================
// Type handle
// ============================================================================

/// Lightweight, copyable handle to a described type
///
/// Equality and hashing use the Rust `TypeId` of the base type together with
/// the pointer depth, so the handle is suitable as a map key.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    desc: fn() -> TypeDesc,
    depth: u8,
    interface: bool,
}

impl Type {
    /// Create a handle for `T` backed by a descriptor function
    pub fn new<T: ?Sized + 'static>(desc: fn() -> TypeDesc) -> Self {
        Self {
            id: TypeId::of::<T>(),
            desc,
            depth: 0,
            interface: false,
        }
    }

    /// Create a handle for a polymorphic (interface) type
    pub fn interface<T: ?Sized + 'static>(desc: fn() -> TypeDesc) -> Self {
        Self {
            interface: true,
            ..Self::new::<T>(desc)
        }
    }

    /// Get the handle for a reflected type
    pub fn of<T: ?Sized + Reflect>() -> Self {
        T::type_of()
    }

    /// The error-like type expected as the last output of a hook method
    pub fn error() -> Self {
        Self::of::<dyn std::error::Error + Send + Sync>()
    }

    /// Wrap this type in one level of pointer indirection
    pub fn pointer_to(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// Strip all pointer indirection (the canonical type)
    pub fn deref(self) -> Self {
        Self { depth: 0, ..self }
    }

    /// Whether this is a pointer type
    pub fn is_pointer(&self) -> bool {
        self.depth > 0
    }

    /// Whether this is a polymorphic (interface) type
    pub fn is_interface(&self) -> bool {
        !self.is_pointer() && self.interface
    }

    /// Number of pointer levels
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Descriptor of the base (pointer-stripped) type
    pub fn desc(&self) -> TypeDesc {
        (self.desc)()
    }

    /// Kind of this type, taking pointer depth into account
    pub fn kind(&self) -> Kind {
        if self.is_pointer() {
            Kind::Pointer(Self {
                depth: self.depth - 1,
                ..*self
            })
        } else {
            self.desc().kind
        }
    }

    /// Element type of a pointer, array or slice
    pub fn elem(&self) -> Option<Type> {
        match self.kind() {
            Kind::Pointer(elem) | Kind::Slice(elem) | Kind::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Short type name, prefixed with `*` per pointer level
    pub fn name(&self) -> String {
        format!("{}{}", "*".repeat(self.depth as usize), self.desc().name)
    }

    /// Fully-qualified Rust type path of the base type
    pub fn path(&self) -> &'static str {
        self.desc().path
    }

    /// In-memory size in bytes
    pub fn size(&self) -> usize {
        if self.is_pointer() {
            std::mem::size_of::<usize>()
        } else {
            self.desc().size
        }
    }

    /// Zero value constructor; pointers have none (nil)
    pub fn zero(&self) -> Option<ZeroFn> {
        if self.is_pointer() {
            None
        } else {
            self.desc().zero
        }
    }

    /// Declared hook methods of the base type
    pub fn methods(&self) -> Vec<Method> {
        self.desc().methods
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.depth == other.depth
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.depth.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Descriptor tables
// ============================================================================

/// The shape of a type
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Bool,
    /// Platform-size signed integer (`isize`)
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    /// Platform-size unsigned integer (`usize`)
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Float32,
    Float64,
    Char,
    String,
    /// Fixed-length array
    Array { len: usize, elem: Type },
    /// Growable sequence
    Slice(Type),
    /// Associative map
    Map { key: Type, value: Type },
    /// Record with declared fields
    Struct(Vec<StructField>),
    /// Polymorphic value resolved through the registry
    Interface,
    Pointer(Type),
}

impl Kind {
    /// Short lowercase name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Int128 => "int128",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uint128 => "uint128",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Array { .. } => "array",
            Kind::Slice(_) => "slice",
            Kind::Map { .. } => "map",
            Kind::Struct(_) => "struct",
            Kind::Interface => "interface",
            Kind::Pointer(_) => "pointer",
        }
    }

    /// Whether this is an array or slice
    pub fn is_list(&self) -> bool {
        matches!(self, Kind::Array { .. } | Kind::Slice(_))
    }
}

/// Static description of a type
#[derive(Debug, Clone)]
pub struct TypeDesc {
    /// Short name (e.g. "Msg")
    pub name: &'static str,
    /// Full Rust path (e.g. "my_crate::demo::Msg")
    pub path: &'static str,
    pub kind: Kind,
    /// In-memory size in bytes
    pub size: usize,
    /// Zero value constructor for default-initialization during decode
    pub zero: Option<ZeroFn>,
    /// Declared hook methods
    pub methods: Vec<Method>,
}

impl TypeDesc {
    /// Describe a sized type
    pub fn sized<T: 'static>(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            path: std::any::type_name::<T>(),
            kind,
            size: std::mem::size_of::<T>(),
            zero: None,
            methods: Vec::new(),
        }
    }

    /// Describe a polymorphic (trait object) type
    pub fn interface<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            name,
            path: std::any::type_name::<T>(),
            kind: Kind::Interface,
            size: std::mem::size_of::<&T>(),
            zero: None,
            methods: Vec::new(),
        }
    }

    /// Set the zero value constructor
    pub fn with_zero(mut self, zero: ZeroFn) -> Self {
        self.zero = Some(zero);
        self
    }

    /// Set the declared hook methods
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }
}

/// A declared record field
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: &'static str,
    pub ty: Type,
    /// Declaration-order index
    pub index: usize,
    /// Whether the field is public
    pub exported: bool,
    pub tag: Tag,
}

/// Raw per-field configuration tags, one string per namespace
///
/// Strings are kept verbatim; they are parsed when the field list is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tag {
    /// `json` namespace: `name[,omitempty]` or `-`
    pub json: Option<&'static str>,
    /// `binary` namespace: `fixed32` or `fixed64`
    pub binary: Option<&'static str>,
    /// Protocol namespace: comma-separated flags
    pub codec: Option<&'static str>,
}

impl Tag {
    /// Look up a namespace; missing namespaces read as the empty string
    pub fn get(&self, namespace: &str) -> &'static str {
        let value = match namespace {
            "json" => self.json,
            "binary" => self.binary,
            "codec" => self.codec,
            _ => None,
        };
        value.unwrap_or("")
    }
}

/// Signature of a declared method
///
/// The receiver is the first input.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: &'static str,
    pub inputs: Vec<Type>,
    pub outputs: Vec<Type>,
}

/// Strip module paths from the outermost segment of a type path
///
/// `alloc::vec::Vec<u8>` becomes `Vec<u8>`.
pub fn short_type_name(path: &'static str) -> &'static str {
    let head_end = path.find('<').unwrap_or(path.len());
    match path[..head_end].rfind("::") {
        Some(pos) => &path[pos + 2..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("alloc::vec::Vec<u8>"), "Vec<u8>");
        assert_eq!(short_type_name("i64"), "i64");
        assert_eq!(
            short_type_name("std::collections::HashMap<alloc::string::String, u8>"),
            "HashMap<alloc::string::String, u8>"
        );
    }

    #[test]
    fn test_pointer_depth() {
        let base = Type::of::<i64>();
        let ptr = base.pointer_to();
        let ptr_ptr = ptr.pointer_to();

        assert!(!base.is_pointer());
        assert!(ptr.is_pointer());
        assert_ne!(base, ptr);
        assert_ne!(ptr, ptr_ptr);
        assert_eq!(ptr_ptr.deref(), base);
        assert_eq!(ptr_ptr.elem(), Some(ptr));
        assert_eq!(ptr.name(), "*i64");
    }

    #[test]
    fn test_pointer_kind_wraps_elem() {
        let ptr = Type::of::<u32>().pointer_to();
        match ptr.kind() {
            Kind::Pointer(elem) => assert_eq!(elem, Type::of::<u32>()),
            other => panic!("Expected Pointer, got {:?}", other),
        }
        assert!(ptr.zero().is_none());
    }

    mod derived {
        use crate::Reflect;

        #[derive(Reflect, Default)]
        #[reflect(name = "Order")]
        pub struct Purchase {
            #[tag(json = "id,omitempty", binary = "fixed64")]
            pub id: u64,
            pub items: Vec<String>,
            #[tag(codec = "unsafe")]
            pub price: f64,
            cache: Option<String>,
        }

        #[derive(Reflect, Default)]
        pub struct Page<T> {
            pub entries: Vec<T>,
        }

        #[derive(Reflect, Default)]
        pub struct Node {
            pub value: i64,
            pub next: Option<Box<Node>>,
            pub children: Vec<Node>,
        }

        #[derive(Reflect)]
        #[reflect(no_default)]
        pub struct Handle {
            pub r#type: u8,
        }
    }

    #[test]
    fn test_derived_struct_fields() {
        let ty = Type::of::<derived::Purchase>();
        assert_eq!(ty.name(), "Order");
        assert!(ty.zero().is_some());

        let Kind::Struct(fields) = ty.kind() else {
            panic!("Expected Struct, got {:?}", ty.kind());
        };
        let summary: Vec<_> = fields.iter().map(|f| (f.name, f.index, f.exported)).collect();
        assert_eq!(
            summary,
            vec![
                ("id", 0, true),
                ("items", 1, true),
                ("price", 2, true),
                ("cache", 3, false),
            ]
        );
        assert_eq!(fields[0].tag.get("json"), "id,omitempty");
        assert_eq!(fields[0].tag.get("binary"), "fixed64");
        assert_eq!(fields[1].ty, Type::of::<Vec<String>>());
        assert_eq!(fields[2].tag.get("codec"), "unsafe");
        assert_eq!(fields[3].ty, Type::of::<String>().pointer_to());
    }

    #[test]
    fn test_derived_generic_and_no_default() {
        let page = Type::of::<derived::Page<i32>>();
        assert_eq!(page.name(), "Page");
        assert_ne!(page, Type::of::<derived::Page<i64>>());

        let handle = Type::of::<derived::Handle>();
        assert!(handle.zero().is_none());
        let Kind::Struct(fields) = handle.kind() else {
            panic!("Expected Struct");
        };
        assert_eq!(fields[0].name, "type");
    }

    #[test]
    fn test_self_referential_struct() {
        let ty = Type::of::<derived::Node>();
        assert!(!ty.is_interface());

        let Kind::Struct(fields) = ty.kind() else {
            panic!("Expected Struct, got {:?}", ty.kind());
        };
        assert_eq!(fields[1].ty, ty.pointer_to());
        assert_eq!(fields[2].ty.elem(), Some(ty));
    }

    #[test]
    fn test_tag_get() {
        let tag = Tag {
            json: Some("a,omitempty"),
            binary: None,
            codec: Some("unsafe"),
        };
        assert_eq!(tag.get("json"), "a,omitempty");
        assert_eq!(tag.get("binary"), "");
        assert_eq!(tag.get("codec"), "unsafe");
        assert_eq!(tag.get("yaml"), "");
    }
}
