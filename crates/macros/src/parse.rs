//! Attribute parsing for the Reflect derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Generics, Ident, Type, Visibility};

/// Parsed #[reflect(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(reflect), supports(struct_named))]
pub struct ReflectArgs {
    /// Struct identifier
    pub ident: Ident,

    pub generics: Generics,

    /// Struct fields
    pub data: darling::ast::Data<(), ReflectFieldArgs>,

    /// Short type name (defaults to the struct identifier)
    #[darling(default)]
    pub name: Option<String>,

    /// Record the `MarshalRepr` hook
    #[darling(default)]
    pub marshal: bool,

    /// Record the `UnmarshalRepr` hook
    #[darling(default)]
    pub unmarshal: bool,

    /// Don't derive a zero value from `Default`
    #[darling(default)]
    pub no_default: bool,
}

/// Parsed #[tag(...)] attributes on a field
///
/// Strings are passed through verbatim and parsed at runtime.
#[derive(Debug, FromField)]
#[darling(attributes(tag))]
pub struct ReflectFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Field visibility; only `pub` fields are encoded
    pub vis: Visibility,

    /// `json` namespace, e.g. `"name,omitempty"` or `"-"`
    #[darling(default)]
    pub json: Option<String>,

    /// `binary` namespace, e.g. `"fixed64"`
    #[darling(default)]
    pub binary: Option<String>,

    /// Protocol namespace, e.g. `"unsafe,write_empty"`
    #[darling(default)]
    pub codec: Option<String>,
}

impl ReflectFieldArgs {
    /// Check if the field is public
    pub fn is_exported(&self) -> bool {
        matches!(self.vis, Visibility::Public(_))
    }
}

/// Parse a DeriveInput into ReflectArgs
pub fn parse_reflect(input: &DeriveInput) -> darling::Result<ReflectArgs> {
    ReflectArgs::from_derive_input(input)
}
