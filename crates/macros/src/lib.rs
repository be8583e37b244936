//! polycodec Proc Macros
//!
//! This crate provides `#[derive(Reflect)]`, which emits the static type
//! descriptor the codec uses in place of runtime reflection.
//!
//! # Example
//!
//! ```ignore
//! use polycodec_core::Reflect;
//!
//! #[derive(Reflect, Default)]
//! #[reflect(name = "Msg")]
//! pub struct Msg {
//!     #[tag(binary = "fixed64")]
//!     pub a: i64,
//!
//!     #[tag(json = "subs,omitempty")]
//!     pub b: Vec<Sub>,
//!
//!     // Private fields are described but never encoded
//!     cache: Vec<u8>,
//! }
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes
//!
//! - `#[reflect(name = "Name")]` - Short type name (default: the identifier).
//! - `#[reflect(marshal)]` - Record the `MarshalRepr` hook.
//! - `#[reflect(unmarshal)]` - Record the `UnmarshalRepr` hook.
//!
//! Implementing `MarshalRepr` / `UnmarshalRepr` without the matching
//! attribute leaves the hook unrecorded; the type is encoded by structure.
//! - `#[reflect(no_default)]` - No zero value; `Default` is not required.
//!
//! ## Field Attributes
//!
//! - `#[tag(json = "...")]` - `name[,omitempty]`, or `-` to skip the field.
//! - `#[tag(binary = "...")]` - `fixed32` or `fixed64`.
//! - `#[tag(codec = "...")]` - `unsafe`, `write_empty`, `empty_elements`.

mod parse;
mod reflect;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for static type descriptors
///
/// Implements `polycodec_core::Reflect` for a struct with named fields.
///
/// # Generated Code
///
/// - A `Reflect` impl whose descriptor lists every field in declaration
///   order, with its type, index, visibility and raw tags
/// - A zero value built from `Default` (unless `no_default`)
/// - Hook method signatures for `marshal` / `unmarshal`
///
/// Type parameters get a `Reflect` bound.
#[proc_macro_derive(Reflect, attributes(reflect, tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    reflect::derive_reflect(input).into()
}
