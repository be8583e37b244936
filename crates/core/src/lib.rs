//! polycodec - type registry and wire-schema derivation
//!
//! This crate derives the per-type metadata a binary/JSON encoder needs to
//! walk values: ordered field lists with field numbers and options, wire
//! types, custom representation hooks, and a registry of concrete types for
//! decoding polymorphic (interface-typed) values by TypeURL.
//!
//! # Modules
//!
//! - [`reflect`] - static type descriptors (`#[derive(Reflect)]`)
//! - [`codec`] - the [`Codec`] registry and descriptor derivation
//! - [`config`] - TOML configuration
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - configuration and lookup errors

// Allow the crate to refer to itself as `polycodec_core` for proc macro compatibility
extern crate self as polycodec_core;

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod reflect;

// Re-export the derive next to the trait it implements
pub use polycodec_macros::Reflect;

pub use reflect::{
    short_type_name, zero_of, BoxError, Kind, Method, Reflect, StructField, Tag, Type, TypeDesc,
    ZeroFn,
};

pub use codec::{
    name_from_url, typ3_of, Codec, ConcreteInfo, FieldInfo, FieldOptions, MarshalRepr, Package,
    PackageInfo, SealState, StdWellKnown, StructInfo, Typ3, TypeInfo, UnmarshalRepr, WellKnown,
    WellKnownFlags,
};

pub use config::{ConfigError, ConfigResult, CodecConfig};
pub use error::{LookupError, SchemaError, SchemaResult};
