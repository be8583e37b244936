//! Error types for registration and lookup
//!
//! Two kinds of failure exist. A [`SchemaError`] is a configuration error: a
//! programmer or schema mistake detected while registering or deriving
//! descriptors. It is returned so that startup code can unwrap it and fail
//! loudly before any traffic is processed. A [`LookupError`] is recoverable:
//! it can be triggered by untrusted wire input and only fails the message
//! being decoded.

/// Configuration error raised while registering or deriving descriptors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Registration attempted after the registry was sealed
    #[error("codec sealed")]
    Sealed,

    /// `autoseal` requested on an already sealed registry
    #[error("already sealed")]
    AlreadySealed,

    #[error("registering pointer-pointers not yet supported: *{0}")]
    PointerToPointer(String),

    #[error("expected a non-interface (got interface pointer): {0}")]
    PointerToInterface(String),

    #[error("expected non-interface non-pointer concrete type, got {0}")]
    NotConcrete(String),

    #[error("TypeInfo already exists for {0}")]
    DuplicateType(String),

    #[error("name <{name}> already registered for {existing}")]
    DuplicateName { name: String, existing: String },

    /// TypeURL without a `/` separator
    #[error("invalid type_url {0:?}, must contain at least one slash and be followed by the full name")]
    InvalidTypeUrl(String),

    /// Hook method with the wrong arity or output kinds
    #[error("{method} on {ty}: {reason}")]
    MalformedHook {
        ty: String,
        method: &'static str,
        reason: String,
    },

    #[error("representative objects cannot be pointers; got {0}")]
    PointerRepr(String),

    /// Kind that has no wire representation
    #[error("unsupported field type {ty} ({kind})")]
    UnsupportedType { ty: String, kind: &'static str },

    #[error("type {ty} is not part of package {package}")]
    NotInPackage { ty: String, package: String },
}

/// Recoverable failure while resolving a polymorphic value's concrete type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unrecognized concrete type name {0}")]
    UnrecognizedName(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result type for registration and descriptor derivation
pub type SchemaResult<T> = Result<T, SchemaError>;
