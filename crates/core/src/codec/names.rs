//! TypeURL to short-name resolution
//!
//! A TypeURL has the form `<authority-and-path>/<package>.<TypeName>`. The
//! registry indexes registered types by the short name after the final `/`.

use crate::error::{SchemaError, SchemaResult};

/// Proto name of the standard timestamp message
pub const TIMESTAMP_NAME: &str = "google.protobuf.Timestamp";

/// Proto name of the standard duration message
pub const DURATION_NAME: &str = "google.protobuf.Duration";

/// Derive the short name from a TypeURL
///
/// # Errors
/// [`SchemaError::InvalidTypeUrl`] if the URL contains no `/`.
///
/// # Example
/// ```
/// use polycodec_core::codec::name_from_url;
///
/// assert_eq!(name_from_url("acme.io/demo.Msg").unwrap(), "demo.Msg");
/// assert!(name_from_url("demo.Msg").is_err());
/// ```
pub fn name_from_url(type_url: &str) -> SchemaResult<&str> {
    match type_url.rsplit_once('/') {
        Some((_, name)) => Ok(name),
        None => Err(SchemaError::InvalidTypeUrl(type_url.to_string())),
    }
}
