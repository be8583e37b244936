//! Package collaborator
//!
//! A package groups the concrete types registered together and knows each
//! one's TypeURL. The codec depends only on the narrow [`Package`] contract;
//! [`PackageInfo`] is a plain implementation of it.

use crate::error::{SchemaError, SchemaResult};
use crate::reflect::Type;

/// What the codec needs from a package to register its types
pub trait Package {
    /// Package name, for diagnostics
    fn name(&self) -> &str;

    /// Types to register, in registration order
    fn types(&self) -> Vec<Type>;

    /// TypeURL for a member type
    fn type_url_for(&self, ty: Type) -> String;

    /// Whether `ty` (or its pointer-stripped form) belongs to the package
    fn has_type(&self, ty: Type) -> SchemaResult<bool>;
}

/// A named set of types sharing a TypeURL prefix
///
/// TypeURLs are built as `<domain>/<p3_package>.<TypeName>`.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    /// Rust module path the types live in
    pub path: String,
    /// Proto3 package name, without slashes
    pub p3_package: String,
    /// URL authority and path; may be empty
    pub domain: String,
    pub types: Vec<Type>,
}

impl PackageInfo {
    /// Create an empty package
    pub fn new(
        path: impl Into<String>,
        p3_package: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            p3_package: p3_package.into(),
            domain: domain.into(),
            types: Vec::new(),
        }
    }

    /// Add member types
    pub fn with_types(mut self, types: impl IntoIterator<Item = Type>) -> Self {
        self.types.extend(types);
        self
    }

    /// Full proto name of a member type (`<p3_package>.<TypeName>`)
    pub fn full_name_for(&self, ty: Type) -> String {
        format!("{}.{}", self.p3_package, ty.deref().name())
    }
}

impl Package for PackageInfo {
    fn name(&self) -> &str {
        &self.p3_package
    }

    fn types(&self) -> Vec<Type> {
        self.types.clone()
    }

    fn type_url_for(&self, ty: Type) -> String {
        format!("{}/{}", self.domain, self.full_name_for(ty))
    }

    fn has_type(&self, ty: Type) -> SchemaResult<bool> {
        let canonical = ty.deref();
        if self.types.iter().any(|t| t.deref() == canonical) {
            Ok(true)
        } else {
            Err(SchemaError::NotInPackage {
                ty: ty.name(),
                package: self.p3_package.clone(),
            })
        }
    }
}
