//! Custom representation hooks
//!
//! A type may choose to be encoded through an intermediate "representative"
//! type instead of its own structure. It implements [`MarshalRepr`] and/or
//! [`UnmarshalRepr`] and opts in with `#[reflect(marshal, unmarshal)]`, which
//! records the hook signatures in its descriptor table.
//!
//! This module only detects and validates those signatures. Conversion
//! itself is performed by the encoder/decoder.

use crate::error::{SchemaError, SchemaResult};
use crate::reflect::{BoxError, Method, Reflect, Type};

/// Method name recorded for the marshal hook
pub const MARSHAL_METHOD: &str = "marshal_repr";

/// Method name recorded for the unmarshal hook
pub const UNMARSHAL_METHOD: &str = "unmarshal_repr";

/// Convert a value into its representative form before encoding
///
/// Implementing the trait alone does not make the codec use it: the type
/// must also opt in with `#[reflect(marshal)]` (or list
/// [`Method::marshal`] in a hand-written descriptor). Without that the type
/// is encoded by its structure.
pub trait MarshalRepr: Reflect + Sized {
    /// Representative type; must not be a pointer
    type Repr: Reflect;

    fn marshal_repr(&self) -> Result<Self::Repr, BoxError>;
}

/// Rebuild a value from its representative form after decoding
///
/// Detected only when opted in with `#[reflect(unmarshal)]`, as for
/// [`MarshalRepr`].
pub trait UnmarshalRepr: Reflect + Sized {
    /// Representative type; must not be a pointer
    type Repr: Reflect;

    fn unmarshal_repr(&mut self, repr: Self::Repr) -> Result<(), BoxError>;
}

impl Method {
    /// Signature of `T::marshal_repr`: `(T) -> (Repr, error)`
    pub fn marshal<T: MarshalRepr>() -> Self {
        Self {
            name: MARSHAL_METHOD,
            inputs: vec![T::type_of()],
            outputs: vec![<T::Repr as Reflect>::type_of(), Type::error()],
        }
    }

    /// Signature of `T::unmarshal_repr`: `(*T, Repr) -> (error)`
    pub fn unmarshal<T: UnmarshalRepr>() -> Self {
        Self {
            name: UNMARSHAL_METHOD,
            inputs: vec![T::type_of().pointer_to(), <T::Repr as Reflect>::type_of()],
            outputs: vec![Type::error()],
        }
    }
}

/// Hooks detected on a type, as representative types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hooks {
    pub marshal_repr: Option<Type>,
    pub unmarshal_repr: Option<Type>,
}

/// Detect and validate the representation hooks declared on a type
pub fn detect_hooks(ty: Type) -> SchemaResult<Hooks> {
    let mut hooks = Hooks::default();
    for method in ty.methods() {
        match method.name {
            MARSHAL_METHOD => hooks.marshal_repr = Some(marshal_repr_type(ty, &method)?),
            UNMARSHAL_METHOD => hooks.unmarshal_repr = Some(unmarshal_repr_type(ty, &method)?),
            _ => {}
        }
    }
    Ok(hooks)
}

/// Validate a marshal hook and extract its representative type
///
/// Expected shape: one input (the receiver), two outputs, the second being
/// the error type.
pub fn marshal_repr_type(ty: Type, method: &Method) -> SchemaResult<Type> {
    let malformed = |reason: String| SchemaError::MalformedHook {
        ty: ty.name(),
        method: MARSHAL_METHOD,
        reason,
    };

    if method.inputs.len() != 1 {
        return Err(malformed(format!(
            "should have 1 input parameter (including receiver); got {}",
            method.inputs.len()
        )));
    }
    if method.outputs.len() != 2 {
        return Err(malformed(format!(
            "should have 2 output parameters; got {}",
            method.outputs.len()
        )));
    }
    if method.outputs[1] != Type::error() {
        return Err(malformed(format!(
            "should have second output parameter of error type, got {}",
            method.outputs[1]
        )));
    }

    let repr = method.outputs[0];
    if repr.is_pointer() {
        return Err(SchemaError::PointerRepr(repr.name()));
    }
    Ok(repr)
}

/// Validate an unmarshal hook and extract its representative type
///
/// Expected shape: two inputs (a pointer receiver and the representative
/// value) and one error output.
pub fn unmarshal_repr_type(ty: Type, method: &Method) -> SchemaResult<Type> {
    let malformed = |reason: String| SchemaError::MalformedHook {
        ty: ty.name(),
        method: UNMARSHAL_METHOD,
        reason,
    };

    if method.inputs.len() != 2 {
        return Err(malformed(format!(
            "should have 2 input parameters (including receiver); got {}",
            method.inputs.len()
        )));
    }
    if !method.inputs[0].is_pointer() {
        return Err(malformed(format!(
            "first input parameter should be pointer type but got {}",
            method.inputs[0]
        )));
    }
    if method.outputs.len() != 1 {
        return Err(malformed(format!(
            "should have 1 output parameter; got {}",
            method.outputs.len()
        )));
    }
    if method.outputs[0] != Type::error() {
        return Err(malformed(format!(
            "should have first output parameter of error type, got {}",
            method.outputs[0]
        )));
    }

    let repr = method.inputs[1];
    if repr.is_pointer() {
        return Err(SchemaError::PointerRepr(repr.name()));
    }
    Ok(repr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Kind, TypeDesc};
    use crate::Reflect;

    /// Stored as its decimal string
    #[derive(Debug, Default, PartialEq)]
    struct Amount(u64);

    impl Reflect for Amount {
        fn type_desc() -> TypeDesc {
            TypeDesc::sized::<Amount>("Amount", Kind::Struct(Vec::new()))
                .with_methods(vec![Method::marshal::<Amount>(), Method::unmarshal::<Amount>()])
        }
    }

    impl MarshalRepr for Amount {
        type Repr = String;

        fn marshal_repr(&self) -> Result<String, BoxError> {
            Ok(self.0.to_string())
        }
    }

    impl UnmarshalRepr for Amount {
        type Repr = String;

        fn unmarshal_repr(&mut self, repr: String) -> Result<(), BoxError> {
            self.0 = repr.parse()?;
            Ok(())
        }
    }

    fn method(name: &'static str, inputs: Vec<Type>, outputs: Vec<Type>) -> Method {
        Method {
            name,
            inputs,
            outputs,
        }
    }

    #[test]
    fn test_detect_both_hooks() {
        let hooks = detect_hooks(Type::of::<Amount>()).unwrap();
        assert_eq!(hooks.marshal_repr, Some(Type::of::<String>()));
        assert_eq!(hooks.unmarshal_repr, Some(Type::of::<String>()));
    }

    #[test]
    fn test_no_hooks() {
        assert_eq!(detect_hooks(Type::of::<i64>()).unwrap(), Hooks::default());
    }

    #[derive(Reflect, Default)]
    struct Quiet {
        pub v: u64,
    }

    impl MarshalRepr for Quiet {
        type Repr = String;

        fn marshal_repr(&self) -> Result<String, BoxError> {
            Ok(self.v.to_string())
        }
    }

    #[derive(Reflect, Default)]
    #[reflect(marshal)]
    struct Loud {
        pub v: u64,
    }

    impl MarshalRepr for Loud {
        type Repr = String;

        fn marshal_repr(&self) -> Result<String, BoxError> {
            Ok(self.v.to_string())
        }
    }

    #[test]
    fn test_hooks_require_opt_in() {
        assert_eq!(detect_hooks(Type::of::<Quiet>()).unwrap(), Hooks::default());

        let hooks = detect_hooks(Type::of::<Loud>()).unwrap();
        assert_eq!(hooks.marshal_repr, Some(Type::of::<String>()));
        assert_eq!(hooks.unmarshal_repr, None);
    }

    #[test]
    fn test_hook_conversion_roundtrip() {
        let repr = Amount(42).marshal_repr().unwrap();
        let mut decoded = Amount::default();
        decoded.unmarshal_repr(repr).unwrap();
        assert_eq!(decoded, Amount(42));
        assert!(decoded.unmarshal_repr("not a number".to_string()).is_err());
    }

    #[test]
    fn test_marshal_wrong_arity() {
        let ty = Type::of::<Amount>();
        let m = method(MARSHAL_METHOD, vec![ty, ty], vec![Type::of::<String>(), Type::error()]);
        assert!(matches!(
            marshal_repr_type(ty, &m),
            Err(SchemaError::MalformedHook { .. })
        ));

        let m = method(MARSHAL_METHOD, vec![ty], vec![Type::of::<String>()]);
        assert!(matches!(
            marshal_repr_type(ty, &m),
            Err(SchemaError::MalformedHook { .. })
        ));
    }

    #[test]
    fn test_marshal_second_output_must_be_error() {
        let ty = Type::of::<Amount>();
        let m = method(
            MARSHAL_METHOD,
            vec![ty],
            vec![Type::of::<String>(), Type::of::<String>()],
        );
        let err = marshal_repr_type(ty, &m).unwrap_err();
        assert!(err.to_string().contains("error type"));
    }

    #[test]
    fn test_marshal_pointer_repr_rejected() {
        let ty = Type::of::<Amount>();
        let m = method(
            MARSHAL_METHOD,
            vec![ty],
            vec![Type::of::<Box<String>>(), Type::error()],
        );
        assert!(matches!(
            marshal_repr_type(ty, &m),
            Err(SchemaError::PointerRepr(_))
        ));
    }

    #[test]
    fn test_unmarshal_requires_pointer_receiver() {
        let ty = Type::of::<Amount>();
        let m = method(
            UNMARSHAL_METHOD,
            vec![ty, Type::of::<String>()],
            vec![Type::error()],
        );
        let err = unmarshal_repr_type(ty, &m).unwrap_err();
        assert!(err.to_string().contains("pointer type"));
    }

    #[test]
    fn test_unmarshal_wrong_outputs() {
        let ty = Type::of::<Amount>();
        let m = method(
            UNMARSHAL_METHOD,
            vec![ty.pointer_to(), Type::of::<String>()],
            vec![Type::error(), Type::error()],
        );
        assert!(matches!(
            unmarshal_repr_type(ty, &m),
            Err(SchemaError::MalformedHook { .. })
        ));
    }

    #[test]
    fn test_unmarshal_pointer_repr_rejected() {
        let ty = Type::of::<Amount>();
        let m = method(
            UNMARSHAL_METHOD,
            vec![ty.pointer_to(), Type::of::<Option<String>>()],
            vec![Type::error()],
        );
        assert!(matches!(
            unmarshal_repr_type(ty, &m),
            Err(SchemaError::PointerRepr(_))
        ));
    }
}
