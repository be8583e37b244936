//! `Reflect` implementations for std types

use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, SystemTime};

use super::{short_type_name, zero_of, Kind, Reflect, Type, TypeDesc};

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident, $name:literal;)*) => {
        $(
            impl Reflect for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::sized::<$ty>($name, Kind::$kind).with_zero(zero_of::<$ty>)
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool, "bool";
    i8 => Int8, "i8";
    i16 => Int16, "i16";
    i32 => Int32, "i32";
    i64 => Int64, "i64";
    i128 => Int128, "i128";
    isize => Int, "isize";
    u8 => Uint8, "u8";
    u16 => Uint16, "u16";
    u32 => Uint32, "u32";
    u64 => Uint64, "u64";
    u128 => Uint128, "u128";
    usize => Uint, "usize";
    f32 => Float32, "f32";
    f64 => Float64, "f64";
    char => Char, "char";
    String => String, "String";
    &'static str => String, "str";
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<Vec<T>>(
            short_type_name(type_name::<Vec<T>>()),
            Kind::Slice(T::type_of()),
        )
        .with_zero(zero_of::<Vec<T>>)
    }
}

// No zero value: `Default` for arrays is not available for every length.
impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<[T; N]>(
            short_type_name(type_name::<[T; N]>()),
            Kind::Array {
                len: N,
                elem: T::type_of(),
            },
        )
    }
}

impl<K: Reflect, V: Reflect> Reflect for HashMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<HashMap<K, V>>(
            short_type_name(type_name::<HashMap<K, V>>()),
            Kind::Map {
                key: K::type_of(),
                value: V::type_of(),
            },
        )
        .with_zero(zero_of::<HashMap<K, V>>)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<BTreeMap<K, V>>(
            short_type_name(type_name::<BTreeMap<K, V>>()),
            Kind::Map {
                key: K::type_of(),
                value: V::type_of(),
            },
        )
        .with_zero(zero_of::<BTreeMap<K, V>>)
    }
}

/// `Box<dyn Trait>` is the interface itself; any other box is a pointer.
impl<T: ?Sized + Reflect> Reflect for Box<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn type_of() -> Type {
        let inner = T::type_of();
        if inner.is_interface() {
            inner
        } else {
            inner.pointer_to()
        }
    }
}

/// A nullable pointer; wrapping something already nullable adds nothing.
impl<T: Reflect> Reflect for Option<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn type_of() -> Type {
        let inner = T::type_of();
        if inner.is_interface() || inner.is_pointer() {
            inner
        } else {
            inner.pointer_to()
        }
    }
}

impl<T: ?Sized + Reflect> Reflect for &'static mut T {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn type_of() -> Type {
        T::type_of().pointer_to()
    }
}

fn unix_epoch() -> Box<dyn Any> {
    Box::new(SystemTime::UNIX_EPOCH)
}

/// Native timestamp; opaque record with a built-in encoding
impl Reflect for SystemTime {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<SystemTime>("SystemTime", Kind::Struct(Vec::new())).with_zero(unix_epoch)
    }
}

/// Native duration; opaque record with a built-in encoding
impl Reflect for Duration {
    fn type_desc() -> TypeDesc {
        TypeDesc::sized::<Duration>("Duration", Kind::Struct(Vec::new()))
            .with_zero(zero_of::<Duration>)
    }
}

impl Reflect for dyn std::error::Error + Send + Sync {
    const IS_INTERFACE: bool = true;

    fn type_desc() -> TypeDesc {
        TypeDesc::interface::<dyn std::error::Error + Send + Sync>("error")
    }
}

/// Declare trait objects as polymorphic (interface) types
///
/// Values of an interface type are encoded together with the TypeURL of
/// their registered concrete type.
///
/// ```ignore
/// pub trait Animal: Send + Sync {}
/// polycodec_core::reflect_interface!(Animal);
///
/// // `Box<dyn Animal>` fields now classify as interfaces.
/// ```
#[macro_export]
macro_rules! reflect_interface {
    ($($tr:ident),+ $(,)?) => {
        $(
            impl $crate::Reflect for dyn $tr {
                const IS_INTERFACE: bool = true;

                fn type_desc() -> $crate::TypeDesc {
                    $crate::TypeDesc::interface::<dyn $tr>(::std::stringify!($tr))
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape {}
    crate::reflect_interface!(Shape);

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(Type::of::<i64>().kind(), Kind::Int64);
        assert_eq!(Type::of::<u8>().kind(), Kind::Uint8);
        assert_eq!(Type::of::<usize>().kind(), Kind::Uint);
        assert_eq!(Type::of::<f32>().kind(), Kind::Float32);
        assert_eq!(Type::of::<String>().kind(), Kind::String);
        assert_eq!(Type::of::<&'static str>().kind(), Kind::String);
    }

    #[test]
    fn test_scalar_zero_values() {
        let zero = Type::of::<i32>().zero().unwrap()();
        assert_eq!(zero.downcast_ref::<i32>(), Some(&0));

        let zero = Type::of::<String>().zero().unwrap()();
        assert_eq!(zero.downcast_ref::<String>().map(String::as_str), Some(""));
    }

    #[test]
    fn test_list_kinds() {
        assert_eq!(Type::of::<Vec<u8>>().kind(), Kind::Slice(Type::of::<u8>()));
        assert_eq!(
            Type::of::<[u16; 4]>().kind(),
            Kind::Array {
                len: 4,
                elem: Type::of::<u16>()
            }
        );
        assert_eq!(Type::of::<Vec<u8>>().name(), "Vec<u8>");
        assert!(Type::of::<[u16; 4]>().zero().is_none());
    }

    #[test]
    fn test_box_and_option_are_pointers() {
        let base = Type::of::<i64>();
        assert_eq!(Type::of::<Box<i64>>(), base.pointer_to());
        assert_eq!(Type::of::<Option<i64>>(), base.pointer_to());
        assert_eq!(Type::of::<Option<Box<i64>>>(), base.pointer_to());
        assert_eq!(Type::of::<&'static mut i64>(), base.pointer_to());
        assert_eq!(Type::of::<Box<Box<i64>>>(), base.pointer_to().pointer_to());
    }

    #[test]
    fn test_boxed_interface_is_interface() {
        let iface = Type::of::<dyn Shape>();
        assert!(iface.is_interface());
        assert_eq!(Type::of::<Box<dyn Shape>>(), iface);
        assert_eq!(Type::of::<Option<Box<dyn Shape>>>(), iface);
        assert_eq!(iface.name(), "Shape");

        // Only an explicit reference makes a pointer-to-interface
        let ptr = Type::of::<&'static mut dyn Shape>();
        assert!(ptr.is_pointer());
        assert_eq!(ptr.deref(), iface);
    }

    #[test]
    fn test_error_type() {
        let err = Type::error();
        assert!(err.is_interface());
        assert_eq!(err, Type::of::<dyn std::error::Error + Send + Sync>());
        assert_ne!(err, Type::of::<String>());
    }

    #[test]
    fn test_native_time_types() {
        assert!(matches!(Type::of::<SystemTime>().kind(), Kind::Struct(ref f) if f.is_empty()));
        assert_eq!(Type::of::<Duration>().name(), "Duration");
        let zero = Type::of::<SystemTime>().zero().unwrap()();
        assert_eq!(
            zero.downcast_ref::<SystemTime>(),
            Some(&SystemTime::UNIX_EPOCH)
        );
    }
}
