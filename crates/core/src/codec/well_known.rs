//! Well-known types
//!
//! Some types bypass structural derivation and use a built-in encoding
//! instead. Deciding which ones is the job of a [`WellKnown`] collaborator;
//! the codec only records its answers on each descriptor.

use std::time::{Duration, SystemTime};

use crate::reflect::{Kind, Type};
use crate::Reflect;

/// Predicates deciding which types use built-in encodings
///
/// The codec calls these while holding its registry lock. Implementations
/// must not call back into the [`Codec`](super::Codec); the lock is not
/// reentrant and the call would deadlock.
pub trait WellKnown: Send + Sync {
    /// Encoded with built-in binary functions
    fn is_binary_well_known(&self, ty: Type) -> bool;

    /// Encoded with built-in JSON functions
    fn is_json_well_known(&self, ty: Type) -> bool;

    /// The JSON Any representation uses the "value" field instead of
    /// embedding `@type` next to the value's own fields
    fn is_json_any_value(&self, ty: Type) -> bool;
}

/// Proto `google.protobuf.Timestamp`
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// Proto `google.protobuf.Duration`
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(name = "Duration")]
pub struct ProtoDuration {
    pub seconds: i64,
    pub nanos: i32,
}

/// Default predicates: native and proto time/duration types
#[derive(Debug, Clone, Copy, Default)]
pub struct StdWellKnown;

impl StdWellKnown {
    fn is_time_like(ty: Type) -> bool {
        let ty = ty.deref();
        ty == Type::of::<SystemTime>()
            || ty == Type::of::<Duration>()
            || ty == Type::of::<Timestamp>()
            || ty == Type::of::<ProtoDuration>()
    }
}

impl WellKnown for StdWellKnown {
    fn is_binary_well_known(&self, ty: Type) -> bool {
        Self::is_time_like(ty)
    }

    fn is_json_well_known(&self, ty: Type) -> bool {
        Self::is_time_like(ty)
    }

    fn is_json_any_value(&self, ty: Type) -> bool {
        if self.is_json_well_known(ty) {
            return true;
        }
        // Only records carry fields that `@type` can sit beside
        !matches!(
            ty.deref().kind(),
            Kind::Struct(_) | Kind::Interface | Kind::Pointer(_)
        )
    }
}
