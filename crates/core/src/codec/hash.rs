//! FNV-1a hashing for descriptor fingerprints
//!
//! A fingerprint condenses the structural layout of a descriptor (field
//! order, numbers, options and types) into one value, so descriptors derived
//! by independent codecs can be compared cheaply.

use std::fmt::Write;

use super::type_info::TypeInfo;

/// FNV-1a 64-bit hash (compile-time capable)
pub const fn fnv1a_64(data: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < data.len() {
        hash ^= data[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

impl TypeInfo {
    /// Canonical text of the structural layout
    ///
    /// Registration metadata (URL, pointer preference) is not part of it.
    pub fn layout(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}", self.ty.path());
        for field in &self.structure.fields {
            let o = &field.options;
            let _ = write!(
                out,
                ";{}#{}:{}|{}|{}{}{}{}{}{}{}",
                field.name,
                o.bin_field_num,
                field.ty,
                o.json_name,
                flag(o.json_omit_empty, 'o'),
                flag(o.bin_fixed64, '8'),
                flag(o.bin_fixed32, '4'),
                flag(o.is_unsafe, 'u'),
                flag(o.write_empty, 'w'),
                flag(o.empty_elements, 'e'),
                flag(field.unpacked_list, 'l'),
            );
        }
        out
    }

    /// 64-bit fingerprint of [`layout`](Self::layout)
    pub fn fingerprint(&self) -> u64 {
        fnv1a_64(self.layout().as_bytes())
    }
}

fn flag(set: bool, c: char) -> char {
    if set {
        c
    } else {
        '-'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ConcreteInfo, StructInfo};
    use crate::reflect::Type;

    #[test]
    fn test_fnv1a_64_basic() {
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_const_evaluation() {
        const HASH: u64 = fnv1a_64(b"demo.Msg");
        assert!(HASH != 0);
    }

    #[test]
    fn test_fingerprint_ignores_registration() {
        let mut info = TypeInfo {
            ty: Type::of::<i64>(),
            ptr_to_type: Type::of::<i64>().pointer_to(),
            zero: None,
            concrete: ConcreteInfo::default(),
            structure: StructInfo::default(),
        };
        let before = info.fingerprint();
        info.concrete.registered = true;
        info.concrete.type_url = Some("acme.io/demo.Int".to_string());
        assert_eq!(info.fingerprint(), before);

        info.ty = Type::of::<u64>();
        assert_ne!(info.fingerprint(), before);
    }
}
