//! Structural introspection of records
//!
//! Turns the declared field table of a record into the ordered list of
//! retained fields with their parsed options and field numbers.
//!
//! # Tags
//!
//! | Namespace | Token         | Effect                                      |
//! |-----------|---------------|---------------------------------------------|
//! | `json`    | `name`        | JSON field name (default: the field name)   |
//! | `json`    | `omitempty`   | omit empty values in JSON                   |
//! | `json`    | `-`           | skip the field entirely (binary and JSON)   |
//! | `binary`  | `fixed64`     | Fixed64 for 64-bit integer fields           |
//! | `binary`  | `fixed32`     | Fixed32 for 32-bit integer fields           |
//! | `codec`   | `unsafe`      | non-portable path downstream (e.g. floats)  |
//! | `codec`   | `write_empty` | emit empty/default values                   |
//! | `codec`   | `empty_elements` | decode a zero marker as an empty element |
//!
//! Unknown tokens are ignored.

use tracing::debug;

use super::type_info::{FieldInfo, FieldOptions, StructInfo};
use super::typ3::{typ3_of, Typ3};
use crate::error::SchemaResult;
use crate::reflect::{Kind, StructField, Type};

/// Derive the retained field list of a record
///
/// Fields are kept in declaration order; private and `json = "-"` fields are
/// dropped, and field numbers run 1..=N over the retained fields.
pub fn parse_struct_info(ty: Type, fields: &[StructField]) -> SchemaResult<StructInfo> {
    let mut infos: Vec<FieldInfo> = Vec::with_capacity(fields.len());

    for field in fields {
        if !is_exported(field) {
            continue;
        }
        let Some(mut options) = parse_field_options(field) else {
            continue;
        };

        let unpacked_list = is_unpacked_list(field.ty, &options)?;

        options.bin_field_num = (infos.len() + 1) as u32;

        if matches!(field.ty.deref().kind(), Kind::Float32 | Kind::Float64) && !options.is_unsafe {
            debug!(
                "{}.{} is a float without the unsafe tag; encoding is not portable",
                ty.name(),
                field.name
            );
        }

        infos.push(FieldInfo {
            name: field.name,
            ty: field.ty,
            index: field.index,
            zero: field.ty.zero(),
            unpacked_list,
            options,
        });
    }

    Ok(StructInfo { fields: infos })
}

/// Whether a list field is encoded as repeated length-delimited entries
///
/// Byte lists have a dedicated scalar-bytes encoding and are never unpacked.
fn is_unpacked_list(ty: Type, options: &FieldOptions) -> SchemaResult<bool> {
    if !ty.kind().is_list() {
        return Ok(false);
    }
    let Some(elem) = ty.elem() else {
        return Ok(false);
    };
    if elem.kind() == Kind::Uint8 {
        return Ok(false);
    }
    Ok(typ3_of(elem.deref(), options)? == Typ3::ByteLength)
}

/// Parse a field's tags into encoding options
///
/// Returns `None` when the field is tagged `json = "-"`, which skips it for
/// both binary and JSON.
pub fn parse_field_options(field: &StructField) -> Option<FieldOptions> {
    let json_tag = field.tag.get("json");
    let bin_tag = field.tag.get("binary");
    let codec_tag = field.tag.get("codec");

    if json_tag == "-" {
        return None;
    }

    let mut options = FieldOptions::default();

    let mut json_parts = json_tag.split(',');
    options.json_name = match json_parts.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => field.name.to_string(),
    };
    options.json_omit_empty = json_parts.any(|part| part == "omitempty");

    for token in bin_tag.split(',') {
        match token.trim() {
            "fixed64" => options.bin_fixed64 = true,
            "fixed32" => options.bin_fixed32 = true,
            _ => {}
        }
    }

    for token in codec_tag.split(',') {
        match token.trim() {
            "unsafe" => options.is_unsafe = true,
            "write_empty" => options.write_empty = true,
            "empty_elements" => options.empty_elements = true,
            _ => {}
        }
    }

    Some(options)
}

/// Whether a field takes part in encoding
pub fn is_exported(field: &StructField) -> bool {
    field.exported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Reflect, Tag, TypeDesc};

    struct Sub;

    impl Reflect for Sub {
        fn type_desc() -> TypeDesc {
            TypeDesc::sized::<Sub>("Sub", Kind::Struct(Vec::new()))
        }
    }

    fn field(name: &'static str, ty: Type, index: usize, tag: Tag) -> StructField {
        StructField {
            name,
            ty,
            index,
            exported: true,
            tag,
        }
    }

    fn json(tag: &'static str) -> Tag {
        Tag {
            json: Some(tag),
            ..Default::default()
        }
    }

    #[test]
    fn test_field_numbers_skip_dropped_fields() {
        let mut private = field("secret", Type::of::<i64>(), 1, Tag::default());
        private.exported = false;

        let fields = vec![
            field("a", Type::of::<i64>(), 0, Tag::default()),
            private,
            field("b", Type::of::<String>(), 2, json("-")),
            field("c", Type::of::<bool>(), 3, Tag::default()),
            field("d", Type::of::<u32>(), 4, Tag::default()),
        ];

        let info = parse_struct_info(Type::of::<Sub>(), &fields).unwrap();
        let summary: Vec<_> = info
            .fields
            .iter()
            .map(|f| (f.name, f.index, f.options.bin_field_num))
            .collect();
        assert_eq!(summary, vec![("a", 0, 1), ("c", 3, 2), ("d", 4, 3)]);
    }

    #[test]
    fn test_unpacked_lists() {
        let fields = vec![
            field("subs", Type::of::<Vec<Sub>>(), 0, Tag::default()),
            field("bytes", Type::of::<Vec<u8>>(), 1, Tag::default()),
            field("hash", Type::of::<[u8; 32]>(), 2, Tag::default()),
            field("nums", Type::of::<Vec<i64>>(), 3, Tag::default()),
            field("names", Type::of::<Vec<String>>(), 4, Tag::default()),
            field("boxed", Type::of::<Vec<Box<Sub>>>(), 5, Tag::default()),
            field("nested", Type::of::<Vec<Vec<u8>>>(), 6, Tag::default()),
            field("plain", Type::of::<Sub>(), 7, Tag::default()),
        ];

        let info = parse_struct_info(Type::of::<Sub>(), &fields).unwrap();
        let unpacked: Vec<_> = info.fields.iter().map(|f| (f.name, f.unpacked_list)).collect();
        assert_eq!(
            unpacked,
            vec![
                ("subs", true),
                ("bytes", false),
                ("hash", false),
                ("nums", false),
                ("names", true),
                ("boxed", true),
                ("nested", true),
                ("plain", false),
            ]
        );
    }

    #[test]
    fn test_unsupported_list_element_fails() {
        let fields = vec![field("chars", Type::of::<Vec<char>>(), 0, Tag::default())];
        assert!(parse_struct_info(Type::of::<Sub>(), &fields).is_err());
    }

    #[test]
    fn test_json_options() {
        let opts = parse_field_options(&field("a", Type::of::<i64>(), 0, Tag::default())).unwrap();
        assert_eq!(opts.json_name, "a");
        assert!(!opts.json_omit_empty);

        let opts = parse_field_options(&field("a", Type::of::<i64>(), 0, json("alpha,omitempty")))
            .unwrap();
        assert_eq!(opts.json_name, "alpha");
        assert!(opts.json_omit_empty);

        let opts = parse_field_options(&field("a", Type::of::<i64>(), 0, json(",omitempty"))).unwrap();
        assert_eq!(opts.json_name, "a");
        assert!(opts.json_omit_empty);

        assert!(parse_field_options(&field("a", Type::of::<i64>(), 0, json("-"))).is_none());
    }

    #[test]
    fn test_binary_and_codec_options() {
        let tag = Tag {
            json: None,
            binary: Some("fixed64"),
            codec: Some("unsafe,write_empty,empty_elements"),
        };
        let opts = parse_field_options(&field("a", Type::of::<f64>(), 0, tag)).unwrap();
        assert!(opts.bin_fixed64);
        assert!(!opts.bin_fixed32);
        assert!(opts.is_unsafe);
        assert!(opts.write_empty);
        assert!(opts.empty_elements);
        assert!(!opts.use_google_types);
    }

    #[test]
    fn test_unknown_tokens_ignored() {
        let tag = Tag {
            json: Some("a,string,omitempty"),
            binary: Some("varint,fixed32"),
            codec: Some("bogus, write_empty"),
        };
        let opts = parse_field_options(&field("a", Type::of::<u32>(), 0, tag)).unwrap();
        assert_eq!(opts.json_name, "a");
        assert!(opts.json_omit_empty);
        assert!(opts.bin_fixed32);
        assert!(opts.write_empty);
        assert!(!opts.is_unsafe);
    }
}
