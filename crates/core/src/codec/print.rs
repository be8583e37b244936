//! Markdown type table for documentation

use std::io;
use std::sync::Arc;

use super::type_info::TypeInfo;
use crate::reflect::Kind;

/// Write one row per descriptor, sorted by type name
pub(super) fn write_type_table<W: io::Write>(
    out: &mut W,
    mut infos: Vec<Arc<TypeInfo>>,
) -> io::Result<()> {
    infos.sort_by_key(|info| info.ty.name());

    writeln!(out, "| Type | TypeURL | Length | Notes |")?;
    writeln!(out, "| ---- | ------- | ------ | ----- |")?;
    for info in &infos {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            info.ty.name(),
            info.concrete.type_url.as_deref().unwrap_or_default(),
            length_str(info),
            notes(info).join(", ")
        )?;
    }
    Ok(())
}

/// Heuristic in-memory size for fixed-width kinds; not an encoded length
fn length_str(info: &TypeInfo) -> String {
    match info.ty.kind() {
        Kind::Array { .. }
        | Kind::Int8
        | Kind::Int16
        | Kind::Int32
        | Kind::Int64
        | Kind::Float32
        | Kind::Float64 => format!("0x{:X}", info.ty.size()),
        _ => "variable".to_string(),
    }
}

fn notes(info: &TypeInfo) -> Vec<String> {
    let mut notes = Vec::new();
    if info.is_registered() {
        notes.push("registered".to_string());
    }
    if info.concrete.pointer_preferred {
        notes.push("pointer preferred".to_string());
    }
    if let Some(repr) = info.concrete.marshal_repr {
        notes.push(format!("marshals to {}", repr));
    }
    if let Some(repr) = info.concrete.unmarshal_repr {
        notes.push(format!("unmarshals from {}", repr));
    }
    if info.is_binary_well_known() {
        notes.push("binary well-known".to_string());
    }
    if info.is_json_well_known() {
        notes.push("json well-known".to_string());
    }
    if info.is_json_any_value() {
        notes.push("json any-value".to_string());
    }
    notes
}
