//! Structural parsing of character asset paths.
//!
//! Character asset paths follow a fixed grammar:
//!
//! ```text
//! chara/<primary>/<p><NNNN>[/obj/<secondary>/<s><NNNN>]/.../<file>
//! ```
//!
//! where `<primary>` and `<secondary>` are item folder names, `<p>` and `<s>`
//! the matching single-letter prefixes, and `<NNNN>` a fixed-width four-digit
//! id. File names embed the same prefixed ids and may carry a three-letter
//! slot code after the last id block (`c0101e6016_top.mdl`).
//!
//! Record paths into binary metadata files append a bit offset after a `::`
//! separator (`chara/.../e6016.imc::80`). All parsing here works by explicit
//! segment and field splitting over these fixed-width forms.

use crate::item::ItemType;

/// Identity fields recovered from a path by structural parsing alone.
///
/// Holding the raw fields rather than a finished identity lets callers apply
/// their own construction rules, including recovering a missing slot from a
/// record offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralFields<'a> {
    pub primary_type: ItemType,
    pub primary_id: u16,
    pub secondary: Option<(ItemType, u16)>,
    pub slot: Option<&'a str>,
}

/// Splits a trailing `::<bits>` record offset off a path.
///
/// Returns the path unchanged when no well-formed offset suffix is present.
pub fn split_offset(path: &str) -> (&str, Option<u64>) {
    if let Some((base, digits)) = path.rsplit_once("::") {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(bits) = digits.parse::<u64>() {
                return (base, Some(bits));
            }
        }
    }
    (path, None)
}

/// Appends a `::<bits>` record offset to a file path.
pub fn join_offset(path: &str, bits: u64) -> String {
    format!("{path}::{bits}")
}

/// Extracts the lowercase extension of the final path segment.
pub fn extension(path: &str) -> Option<&str> {
    let name = match path.rsplit_once('/') {
        Some((_, name)) => name,
        None => path,
    };
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Parses a `<prefix><NNNN>` segment into its numeric id.
pub fn parse_prefixed_id(segment: &str, prefix: char) -> Option<u16> {
    let digits = segment.strip_prefix(prefix)?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Extracts the three-letter slot code from a file name.
///
/// The slot follows the last `<letter><NNNN>` id block in the name and must
/// itself be followed by `.`, `_` or the end of the name, so variant suffixes
/// like `_a` or map suffixes like `_d` are never mistaken for slots.
pub fn extract_slot(file_name: &str) -> Option<&str> {
    let bytes = file_name.as_bytes();
    let mut block_end = None;
    let mut i = 0;
    while i + 5 <= bytes.len() {
        if bytes[i].is_ascii_lowercase() && bytes[i + 1..i + 5].iter().all(u8::is_ascii_digit) {
            block_end = Some(i + 5);
            i += 5;
        } else {
            i += 1;
        }
    }

    let end = block_end?;
    if end + 4 > bytes.len() || bytes[end] != b'_' {
        return None;
    }
    let slot = &bytes[end + 1..end + 4];
    if !slot.iter().all(u8::is_ascii_lowercase) {
        return None;
    }
    match bytes.get(end + 4) {
        None | Some(b'.') | Some(b'_') => Some(&file_name[end + 1..end + 4]),
        Some(_) => None,
    }
}

/// Recovers identity fields from a character asset path.
///
/// Returns `None` when the path does not follow the `chara/` grammar, when a
/// numbered segment does not match its folder's prefix, or when an `obj/`
/// component is present but malformed. Any `::<bits>` suffix is ignored.
pub fn parse_chara_path(path: &str) -> Option<StructuralFields<'_>> {
    let (base, _) = split_offset(path);
    let segments: Vec<&str> = base.split('/').collect();
    if segments.len() < 3 || segments[0] != "chara" {
        return None;
    }

    let primary_type = ItemType::from_system_name(segments[1])?;
    if !primary_type.is_root_type() {
        return None;
    }
    let primary_id = parse_prefixed_id(segments[2], primary_type.prefix())?;

    let mut secondary = None;
    if segments.len() > 3 && segments[3] == "obj" {
        if segments.len() < 6 {
            return None;
        }
        let kind = ItemType::from_system_name(segments[4])?;
        let id = parse_prefixed_id(segments[5], kind.prefix())?;
        secondary = Some((kind, id));
    }

    let slot = segments.last().and_then(|name| extract_slot(name));

    Some(StructuralFields {
        primary_type,
        primary_id,
        secondary,
        slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_suffix_round_trips() {
        let joined = join_offset("chara/equipment/e6016/e6016.imc", 80);
        assert_eq!(joined, "chara/equipment/e6016/e6016.imc::80");
        assert_eq!(
            split_offset(&joined),
            ("chara/equipment/e6016/e6016.imc", Some(80))
        );
    }

    #[test]
    fn malformed_offset_suffixes_are_ignored() {
        assert_eq!(split_offset("a/b.imc"), ("a/b.imc", None));
        assert_eq!(split_offset("a/b.imc::"), ("a/b.imc::", None));
        assert_eq!(split_offset("a/b.imc::12x"), ("a/b.imc::12x", None));
    }

    #[test]
    fn extension_of_final_segment() {
        assert_eq!(extension("chara/equipment/e6016/e6016_top.root"), Some("root"));
        assert_eq!(extension("e6016_top.root"), Some("root"));
        assert_eq!(extension("chara/equipment/e6016"), None);
        assert_eq!(extension("chara/equip.ment/e6016"), None);
        assert_eq!(extension(".root"), None);
    }

    #[test]
    fn slot_follows_last_id_block() {
        assert_eq!(extract_slot("c0101e6016_top.mdl"), Some("top"));
        assert_eq!(extract_slot("mt_c0101e6016_top_a.mtrl"), Some("top"));
        assert_eq!(extract_slot("v01_c0101a0001_ear_d.tex"), Some("ear"));
        assert_eq!(extract_slot("c0101f0001_fac.mdl"), Some("fac"));
        assert_eq!(extract_slot("e6016_top"), Some("top"));
    }

    #[test]
    fn non_slots_are_rejected() {
        assert_eq!(extract_slot("w0001b0001.mdl"), None);
        assert_eq!(extract_slot("mt_c0101b0001_a.mtrl"), None);
        assert_eq!(extract_slot("e6016.imc"), None);
        assert_eq!(extract_slot("c0101e6016_base.mdl"), None);
        assert_eq!(extract_slot("texture_only.tex"), None);
    }

    #[test]
    fn parses_equipment_paths() {
        let fields =
            parse_chara_path("chara/equipment/e6016/model/c0101e6016_top.mdl").unwrap();
        assert_eq!(fields.primary_type, ItemType::Equipment);
        assert_eq!(fields.primary_id, 6016);
        assert_eq!(fields.secondary, None);
        assert_eq!(fields.slot, Some("top"));
    }

    #[test]
    fn parses_secondary_components() {
        let fields =
            parse_chara_path("chara/weapon/w0201/obj/body/b0001/model/w0201b0001.mdl").unwrap();
        assert_eq!(fields.primary_type, ItemType::Weapon);
        assert_eq!(fields.primary_id, 201);
        assert_eq!(fields.secondary, Some((ItemType::Body, 1)));
        assert_eq!(fields.slot, None);
    }

    #[test]
    fn parses_human_parts_with_zear_folder() {
        let fields = parse_chara_path(
            "chara/human/c1801/obj/zear/z0001/model/c1801z0001_ear.mdl",
        )
        .unwrap();
        assert_eq!(fields.primary_type, ItemType::Human);
        assert_eq!(fields.secondary, Some((ItemType::Ear, 1)));
        assert_eq!(fields.slot, Some("ear"));
    }

    #[test]
    fn ignores_offset_suffix_during_parsing() {
        let fields = parse_chara_path("chara/weapon/w0201/obj/body/b0001/b0001.imc::32").unwrap();
        assert_eq!(fields.primary_type, ItemType::Weapon);
        assert_eq!(fields.secondary, Some((ItemType::Body, 1)));
    }

    #[test]
    fn rejects_paths_outside_the_grammar() {
        assert_eq!(parse_chara_path("bgcommon/hou/indoor/general/0078/material/fun_b0_m0078_0a.mtrl"), None);
        assert_eq!(parse_chara_path("chara/xls/equipmentparameter/equipmentparameter.eqp"), None);
        assert_eq!(parse_chara_path("chara/equipment/x6016/e6016_top.root"), None);
        assert_eq!(parse_chara_path("chara/equipment/e601/e601_top.root"), None);
        assert_eq!(parse_chara_path("chara/weapon/w0201/obj/body/b01"), None);
        assert_eq!(parse_chara_path("chara/body/b0001/b0001.mdl"), None);
    }
}
