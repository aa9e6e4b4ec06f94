//! Record offset arithmetic for the shared metadata tables.
//!
//! Three binary tables carry per-item metadata that has no file of its own:
//!
//! * **EQP** (`equipmentparameter.eqp`) holds one 8-byte entry per equipment
//!   set id, with slot-specific fields at fixed byte offsets inside the entry.
//! * **EQDP** (`c<race>.eqdp`, one file per playable race) holds one 16-bit
//!   entry per set id, two bits per slot in a fixed slot order.
//! * **IMC** (`<prefixed-id>.imc`, one file per primary or secondary item)
//!   starts with a `subset count` / `format` header followed by fixed-size
//!   records; set-format records hold a 6-byte sub-entry per slot.
//!
//! Individual records are addressed as `<file path>::<bit offset>`. This
//! module computes those offsets in both directions: identity fields to
//! record paths, and record offsets back to identity fields.

use log::warn;
use tomestone_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::item::ItemType;
use crate::parse;
use crate::race::Race;
use crate::root::RootId;
use crate::Result;

/// Path of the equipment parameter table.
pub const EQP_PATH: &str = "chara/xls/equipmentparameter/equipmentparameter.eqp";

/// Folder holding the per-race equipment deformation parameter files.
pub const EQDP_EQUIPMENT_FOLDER: &str = "chara/xls/charadb/equipmentdeformerparameter";

/// Folder holding the per-race accessory deformation parameter files.
pub const EQDP_ACCESSORY_FOLDER: &str = "chara/xls/charadb/accessorydeformerparameter";

/// Size of one EQP entry in bytes.
pub const EQP_ENTRY_BYTES: u64 = 8;

/// Size of one EQDP entry in bits.
pub const EQDP_ENTRY_BITS: u64 = 16;

/// Size of the IMC file header in bytes.
pub const IMC_HEADER_BYTES: u64 = 4;

/// Size of one slot sub-entry inside a set-format IMC record, in bytes.
pub const IMC_SUBENTRY_BYTES: u64 = 6;

/// Equipment slot codes in metadata table order.
pub const EQUIPMENT_SLOTS: [&str; 5] = ["met", "top", "glv", "dwn", "sho"];

/// Accessory slot codes in metadata table order.
pub const ACCESSORY_SLOTS: [&str; 5] = ["ear", "nek", "wrs", "rir", "ril"];

/// Byte offsets of the slot fields inside one EQP entry.
const EQP_SLOT_BYTES: [(&str, u64); 5] = [
    ("top", 0),
    ("dwn", 2),
    ("glv", 3),
    ("sho", 4),
    ("met", 5),
];

/// The slot table for a metadata category.
pub fn slot_list(accessory: bool) -> &'static [&'static str] {
    if accessory {
        &ACCESSORY_SLOTS
    } else {
        &EQUIPMENT_SLOTS
    }
}

/// Byte offset of a slot's field inside an EQP entry.
pub fn eqp_byte_offset(slot: &str) -> Option<u64> {
    EQP_SLOT_BYTES
        .iter()
        .find(|(name, _)| *name == slot)
        .map(|(_, byte)| *byte)
}

fn eqp_slot_for_byte(byte: u64) -> Option<&'static str> {
    EQP_SLOT_BYTES
        .iter()
        .find(|(_, b)| *b == byte)
        .map(|(name, _)| *name)
}

/// The EQP record path for an equipment set and slot.
///
/// Returns `None` for slots with no EQP field.
pub fn eqp_record_path(primary_id: u16, slot: &str) -> Option<String> {
    let byte = eqp_byte_offset(slot)?;
    let bits = u64::from(primary_id) * EQP_ENTRY_BYTES * 8 + byte * 8;
    Some(parse::join_offset(EQP_PATH, bits))
}

/// Recovers the equipment root addressed by an EQP record offset.
pub fn eqp_root_from_offset(bits: u64) -> Option<RootId> {
    let id = u16::try_from(bits / (EQP_ENTRY_BYTES * 8)).ok()?;
    let byte = (bits % (EQP_ENTRY_BYTES * 8)) / 8;
    let slot = eqp_slot_for_byte(byte)?;
    RootId::equipment(id, slot)
}

/// The EQDP file path for one category and race.
pub fn eqdp_file_path(accessory: bool, race: Race) -> String {
    let folder = if accessory {
        EQDP_ACCESSORY_FOLDER
    } else {
        EQDP_EQUIPMENT_FOLDER
    };
    format!("{}/c{:04}.eqdp", folder, race.code())
}

/// The EQDP record paths for a set and slot, one per playable race.
///
/// Returns `None` for slots outside the category's slot table.
pub fn eqdp_record_paths(accessory: bool, primary_id: u16, slot: &str) -> Option<Vec<String>> {
    let index = slot_list(accessory).iter().position(|s| *s == slot)? as u64;
    let bits = u64::from(primary_id) * EQDP_ENTRY_BITS + index * 2;
    Some(
        Race::PLAYABLE
            .iter()
            .map(|race| parse::join_offset(&eqdp_file_path(accessory, *race), bits))
            .collect(),
    )
}

/// Recovers the equipment or accessory root addressed by an EQDP record offset.
pub fn eqdp_root_from_offset(accessory: bool, bits: u64) -> Option<RootId> {
    let id = u16::try_from(bits / EQDP_ENTRY_BITS).ok()?;
    let index = ((bits % EQDP_ENTRY_BITS) / 2) as usize;
    let slot = *slot_list(accessory).get(index)?;
    if accessory {
        RootId::accessory(id, slot)
    } else {
        RootId::equipment(id, slot)
    }
}

/// Header of an IMC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ImcHeader {
    pub subset_count: u16,
    pub format: u16,
}

/// Record layout variant of an IMC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImcFormat {
    /// One 6-byte record per subset.
    NonSet,
    /// One 30-byte record per subset, holding a sub-entry per slot.
    Set,
}

impl ImcFormat {
    /// Interprets the raw format field of an IMC header.
    pub fn from_raw(raw: u16) -> Option<ImcFormat> {
        match raw {
            1 => Some(ImcFormat::NonSet),
            31 => Some(ImcFormat::Set),
            _ => None,
        }
    }

    /// Size of one record in bytes.
    pub const fn record_bytes(self) -> u64 {
        match self {
            ImcFormat::NonSet => IMC_SUBENTRY_BYTES,
            ImcFormat::Set => IMC_SUBENTRY_BYTES * 5,
        }
    }
}

/// Byte offset of a slot's sub-entry inside a set-format IMC record.
pub fn imc_slot_suboffset(accessory: bool, slot: &str) -> Option<u64> {
    slot_list(accessory)
        .iter()
        .position(|s| *s == slot)
        .map(|index| index as u64 * IMC_SUBENTRY_BYTES)
}

/// Recovers the slot addressed by an offset into a set-format IMC file.
pub fn imc_slot_from_offset(accessory: bool, bits: u64) -> Option<&'static str> {
    let byte = bits / 8;
    if byte < IMC_HEADER_BYTES {
        return None;
    }
    let within = (byte - IMC_HEADER_BYTES) % ImcFormat::Set.record_bytes();
    let index = (within / IMC_SUBENTRY_BYTES) as usize;
    slot_list(accessory).get(index).copied()
}

/// Computes every record offset an IMC file body exposes for one slot.
///
/// The result holds the default record followed by one record per subset.
/// Files with an unrecognized format field expose no records.
pub fn imc_record_offsets(data: &[u8], slot_suboffset: u64) -> Result<Vec<u64>> {
    let mut reader = BinaryReader::new(data);
    let header: ImcHeader = reader.read_struct()?;
    let Some(format) = ImcFormat::from_raw(header.format) else {
        warn!("unrecognized IMC format field {:#06x}", header.format);
        return Ok(Vec::new());
    };

    let record = format.record_bytes();
    let mut offsets = Vec::with_capacity(usize::from(header.subset_count) + 1);
    offsets.push((IMC_HEADER_BYTES + slot_suboffset) * 8);
    for subset in 0..u64::from(header.subset_count) {
        offsets.push((IMC_HEADER_BYTES + (subset + 1) * record + slot_suboffset) * 8);
    }
    Ok(offsets)
}

/// Recovers the root addressed by a metadata record path.
///
/// This is the inverse of record path generation and fails closed: offsets
/// that do not land on a known field, and eqdp paths outside the two known
/// folders, recover nothing.
pub fn root_from_record_path(path: &str) -> Option<RootId> {
    let (base, bits) = parse::split_offset(path);
    let bits = bits?;
    match parse::extension(base)? {
        "eqp" => eqp_root_from_offset(bits),
        "eqdp" => {
            let accessory = if base.starts_with(EQDP_ACCESSORY_FOLDER) {
                true
            } else if base.starts_with(EQDP_EQUIPMENT_FOLDER) {
                false
            } else {
                return None;
            };
            eqdp_root_from_offset(accessory, bits)
        }
        "imc" => {
            let fields = parse::parse_chara_path(base)?;
            match fields.primary_type {
                ItemType::Equipment | ItemType::Accessory | ItemType::Demihuman => {
                    let accessory = fields.primary_type == ItemType::Accessory;
                    let slot = imc_slot_from_offset(accessory, bits)?;
                    RootId::new(
                        fields.primary_type,
                        fields.primary_id,
                        fields.secondary,
                        Some(slot),
                    )
                }
                _ => None,
            }
        }
        _ => None,
    }
}
