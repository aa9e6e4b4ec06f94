//! Root identities and root entities.
//!
//! A root is the synthetic top of one item's dependency tree. Its identity is
//! a small set of typed fields (primary category and id, optional secondary
//! category and id, optional slot) and it serializes to a canonical `.root`
//! path under the item's folder:
//!
//! ```text
//! chara/equipment/e6016/e6016_top.root
//! chara/weapon/w0201/obj/body/b0001/w0201b0001.root
//! chara/human/c0101/obj/face/f0001/c0101f0001_fac.root
//! ```
//!
//! The `.root` file never exists in the game archives; the path is the
//! identity. Two identities are equal exactly when their canonical paths are
//! equal.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::graph::DependencyGraph;
use crate::item::ItemType;
use crate::meta;
use crate::parse;
use crate::race::Race;
use crate::{Error, Result};

/// Identity of a dependency root.
///
/// Construction canonicalizes and validates the fields; values that exist
/// always serialize to a well-formed root path, available via
/// [`RootId::root_path`] without further allocation.
#[derive(Debug, Clone)]
pub struct RootId {
    primary_type: ItemType,
    primary_id: u16,
    secondary: Option<(ItemType, u16)>,
    slot: Option<String>,
    canonical: String,
}

impl RootId {
    /// Builds an identity from raw fields.
    ///
    /// Returns `None` when the fields violate the pairing rules: the primary
    /// category must be a root category, the secondary must be one the
    /// primary allows (and is required when the primary allows any), and
    /// equipment, accessory and demihuman roots must carry a slot.
    ///
    /// Human roots canonicalize a missing slot from their secondary category:
    /// faces take `fac`, hair `hir`, tails `til`, ears `ear`, and bodies
    /// `top`, which groups all skin materials under a single tree.
    pub fn new(
        primary_type: ItemType,
        primary_id: u16,
        secondary: Option<(ItemType, u16)>,
        slot: Option<&str>,
    ) -> Option<RootId> {
        if !primary_type.is_root_type() {
            return None;
        }
        let allowed = primary_type.secondary_kinds();
        match secondary {
            None if !allowed.is_empty() => return None,
            Some((kind, _)) if !allowed.contains(&kind) => return None,
            _ => {}
        }

        let mut slot = slot.map(str::to_owned);
        if primary_type == ItemType::Human && slot.is_none() {
            slot = match secondary.map(|(kind, _)| kind) {
                Some(ItemType::Face) => Some("fac".to_owned()),
                Some(ItemType::Hair) => Some("hir".to_owned()),
                Some(ItemType::Tail) => Some("til".to_owned()),
                Some(ItemType::Ear) => Some("ear".to_owned()),
                Some(ItemType::Body) => Some("top".to_owned()),
                _ => None,
            };
        }
        if slot.is_none() && primary_type.requires_slot() {
            return None;
        }
        if let Some(code) = &slot {
            if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
                return None;
            }
        }

        let mut folder = format!(
            "chara/{}/{}{:04}/",
            primary_type.system_name(),
            primary_type.prefix(),
            primary_id
        );
        if let Some((kind, id)) = secondary {
            folder.push_str(&format!(
                "obj/{}/{}{:04}/",
                kind.system_name(),
                kind.prefix(),
                id
            ));
        }
        let mut base = format!("{}{:04}", primary_type.prefix(), primary_id);
        if let Some((kind, id)) = secondary {
            base.push_str(&format!("{}{:04}", kind.prefix(), id));
        }
        if let Some(code) = &slot {
            base.push('_');
            base.push_str(code);
        }
        let canonical = format!("{folder}{base}.root");

        Some(RootId {
            primary_type,
            primary_id,
            secondary,
            slot,
            canonical,
        })
    }

    /// An equipment root (`e<id>`, slotted).
    pub fn equipment(primary_id: u16, slot: &str) -> Option<RootId> {
        RootId::new(ItemType::Equipment, primary_id, None, Some(slot))
    }

    /// An accessory root (`a<id>`, slotted).
    pub fn accessory(primary_id: u16, slot: &str) -> Option<RootId> {
        RootId::new(ItemType::Accessory, primary_id, None, Some(slot))
    }

    /// A weapon root (`w<id>` with a `b<id>` body).
    pub fn weapon(primary_id: u16, body_id: u16) -> Option<RootId> {
        RootId::new(
            ItemType::Weapon,
            primary_id,
            Some((ItemType::Body, body_id)),
            None,
        )
    }

    /// A monster root (`m<id>` with a `b<id>` body).
    pub fn monster(primary_id: u16, body_id: u16) -> Option<RootId> {
        RootId::new(
            ItemType::Monster,
            primary_id,
            Some((ItemType::Body, body_id)),
            None,
        )
    }

    /// A demihuman root (`d<id>` with an `e<id>` equipment piece, slotted).
    pub fn demihuman(primary_id: u16, equipment_id: u16, slot: &str) -> Option<RootId> {
        RootId::new(
            ItemType::Demihuman,
            primary_id,
            Some((ItemType::Equipment, equipment_id)),
            Some(slot),
        )
    }

    /// A human root (`c<race code>` with a body part).
    pub fn human(
        primary_id: u16,
        part: ItemType,
        part_id: u16,
        slot: Option<&str>,
    ) -> Option<RootId> {
        RootId::new(ItemType::Human, primary_id, Some((part, part_id)), slot)
    }

    /// Recovers an identity from any path that embeds one structurally.
    ///
    /// Works on any file under the item's tree, not just root paths. Returns
    /// `None` when the path lies outside the `chara/` grammar or the embedded
    /// fields do not form a valid identity.
    pub fn extract(path: &str) -> Option<RootId> {
        let fields = parse::parse_chara_path(path)?;
        RootId::new(
            fields.primary_type,
            fields.primary_id,
            fields.secondary,
            fields.slot,
        )
    }

    /// Parses a canonical `.root` or `.meta` path.
    ///
    /// Unlike [`RootId::extract`] this is strict: the input must round-trip
    /// to itself, so paths that merely contain identity fields are rejected.
    pub fn parse(path: &str) -> Result<RootId> {
        RootId::extract(path)
            .filter(|id| id.root_path() == path || id.meta_file_path() == path)
            .ok_or_else(|| Error::NonCanonicalRoot(path.to_owned()))
    }

    /// The primary item category.
    #[inline]
    pub fn primary_type(&self) -> ItemType {
        self.primary_type
    }

    /// The primary item id.
    #[inline]
    pub fn primary_id(&self) -> u16 {
        self.primary_id
    }

    /// The secondary item category, when present.
    #[inline]
    pub fn secondary_type(&self) -> Option<ItemType> {
        self.secondary.map(|(kind, _)| kind)
    }

    /// The secondary item id, when present.
    #[inline]
    pub fn secondary_id(&self) -> Option<u16> {
        self.secondary.map(|(_, id)| id)
    }

    /// The three-letter slot code, when present.
    #[inline]
    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// The canonical root path.
    #[inline]
    pub fn root_path(&self) -> &str {
        &self.canonical
    }

    /// The item's folder, with a trailing slash.
    pub fn folder(&self) -> &str {
        match self.canonical.rfind('/') {
            Some(pos) => &self.canonical[..=pos],
            None => "",
        }
    }

    /// The base file name shared by the item's files, without extension.
    pub fn base_name(&self) -> &str {
        let name = &self.canonical[self.folder().len()..];
        name.strip_suffix(".root").unwrap_or(name)
    }

    /// The path of the item's metadata container file.
    pub fn meta_file_path(&self) -> String {
        format!("{}{}.meta", self.folder(), self.base_name())
    }

    /// The path of the item's IMC file.
    ///
    /// The file is named after the secondary id when one is present, after
    /// the primary id otherwise.
    pub fn imc_path(&self) -> String {
        let (prefix, id) = match self.secondary {
            Some((kind, id)) => (kind.prefix(), id),
            None => (self.primary_type.prefix(), self.primary_id),
        };
        format!("{}{}{:04}.imc", self.folder(), prefix, id)
    }

    /// The playable race encoded in a human root's primary id.
    pub fn race(&self) -> Option<Race> {
        if self.primary_type != ItemType::Human {
            return None;
        }
        Race::from_code(self.primary_id)
    }
}

impl PartialEq for RootId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for RootId {}

impl Hash for RootId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for RootId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RootId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for RootId {
    type Err = Error;

    fn from_str(s: &str) -> Result<RootId> {
        RootId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RootId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RootId {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<RootId, D::Error> {
        let s = String::deserialize(deserializer)?;
        RootId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A root bound to a graph, able to expand its own file tree.
///
/// Obtained from [`DependencyGraph::root`]. Path computation that needs no
/// data stays on [`RootId`]; everything here may consult the graph's
/// collaborators.
#[derive(Clone)]
pub struct Root<'g> {
    id: RootId,
    graph: &'g DependencyGraph<'g>,
}

impl<'g> Root<'g> {
    pub(crate) fn new(id: RootId, graph: &'g DependencyGraph<'g>) -> Root<'g> {
        Root { id, graph }
    }

    /// The identity this entity expands.
    #[inline]
    pub fn id(&self) -> &RootId {
        &self.id
    }

    /// Consumes the entity, returning its identity.
    pub fn into_id(self) -> RootId {
        self.id
    }

    /// The model paths owned by this root.
    ///
    /// Equipment and accessories carry one model per race the deformation
    /// data reports available; every other category owns a single model named
    /// after the root itself.
    pub fn model_paths(&self) -> Result<Vec<String>> {
        let id = &self.id;
        match id.primary_type() {
            ItemType::Equipment | ItemType::Accessory => {
                let slot = id.slot().unwrap_or_default();
                let races = self
                    .graph
                    .deformers()
                    .available_races(id.primary_id(), slot)?;
                Ok(races
                    .iter()
                    .map(|race| {
                        format!(
                            "{}model/c{:04}{}{:04}_{}.mdl",
                            id.folder(),
                            race.code(),
                            id.primary_type().prefix(),
                            id.primary_id(),
                            slot
                        )
                    })
                    .collect())
            }
            _ => Ok(vec![format!("{}model/{}.mdl", id.folder(), id.base_name())]),
        }
    }

    /// The EQP record path, for equipment roots with an EQP field.
    pub fn eqp_record_path(&self) -> Option<String> {
        if self.id.primary_type() != ItemType::Equipment {
            return None;
        }
        meta::eqp_record_path(self.id.primary_id(), self.id.slot()?)
    }

    /// The EQDP record paths, one per playable race.
    ///
    /// Empty for categories without deformation parameters.
    pub fn eqdp_record_paths(&self) -> Vec<String> {
        let accessory = match self.id.primary_type() {
            ItemType::Equipment => false,
            ItemType::Accessory => true,
            _ => return Vec::new(),
        };
        self.id
            .slot()
            .and_then(|slot| meta::eqdp_record_paths(accessory, self.id.primary_id(), slot))
            .unwrap_or_default()
    }

    /// The IMC record paths for this root's slot.
    ///
    /// Empty when the IMC file is absent, has a zero data offset, or uses an
    /// unrecognized format.
    pub fn imc_record_paths(&self) -> Result<Vec<String>> {
        let path = self.id.imc_path();
        if self.graph.files().data_offset(&path)? == 0 {
            return Ok(Vec::new());
        }
        let Some(data) = self.graph.files().read_file(&path)? else {
            return Ok(Vec::new());
        };

        let suboffset = match self.id.primary_type() {
            ItemType::Equipment | ItemType::Demihuman => self
                .id
                .slot()
                .and_then(|slot| meta::imc_slot_suboffset(false, slot)),
            ItemType::Accessory => self
                .id
                .slot()
                .and_then(|slot| meta::imc_slot_suboffset(true, slot)),
            _ => Some(0),
        };
        let Some(suboffset) = suboffset else {
            return Ok(Vec::new());
        };

        let offsets = meta::imc_record_offsets(&data, suboffset)?;
        Ok(offsets
            .into_iter()
            .map(|bits| parse::join_offset(&path, bits))
            .collect())
    }

    /// Every metadata record path belonging to this root.
    ///
    /// EQP first, then EQDP, then IMC.
    pub fn meta_record_paths(&self) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        paths.extend(self.eqp_record_path());
        paths.extend(self.eqdp_record_paths());
        paths.extend(self.imc_record_paths()?);
        Ok(paths)
    }

    /// The material paths referenced by this root's models, de-duplicated
    /// and sorted.
    pub fn material_paths(&self) -> Result<Vec<String>> {
        let mut out = BTreeSet::new();
        for model in self.model_paths()? {
            if let Some(materials) = self.graph.children(&model)? {
                out.extend(materials);
            }
        }
        Ok(out.into_iter().collect())
    }

    /// The texture paths referenced by this root's materials, de-duplicated
    /// and sorted.
    pub fn texture_paths(&self) -> Result<Vec<String>> {
        let mut out = BTreeSet::new();
        for material in self.material_paths()? {
            if let Some(textures) = self.graph.children(&material)? {
                out.extend(textures);
            }
        }
        Ok(out.into_iter().collect())
    }
}

impl fmt::Debug for Root<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Root").field(&self.id).finish()
    }
}
