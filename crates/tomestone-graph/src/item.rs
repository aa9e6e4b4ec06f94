//! Item categories used in character asset paths.

use std::fmt;

/// Category of a primary or secondary item in the `chara/` file tree.
///
/// Each category owns a single-letter prefix used in numbered path segments
/// (`e6016`, `b0001`) and a folder name used in the directory structure. The
/// two differ only for [`ItemType::Ear`], whose folder is `zear` while its
/// prefix is `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ItemType {
    Equipment,
    Accessory,
    Weapon,
    Monster,
    Demihuman,
    Human,
    Body,
    Face,
    Hair,
    Tail,
    Ear,
}

impl ItemType {
    /// Categories that can anchor a dependency root.
    pub const ROOT_TYPES: [ItemType; 6] = [
        ItemType::Equipment,
        ItemType::Accessory,
        ItemType::Weapon,
        ItemType::Monster,
        ItemType::Demihuman,
        ItemType::Human,
    ];

    /// The folder name this category uses in game paths.
    pub const fn system_name(self) -> &'static str {
        match self {
            ItemType::Equipment => "equipment",
            ItemType::Accessory => "accessory",
            ItemType::Weapon => "weapon",
            ItemType::Monster => "monster",
            ItemType::Demihuman => "demihuman",
            ItemType::Human => "human",
            ItemType::Body => "body",
            ItemType::Face => "face",
            ItemType::Hair => "hair",
            ItemType::Tail => "tail",
            ItemType::Ear => "zear",
        }
    }

    /// The single-letter prefix this category uses in numbered segments.
    pub const fn prefix(self) -> char {
        match self {
            ItemType::Equipment => 'e',
            ItemType::Accessory => 'a',
            ItemType::Weapon => 'w',
            ItemType::Monster => 'm',
            ItemType::Demihuman => 'd',
            ItemType::Human => 'c',
            ItemType::Body => 'b',
            ItemType::Face => 'f',
            ItemType::Hair => 'h',
            ItemType::Tail => 't',
            ItemType::Ear => 'z',
        }
    }

    /// Looks up a category by its folder name.
    pub fn from_system_name(name: &str) -> Option<ItemType> {
        match name {
            "equipment" => Some(ItemType::Equipment),
            "accessory" => Some(ItemType::Accessory),
            "weapon" => Some(ItemType::Weapon),
            "monster" => Some(ItemType::Monster),
            "demihuman" => Some(ItemType::Demihuman),
            "human" => Some(ItemType::Human),
            "body" => Some(ItemType::Body),
            "face" => Some(ItemType::Face),
            "hair" => Some(ItemType::Hair),
            "tail" => Some(ItemType::Tail),
            "zear" => Some(ItemType::Ear),
            _ => None,
        }
    }

    /// Whether this category can appear as the primary type of a root.
    pub const fn is_root_type(self) -> bool {
        matches!(
            self,
            ItemType::Equipment
                | ItemType::Accessory
                | ItemType::Weapon
                | ItemType::Monster
                | ItemType::Demihuman
                | ItemType::Human
        )
    }

    /// Secondary categories a primary of this category may carry.
    ///
    /// An empty slice means the primary stands alone; anything else means a
    /// secondary of one of the listed categories is required.
    pub const fn secondary_kinds(self) -> &'static [ItemType] {
        match self {
            ItemType::Equipment | ItemType::Accessory => &[],
            ItemType::Weapon | ItemType::Monster => &[ItemType::Body],
            ItemType::Demihuman => &[ItemType::Equipment],
            ItemType::Human => &[
                ItemType::Body,
                ItemType::Face,
                ItemType::Hair,
                ItemType::Tail,
                ItemType::Ear,
            ],
            _ => &[],
        }
    }

    /// Whether roots of this primary category must carry a slot.
    pub const fn requires_slot(self) -> bool {
        matches!(
            self,
            ItemType::Equipment | ItemType::Accessory | ItemType::Demihuman
        )
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.system_name())
    }
}
