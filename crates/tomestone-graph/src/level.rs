//! File classification and dependency levels.

use std::fmt;

use crate::parse;

/// Position of a file in the dependency hierarchy.
///
/// Levels are ordered from the synthetic root downwards, so `Root < Model <
/// Material < Texture`. [`DependencyLevel::Invalid`] sorts below everything
/// and marks files that take no part in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DependencyLevel {
    Invalid,
    Root,
    Model,
    Material,
    Texture,
}

impl DependencyLevel {
    /// Classifies a path directly to its dependency level.
    pub fn from_path(path: &str) -> DependencyLevel {
        FileType::from_path(path).level()
    }
}

impl fmt::Display for DependencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyLevel::Invalid => "invalid",
            DependencyLevel::Root => "root",
            DependencyLevel::Model => "model",
            DependencyLevel::Material => "material",
            DependencyLevel::Texture => "texture",
        };
        f.pad(name)
    }
}

/// Concrete kind of a dependency-tracked file.
///
/// Metadata record kinds ([`FileType::Eqp`], [`FileType::Eqdp`],
/// [`FileType::Imc`]) classify only when the path carries a `::<bits>` record
/// offset; the bare container files are not addressable on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FileType {
    Invalid,
    Root,
    Meta,
    Eqp,
    Eqdp,
    Imc,
    Mdl,
    Mtrl,
    Tex,
}

impl FileType {
    /// Classifies a path by extension and record offset presence.
    pub fn from_path(path: &str) -> FileType {
        let (base, offset) = parse::split_offset(path);
        let Some(ext) = parse::extension(base) else {
            return FileType::Invalid;
        };
        match ext {
            "root" => FileType::Root,
            "meta" => FileType::Meta,
            "mdl" => FileType::Mdl,
            "mtrl" => FileType::Mtrl,
            "tex" => FileType::Tex,
            "eqp" if offset.is_some() => FileType::Eqp,
            "eqdp" if offset.is_some() => FileType::Eqdp,
            "imc" if offset.is_some() => FileType::Imc,
            _ => FileType::Invalid,
        }
    }

    /// The dependency level files of this kind live at.
    ///
    /// Metadata records hang off the root, so every metadata kind maps to
    /// [`DependencyLevel::Root`].
    pub const fn level(self) -> DependencyLevel {
        match self {
            FileType::Invalid => DependencyLevel::Invalid,
            FileType::Root | FileType::Meta | FileType::Eqp | FileType::Eqdp | FileType::Imc => {
                DependencyLevel::Root
            }
            FileType::Mdl => DependencyLevel::Model,
            FileType::Mtrl => DependencyLevel::Material,
            FileType::Tex => DependencyLevel::Texture,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Invalid => "invalid",
            FileType::Root => "root",
            FileType::Meta => "meta",
            FileType::Eqp => "eqp",
            FileType::Eqdp => "eqdp",
            FileType::Imc => "imc",
            FileType::Mdl => "mdl",
            FileType::Mtrl => "mtrl",
            FileType::Tex => "tex",
        };
        f.pad(name)
    }
}
