//! Collaborator traits the graph engine depends on.
//!
//! The engine never parses archives, models or materials itself; consumers
//! supply those capabilities through the traits here. A minimal offline setup
//! is bundled: [`DirectoryProvider`] serves files from an extracted game
//! tree, [`StaticRaceList`] reports a fixed set of races, and [`EmptyRefs`]
//! stands in where no reference data is available.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::race::Race;
use crate::Result;

/// Access to raw file data by internal game path.
pub trait FileProvider: Send + Sync {
    /// Reads a file's full contents, or `None` when it does not exist.
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// The data offset of a file within its container, `0` when absent.
    fn data_offset(&self, path: &str) -> Result<u64>;
}

/// Extraction of material references from model files.
pub trait ModelReader: Send + Sync {
    /// The material paths a model references.
    ///
    /// `include_skin` asks for skin materials to be included alongside the
    /// model's own; it is set when the model belongs to a human body tree.
    fn referenced_materials(&self, model_path: &str, include_skin: bool) -> Result<Vec<String>>;
}

/// Extraction of texture references from material files.
pub trait MaterialReader: Send + Sync {
    /// The texture paths a material references.
    fn referenced_textures(&self, material_path: &str) -> Result<Vec<String>>;
}

/// Access to racial deformation data.
pub trait DeformerProvider: Send + Sync {
    /// The races an equipment or accessory set has models for.
    fn available_races(&self, primary_id: u16, slot: &str) -> Result<Vec<Race>>;
}

/// Reverse lookup of declared file relationships.
///
/// Textures carry no identity of their own, so discovering which trees use
/// one requires previously recorded parent links.
pub trait XrefCache: Send + Sync {
    /// The parent paths recorded for a child path.
    fn declared_parents(&self, child_path: &str) -> Result<Vec<String>>;
}

/// A [`FileProvider`] over a directory of extracted game files.
///
/// Internal paths are resolved segment by segment under the base directory.
/// Plain files have no container offset, so [`FileProvider::data_offset`]
/// reports `1` for any file that exists.
pub struct DirectoryProvider {
    base: PathBuf,
}

impl DirectoryProvider {
    /// Creates a provider rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> DirectoryProvider {
        DirectoryProvider { base: base.into() }
    }

    /// The directory files are served from.
    #[inline]
    pub fn base(&self) -> &std::path::Path {
        &self.base
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.base.clone();
        for part in path.split('/') {
            full.push(part);
        }
        full
    }
}

impl FileProvider for DirectoryProvider {
    fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.resolve(path)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn data_offset(&self, path: &str) -> Result<u64> {
        Ok(u64::from(self.resolve(path).is_file()))
    }
}

/// A [`DeformerProvider`] that reports the same races for every set.
///
/// Defaults to all playable races, which over-reports model paths for sets
/// with racial gaps but never misses one.
pub struct StaticRaceList {
    races: Vec<Race>,
}

impl StaticRaceList {
    /// Creates a list reporting exactly `races`.
    pub fn new(races: Vec<Race>) -> StaticRaceList {
        StaticRaceList { races }
    }
}

impl Default for StaticRaceList {
    fn default() -> StaticRaceList {
        StaticRaceList {
            races: Race::PLAYABLE.to_vec(),
        }
    }
}

impl DeformerProvider for StaticRaceList {
    fn available_races(&self, _primary_id: u16, _slot: &str) -> Result<Vec<Race>> {
        Ok(self.races.clone())
    }
}

/// A stub collaborator that reports nothing.
///
/// Implements every data-backed trait with empty results, so it can stand in
/// for any collaborator when only identity and metadata offset operations are
/// needed.
pub struct EmptyRefs;

impl FileProvider for EmptyRefs {
    fn read_file(&self, _path: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn data_offset(&self, _path: &str) -> Result<u64> {
        Ok(0)
    }
}

impl ModelReader for EmptyRefs {
    fn referenced_materials(&self, _model_path: &str, _include_skin: bool) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

impl MaterialReader for EmptyRefs {
    fn referenced_textures(&self, _material_path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

impl XrefCache for EmptyRefs {
    fn declared_parents(&self, _child_path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
