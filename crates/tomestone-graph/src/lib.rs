//! Dependency graph resolution for FFXIV character asset files.
//!
//! Game files that make up a piece of equipment, an accessory, a weapon or a
//! character part form a fixed four-level hierarchy: a synthetic *root* sits
//! above the models it owns, each model references materials, and each
//! material references textures. Alongside that chain, shared metadata tables
//! (EQP, EQDP, IMC) carry per-item records that are addressed by bit offset
//! rather than by file.
//!
//! This crate answers three questions about any internal game path:
//!
//! * what is it? ([`FileType`], [`DependencyLevel`])
//! * which item trees does it belong to? ([`DependencyGraph::resolve_roots`])
//! * what sits above, below and beside it? ([`DependencyGraph::parents`],
//!   [`DependencyGraph::children`], [`DependencyGraph::siblings`])
//!
//! # Architecture
//!
//! Identity handling is pure: [`RootId`] values are built from typed fields or
//! recovered from paths by structural parsing, and every derived path (root
//! folder, model paths, metadata record paths) is string arithmetic over the
//! identity. Anything that needs actual game data goes through the collaborator
//! traits in [`provider`], so the engine itself never touches an archive
//! format.
//!
//! # Example
//!
//! ```
//! use tomestone_graph::{DependencyLevel, FileType, RootId};
//!
//! let root = RootId::equipment(6016, "top").unwrap();
//! assert_eq!(root.root_path(), "chara/equipment/e6016/e6016_top.root");
//!
//! let mdl = "chara/equipment/e6016/model/c0101e6016_top.mdl";
//! assert_eq!(FileType::from_path(mdl), FileType::Mdl);
//! assert_eq!(DependencyLevel::from_path(mdl), DependencyLevel::Model);
//!
//! let recovered = RootId::extract(mdl).unwrap();
//! assert_eq!(recovered, root);
//! ```

mod error;

pub mod graph;
pub mod item;
pub mod level;
pub mod meta;
pub mod parse;
pub mod provider;
pub mod race;
pub mod root;

pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use item::ItemType;
pub use level::{DependencyLevel, FileType};
pub use provider::{
    DeformerProvider, DirectoryProvider, EmptyRefs, FileProvider, MaterialReader, ModelReader,
    StaticRaceList, XrefCache,
};
pub use race::Race;
pub use root::{Root, RootId};
