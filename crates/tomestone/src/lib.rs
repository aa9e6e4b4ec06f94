//! Tomestone - FFXIV character asset dependency analysis library.
//!
//! This crate provides a unified interface to the Tomestone library
//! ecosystem for working with character asset dependency trees.
//!
//! # Crates
//!
//! - [`tomestone_common`] - Common utilities (binary reading)
//! - [`tomestone_graph`] - Dependency graph resolution (roots, levels,
//!   metadata record offsets, traversal)
//!
//! # Example
//!
//! ```no_run
//! use tomestone::prelude::*;
//!
//! // Serve files from an extracted game tree
//! let files = DirectoryProvider::new("extracted");
//! let races = StaticRaceList::default();
//! let refs = EmptyRefs;
//! let graph = DependencyGraph::new(&files, &refs, &refs, &races, &refs);
//!
//! // Which item tree does this model belong to?
//! for root in graph.resolve_roots("chara/equipment/e6016/model/c0101e6016_top.mdl")? {
//!     println!("{root}");
//!     for record in graph.root(root.clone()).meta_record_paths()? {
//!         println!("  {record}");
//!     }
//! }
//! # Ok::<(), tomestone::graph::Error>(())
//! ```

// Re-export all sub-crates
pub use tomestone_common as common;
pub use tomestone_graph as graph;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tomestone_common::BinaryReader;
    pub use tomestone_graph::{
        DeformerProvider, DependencyGraph, DependencyLevel, DirectoryProvider, EmptyRefs,
        FileProvider, FileType, ItemType, MaterialReader, ModelReader, Race, Root, RootId,
        StaticRaceList, XrefCache,
    };
}

// Re-export commonly used types at the crate root
pub use tomestone_graph::{DependencyGraph, DependencyLevel, FileType, Race, Root, RootId};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
