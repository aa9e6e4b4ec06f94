//! Common utilities for tomestone.
//!
//! This crate provides the foundational pieces shared by the tomestone
//! crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`Error`] / [`Result`] - Shared error type for binary parsing
//!
//! The game's metadata files are all little-endian; every read helper here
//! assumes that byte order.

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
