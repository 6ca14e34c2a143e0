//! Prelude module for `lodatlas_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```no_run
//! use lodatlas_types::prelude::*;
//!
//! let lod = LodArchive::open("H3sprite.lod").unwrap();
//! let sprites = lod.list().iter().filter(|e| e.kind() == EntryKind::Sprite).count();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// DEF types
	DefError,
	DefFile,
	DefFileBuilder,

	// LOD types
	LodArchive,
	LodArchiveBuilder,
	LodError,
};

#[doc(inline)]
pub use crate::file::lod::{Entry, EntryKind, EntryType};

#[doc(inline)]
pub use crate::file::def::{
	Color, Compression, Frame, FrameId, FrameKind, FrameSpec, Geometry, Group, GroupSpec, Palette,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
