//! This crate provides the file formats read by `lodatlas`.
//!
//! # File Formats
//!
//! - **LOD**: Flat resource archives with an indexed file table and optionally zlib-compressed entries
//! - **DEF**: Palette-indexed sprite animations with run-length compressed frames
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use lodatlas_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut lod = LodArchive::open("H3sprite.lod")?;
//! let entry = *lod.find("avwangl.def").ok_or("missing")?;
//!
//! let data = lod.read_entry(&entry)?;
//! let def = DefFile::from_bytes(&data, entry.kind())?;
//! println!("{def}");
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use lodatlas_types::file::lod::Archive;
//!
//! let lod = Archive::open("H3bitmap.lod").unwrap();
//! // ...
//! ```

pub mod file;

/// `use lodatlas_types::prelude::*;` to import commonly used items.
pub mod prelude;
