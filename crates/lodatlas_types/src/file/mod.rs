//! File format support for `lodatlas`.

mod error;

pub mod def;
pub mod lod;

pub use error::{DefError, LodError};

pub use def::{File as DefFile, FileBuilder as DefFileBuilder};
pub use lod::{Archive as LodArchive, ArchiveBuilder as LodArchiveBuilder};
