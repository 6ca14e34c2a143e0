//! `.LOD` archive support for `lodatlas`.
//!
//! LOD archives are the resource containers of the Heroes III engine. A single
//! archive bundles sprites (`.def`), images, palettes, sounds and text tables
//! behind a flat file table.
//!
//! # File Structure
//!
//! | Offset | Size       | Field                                       |
//! |--------|------------|---------------------------------------------|
//! | 0x00   | 4          | `magic` (`"LOD\0"`)                         |
//! | 0x04   | 4          | `kind` (200 base game, 500 expansion)       |
//! | 0x08   | 4          | `entry_count`                               |
//! | 0x0C   | 80         | reserved                                    |
//! | 0x5C   | 32 × count | entry table                                 |
//!
//! Each entry record (32 bytes, little-endian):
//!
//! | Offset | Size | Field                                             |
//! |--------|------|---------------------------------------------------|
//! | 0x00   | 16   | name, NUL padded, Windows-1252                    |
//! | 0x10   | 4    | absolute offset of the stored bytes               |
//! | 0x14   | 4    | uncompressed size                                 |
//! | 0x18   | 4    | entry type                                        |
//! | 0x1C   | 4    | compressed size (0 when the entry is stored raw)  |
//!
//! Compressed entries are plain zlib streams.
//!
//! # Examples
//!
//! ```no_run
//! use lodatlas_types::file::lod::Archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut lod = Archive::open("H3sprite.lod")?;
//!
//! for entry in lod.list() {
//!     println!("{}: {} bytes ({})", entry.name(), entry.size, entry.entry_type);
//! }
//!
//! let data = lod.read_by_name("AVWANGL.DEF")?;
//! println!("read {} bytes", data.len());
//! # Ok(())
//! # }
//! ```

mod archive;
mod builder;
mod entry;


pub use archive::Archive;
pub use builder::ArchiveBuilder;
pub use entry::{Entry, EntryKind, EntryType, Header};

/// LOD archive constants.
pub mod constants {
	/// Magic bytes at the start of every archive
	pub const MAGIC: [u8; 4] = *b"LOD\0";

	/// Archive kind used by the base game
	pub const KIND_BASE: u32 = 200;

	/// Archive kind used by the expansions
	pub const KIND_EXPANSION: u32 = 500;

	/// Size of the reserved block following the entry count
	pub const RESERVED_SIZE: usize = 80;

	/// Size of the archive header, which is also the file table offset
	pub const HEADER_SIZE: usize = 12 + RESERVED_SIZE;

	/// Size of one file table record
	pub const ENTRY_SIZE: usize = 32;

	/// Size of the name field in a file table record
	pub const NAME_SIZE: usize = 16;
}
