//! Conversion of LOD archives into libGDX texture atlases.
//!
//! The pipeline reads the selected sprite entries of an archive, turns every
//! distinct frame into an RGBA bitmap, packs the bitmaps onto fixed-size pages
//! and writes the pages as PNG together with a `.atlas` descriptor.
//!
//! # Examples
//!
//! ```no_run
//! use lodatlas_atlas::{ConvertConfig, Converter};
//! use lodatlas_types::file::lod::Archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut lod = Archive::open("H3sprite.lod")?;
//! let converter = Converter::new(ConvertConfig::default());
//!
//! let (files, stats) = converter.convert(&mut lod, "out".as_ref())?;
//! println!("{} -> {}", stats, files.descriptor.display());
//! # Ok(())
//! # }
//! ```

mod error;

pub mod compositor;
pub mod config;
pub mod converter;
pub mod descriptor;
pub mod packer;
pub mod terrain;
pub mod writer;

pub use config::{ConvertConfig, DuplicatePolicy, PixelFormat};
pub use converter::{Atlas, Converter, Stats};
pub use error::AtlasError;
