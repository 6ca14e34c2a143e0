//! Prelude module for `lodatlas_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use lodatlas_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let converter = Converter::new(ConvertConfig::default());
//! let bytes = LodArchiveBuilder::new().build().unwrap();
//! let archive = LodArchive::from_reader(std::io::Cursor::new(bytes)).unwrap();
//! assert!(converter.select(&archive).is_empty());
//! ```

// Re-export everything from lodatlas_types::prelude
#[doc(inline)]
pub use lodatlas_types::prelude::*;

#[doc(inline)]
pub use lodatlas_atlas::{
	Atlas, AtlasError, ConvertConfig, Converter, DuplicatePolicy, PixelFormat, Stats,
};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use lodatlas_atlas;
#[doc(inline)]
pub use lodatlas_types;
