//! This module is separated into its own crate to collect the `lodatlas` crates behind one path, and should not be used directly.

/// `use lodatlas::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use lodatlas_atlas;
pub use lodatlas_types;

// Re-export commonly used types at crate root
pub use lodatlas_atlas::{AtlasError, ConvertConfig, Converter, DuplicatePolicy, PixelFormat};
pub use lodatlas_types::file::{DefError, DefFile, LodArchive, LodError};
