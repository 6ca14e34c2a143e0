//! Error type of the conversion pipeline.

use lodatlas_types::file::{DefError, LodError};
use thiserror::Error;

/// Errors that abort an atlas conversion
#[derive(Debug, Error)]
pub enum AtlasError {
	/// The archive is damaged or could not be read
	#[error("Archive error: {0}")]
	Archive(#[from] LodError),

	/// A sprite entry could not be decoded
	#[error("Sprite '{entry}' could not be decoded: {source}")]
	Sprite {
		/// Archive entry name
		entry: String,
		/// Decoder error
		#[source]
		source: DefError,
	},

	/// A bitmap does not fit on an empty page
	#[error("Frame '{name}' ({width}×{height}) does not fit a {page_width}×{page_height} page")]
	PageOverflow {
		/// Packed frame name
		name: String,
		/// Bitmap width, padding excluded
		width: u32,
		/// Bitmap height, padding excluded
		height: u32,
		/// Page width
		page_width: u32,
		/// Page height
		page_height: u32,
	},

	/// Two different frames share a name while duplicates are rejected
	#[error("Frame '{name}' in '{entry}' differs from the frame of the same name in '{first_entry}'")]
	DuplicateFrame {
		/// Frame name
		name: String,
		/// Entry that provided the packed frame
		first_entry: String,
		/// Entry with the conflicting frame
		entry: String,
	},

	/// Page encoding failed
	#[error("Image error: {0}")]
	Image(#[from] image::ImageError),

	/// Configuration could not be loaded
	#[error("Configuration error: {0}")]
	Config(#[from] config::ConfigError),

	/// Invalid option value
	#[error("Invalid option: {0}")]
	InvalidOption(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl AtlasError {
	pub(crate) fn sprite(entry: &str, source: DefError) -> Self {
		Self::Sprite {
			entry: entry.to_string(),
			source,
		}
	}
}
