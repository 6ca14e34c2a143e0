//! Error types for file format parsing and manipulation.

use thiserror::Error;

/// Errors that can occur when reading or building LOD archives
#[derive(Debug, Error)]
pub enum LodError {
	/// Not enough data to parse the header
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error("Invalid magic number: {0:02X?}")]
	InvalidMagic([u8; 4]),

	/// The file table ends before all announced entries could be read
	#[error("Truncated file table: header announces {expected} entries, only {actual} could be read")]
	TruncatedTable {
		/// Number of entries announced by the header
		expected: u32,
		/// Number of complete entries actually present
		actual: usize,
	},

	/// An entry points outside of the underlying stream
	#[error(
		"Entry '{name}' spans bytes {offset}..{end}, but the archive only has {available} bytes"
	)]
	EntryOutOfBounds {
		/// Entry name
		name: String,
		/// Start offset of the stored bytes
		offset: u64,
		/// End offset of the stored bytes
		end: u64,
		/// Total stream length
		available: u64,
	},

	/// Decompressed payload does not match the declared size
	#[error("Entry '{name}' inflated to {actual} bytes, expected {expected} bytes")]
	SizeMismatch {
		/// Entry name
		name: String,
		/// Declared uncompressed size
		expected: usize,
		/// Actual number of bytes produced
		actual: usize,
	},

	/// Compressed payload is not a valid zlib stream
	#[error("Entry '{name}' could not be inflated: {source}")]
	InflateFailed {
		/// Entry name
		name: String,
		/// Underlying decoder error
		#[source]
		source: std::io::Error,
	},

	/// Entry lookup failed
	#[error("Entry not found: {0}")]
	EntryNotFound(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl LodError {
	/// Returns `true` if the error describes a damaged or unsupported archive
	/// rather than a failure of the underlying stream.
	pub fn is_corrupt(&self) -> bool {
		matches!(
			self,
			Self::InsufficientData { .. }
				| Self::InvalidMagic(_)
				| Self::TruncatedTable { .. }
				| Self::EntryOutOfBounds { .. }
				| Self::SizeMismatch { .. }
				| Self::InflateFailed { .. }
		)
	}
}

/// Errors that can occur when decoding or building DEF sprite files
#[derive(Debug, Error)]
pub enum DefError {
	/// Not enough data to parse a structure
	#[error("Insufficient data for {context}: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// What was being read
		context: &'static str,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Frame uses a compression mode this decoder does not know
	#[error("Frame '{frame}' uses unknown compression mode {mode}")]
	UnknownCompression {
		/// Frame name
		frame: String,
		/// Raw compression value
		mode: u32,
	},

	/// Frame body does not decode to the declared pixel count
	#[error("Malformed frame '{frame}': {reason}")]
	MalformedFrame {
		/// Frame name
		frame: String,
		/// Description of the mismatch
		reason: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl DefError {
	pub(crate) fn malformed(frame: &str, reason: impl Into<String>) -> Self {
		Self::MalformedFrame {
			frame: frame.to_string(),
			reason: reason.into(),
		}
	}
}
