//! DEF frame structures.

use std::fmt;

use crate::file::DefError;

/// Size of the per-frame header in bytes
pub const FRAME_HEADER_SIZE: usize = 32;

/// Pixel data encoding of a frame body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Compression {
	/// `width × height` bytes copied verbatim
	Raw = 0,
	/// Per-row u32 offsets, `(code, length)` byte pairs, `0xFF` marks literals
	RowRle = 1,
	/// Per-row u16 offsets, 3-bit code and 5-bit length packed in one byte
	PackedRle = 2,
	/// Like [`Compression::PackedRle`] with one offset per 32-pixel segment
	SegmentRle = 3,
}

impl Compression {
	/// Converts a raw mode value
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Raw),
			1 => Some(Self::RowRle),
			2 => Some(Self::PackedRle),
			3 => Some(Self::SegmentRle),
			_ => None,
		}
	}

	/// Converts back to the raw mode value
	pub fn to_u32(self) -> u32 {
		self as u32
	}
}

impl fmt::Display for Compression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Raw => write!(f, "raw"),
			Self::RowRle => write!(f, "row-rle"),
			Self::PackedRle => write!(f, "packed-rle"),
			Self::SegmentRle => write!(f, "segment-rle"),
		}
	}
}

/// Stored extents and placement of a frame inside its canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
	/// Stored (cropped) width
	pub width: u32,
	/// Stored (cropped) height
	pub height: u32,
	/// Canvas width
	pub full_width: u32,
	/// Canvas height
	pub full_height: u32,
	/// Horizontal draw offset inside the canvas
	pub offset_x: i32,
	/// Vertical draw offset inside the canvas
	pub offset_y: i32,
}

impl Geometry {
	/// Geometry of a frame that covers its whole canvas
	pub fn full(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			full_width: width,
			full_height: height,
			offset_x: 0,
			offset_y: 0,
		}
	}

	/// Returns the total number of stored pixels
	#[inline]
	pub fn pixel_count(&self) -> usize {
		(self.width as usize) * (self.height as usize)
	}

	/// Returns `true` if the stored extents cover the canvas without offset
	#[inline]
	pub fn is_full(&self) -> bool {
		self.offset_x == 0
			&& self.offset_y == 0
			&& self.width == self.full_width
			&& self.height == self.full_height
	}
}

impl fmt::Display for Geometry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}×{} in {}×{} at ({}, {})",
			self.width, self.height, self.full_width, self.full_height, self.offset_x, self.offset_y
		)
	}
}

/// Per-frame header (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
	/// Size of the body following the header
	pub data_size: u32,
	/// Body encoding
	pub compression: Compression,
	/// Extents and offsets
	pub geometry: Geometry,
}

impl FrameHeader {
	/// Parses a frame header; `name` is only used for error reporting
	pub fn from_bytes(name: &str, data: &[u8]) -> Result<Self, DefError> {
		if data.len() < FRAME_HEADER_SIZE {
			return Err(DefError::malformed(
				name,
				format!("frame header needs {FRAME_HEADER_SIZE} bytes, {} available", data.len()),
			));
		}

		let field = |index: usize| {
			let at = index * 4;
			u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
		};

		let mode = field(1);
		let compression = Compression::from_u32(mode).ok_or_else(|| DefError::UnknownCompression {
			frame: name.to_string(),
			mode,
		})?;

		Ok(Self {
			data_size: field(0),
			compression,
			geometry: Geometry {
				full_width: field(2),
				full_height: field(3),
				width: field(4),
				height: field(5),
				offset_x: field(6) as i32,
				offset_y: field(7) as i32,
			},
		})
	}

	/// Serializes the header
	pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
		let g = &self.geometry;
		let fields = [
			self.data_size,
			self.compression.to_u32(),
			g.full_width,
			g.full_height,
			g.width,
			g.height,
			g.offset_x as u32,
			g.offset_y as u32,
		];

		let mut buffer = [0u8; FRAME_HEADER_SIZE];
		for (chunk, value) in buffer.chunks_exact_mut(4).zip(fields) {
			chunk.copy_from_slice(&value.to_le_bytes());
		}
		buffer
	}
}

/// How a frame is placed by the atlas pipeline, fixed at decode time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
	/// Cropped sprite rendered with its draw offset
	Sprite,
	/// Terrain tile expanded to its full canvas
	Terrain {
		/// Rotation variant of the tile
		rotation: u32,
	},
}

impl FrameKind {
	/// Returns `true` for terrain tiles
	#[inline]
	pub fn is_terrain(&self) -> bool {
		matches!(self, Self::Terrain { .. })
	}
}

/// Position of a frame inside its sprite file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId {
	/// Index of the owning group
	pub group: usize,
	/// Index of the frame inside the group
	pub index: usize,
}

/// Decoded DEF frame.
///
/// Pixels are palette indices, one byte per pixel, `width × height` in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	name: String,
	id: FrameId,
	kind: FrameKind,
	compression: Compression,
	geometry: Geometry,
	pixels: Vec<u8>,
}

impl Frame {
	/// Creates a new frame.
	///
	/// # Panics
	///
	/// Panics if the pixel data length doesn't match the stored extents.
	pub fn new(
		name: impl Into<String>,
		id: FrameId,
		kind: FrameKind,
		compression: Compression,
		geometry: Geometry,
		pixels: Vec<u8>,
	) -> Self {
		assert_eq!(pixels.len(), geometry.pixel_count(), "Frame pixel data size mismatch");

		Self {
			name: name.into(),
			id,
			kind,
			compression,
			geometry,
			pixels,
		}
	}

	/// Logical frame name, the identity used for deduplication
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name under which the frame is packed
	///
	/// Terrain tiles carry their rotation as a `_<rotation>` suffix.
	pub fn packed_name(&self) -> String {
		match self.kind {
			FrameKind::Sprite => self.name.clone(),
			FrameKind::Terrain {
				rotation,
			} => format!("{}_{}", self.name, rotation),
		}
	}

	/// Position inside the sprite file
	#[inline]
	pub fn id(&self) -> FrameId {
		self.id
	}

	/// Placement kind
	#[inline]
	pub fn kind(&self) -> FrameKind {
		self.kind
	}

	/// Encoding the frame was stored with
	#[inline]
	pub fn compression(&self) -> Compression {
		self.compression
	}

	/// Extents and offsets
	#[inline]
	pub fn geometry(&self) -> &Geometry {
		&self.geometry
	}

	/// Stored width
	#[inline]
	pub fn width(&self) -> u32 {
		self.geometry.width
	}

	/// Stored height
	#[inline]
	pub fn height(&self) -> u32 {
		self.geometry.height
	}

	/// Palette indices
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} [{}] {}", self.name, self.compression, self.geometry)
	}
}
