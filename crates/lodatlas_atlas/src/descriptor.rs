//! libGDX `TextureAtlas` descriptor text.
//!
//! ```text
//!
//! assets_0.png
//! size: 2048,2048
//! format: RGBA8888
//! filter: Nearest,Nearest
//! repeat: none
//! castle
//!   rotate: false
//!   xy: 0, 0
//!   size: 32, 32
//!   orig: 32, 32
//!   offset: 0, 0
//!   index: 0
//! ```
//!
//! Each page block starts with an empty line. Records of a page follow its
//! header in placement order; one packed frame yields one record per group
//! slot that refers to it.

use std::fmt::{self, Write};

use lodatlas_types::file::def::{FrameKind, Geometry};

use crate::config::PixelFormat;
use crate::packer::Rect;

/// Texture filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
	/// Nearest neighbor filtering
	#[default]
	Nearest,
	/// Linear filtering
	Linear,
}

impl FilterMode {
	/// Name used in the descriptor
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Nearest => "Nearest",
			Self::Linear => "Linear",
		}
	}
}

/// Texture repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
	/// Clamp to edge
	#[default]
	None,
	/// Repeat horizontally
	X,
	/// Repeat vertically
	Y,
	/// Repeat in both directions
	XY,
}

impl RepeatMode {
	/// Name used in the descriptor
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::X => "x",
			Self::Y => "y",
			Self::XY => "xy",
		}
	}
}

/// Header of one page block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
	/// Raster file name, relative to the descriptor
	pub file_name: String,
	/// Page width
	pub width: u32,
	/// Page height
	pub height: u32,
	/// Raster pixel format
	pub format: PixelFormat,
	/// Minification and magnification filters
	pub filter: (FilterMode, FilterMode),
	/// Repeat mode
	pub repeat: RepeatMode,
}

impl PageHeader {
	/// Creates a header with nearest filtering and no repeat
	pub fn new(file_name: impl Into<String>, width: u32, height: u32, format: PixelFormat) -> Self {
		Self {
			file_name: file_name.into(),
			width,
			height,
			format,
			filter: (FilterMode::Nearest, FilterMode::Nearest),
			repeat: RepeatMode::None,
		}
	}
}

/// One named region record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	/// Display name
	pub name: String,
	/// Top-left corner on the page
	pub xy: (u32, u32),
	/// Packed size
	pub size: (u32, u32),
	/// Canvas size
	pub orig: (u32, u32),
	/// Draw offset inside the canvas
	pub offset: (i32, i32),
	/// Animation slot or terrain rotation
	pub index: u32,
}

/// Everything needed to emit the records of one packed frame
#[derive(Debug, Clone, Copy)]
pub struct PackedRegion<'a> {
	/// Archive entry the frame came from
	pub entry: &'a str,
	/// Slot names of the frame's group
	pub aliases: &'a [String],
	/// Logical frame name
	pub frame_name: &'a str,
	/// Frame kind
	pub kind: FrameKind,
	/// Packed rectangle
	pub rect: Rect,
	/// Geometry after terrain expansion
	pub geometry: Geometry,
}

/// Display name of an archive entry: lower-cased, `.def` stripped
pub fn display_name(entry: &str) -> String {
	let lower = entry.to_lowercase();
	match lower.strip_suffix(".def") {
		Some(stem) => stem.to_string(),
		None => lower,
	}
}

/// Expands a packed frame into one record per group slot naming it.
///
/// Sprites are named after their entry and indexed by slot. Terrain records
/// are named `<entry>/<slot>` and indexed by rotation.
pub fn fan_out(region: &PackedRegion<'_>) -> Vec<Record> {
	let base = display_name(region.entry);
	let g = &region.geometry;

	region
		.aliases
		.iter()
		.enumerate()
		.filter(|(_, alias)| alias.as_str() == region.frame_name)
		.map(|(slot, _)| {
			let (name, index) = match region.kind {
				FrameKind::Sprite => (base.clone(), slot as u32),
				FrameKind::Terrain {
					rotation,
				} => (format!("{base}/{slot}"), rotation),
			};
			Record {
				name,
				xy: (region.rect.x, region.rect.y),
				size: (g.width, g.height),
				orig: (g.full_width, g.full_height),
				offset: (g.offset_x, g.offset_y),
				index,
			}
		})
		.collect()
}

/// Complete descriptor, built page by page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
	pages: Vec<(PageHeader, Vec<Record>)>,
}

impl Descriptor {
	/// Creates an empty descriptor
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new page block
	pub fn push_page(&mut self, header: PageHeader) {
		self.pages.push((header, Vec::new()));
	}

	/// Appends records to the last page block
	///
	/// Records pushed before the first page are dropped.
	pub fn extend_records(&mut self, records: impl IntoIterator<Item = Record>) {
		if let Some((_, page_records)) = self.pages.last_mut() {
			page_records.extend(records);
		}
	}

	/// Page blocks in order
	pub fn pages(&self) -> &[(PageHeader, Vec<Record>)] {
		&self.pages
	}

	/// Total number of records
	pub fn record_count(&self) -> usize {
		self.pages.iter().map(|(_, records)| records.len()).sum()
	}
}

impl fmt::Display for PageHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_char('\n')?;
		writeln!(f, "{}", self.file_name)?;
		writeln!(f, "size: {},{}", self.width, self.height)?;
		writeln!(f, "format: {}", self.format)?;
		writeln!(f, "filter: {},{}", self.filter.0.as_str(), self.filter.1.as_str())?;
		writeln!(f, "repeat: {}", self.repeat.as_str())
	}
}

impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}", self.name)?;
		writeln!(f, "  rotate: false")?;
		writeln!(f, "  xy: {}, {}", self.xy.0, self.xy.1)?;
		writeln!(f, "  size: {}, {}", self.size.0, self.size.1)?;
		writeln!(f, "  orig: {}, {}", self.orig.0, self.orig.1)?;
		writeln!(f, "  offset: {}, {}", self.offset.0, self.offset.1)?;
		writeln!(f, "  index: {}", self.index)
	}
}

impl fmt::Display for Descriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (header, records) in &self.pages {
			write!(f, "{header}")?;
			for record in records {
				write!(f, "{record}")?;
			}
		}
		Ok(())
	}
}
