//! Sprite file construction and serialization.

use std::collections::HashMap;

use encoding_rs::WINDOWS_1252;

use super::constants;
use super::encode::encode_body;
use super::frame::{Compression, FrameHeader, Geometry};
use super::palette::Palette;
use crate::file::DefError;
use crate::file::lod::EntryType;

/// A frame queued for writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
	name: String,
	geometry: Geometry,
	compression: Compression,
	pixels: Vec<u8>,
}

impl FrameSpec {
	/// Creates a frame covering a `width × height` canvas, stored with
	/// [`Compression::RowRle`]
	pub fn new(name: &str, width: u32, height: u32, pixels: Vec<u8>) -> Self {
		Self {
			name: name.to_string(),
			geometry: Geometry::full(width, height),
			compression: Compression::RowRle,
			pixels,
		}
	}

	/// Places the stored pixels at `(offset_x, offset_y)` inside a larger canvas
	pub fn canvas(mut self, full_width: u32, full_height: u32, offset_x: i32, offset_y: i32) -> Self {
		self.geometry.full_width = full_width;
		self.geometry.full_height = full_height;
		self.geometry.offset_x = offset_x;
		self.geometry.offset_y = offset_y;
		self
	}

	/// Sets the body encoding
	pub fn compression(mut self, compression: Compression) -> Self {
		self.compression = compression;
		self
	}
}

/// A group queued for writing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
	id: u32,
	frames: Vec<FrameSpec>,
}

impl GroupSpec {
	/// Creates an empty group
	pub fn new(id: u32) -> Self {
		Self {
			id,
			frames: Vec::new(),
		}
	}

	/// Appends a frame slot
	pub fn frame(mut self, frame: FrameSpec) -> Self {
		self.frames.push(frame);
		self
	}
}

/// Builder producing a complete sprite file in memory.
///
/// Frame records are written after the group table in slot order. Slots whose
/// name was already written point at the earlier record instead of storing the
/// frame again, the way stock files share frames between groups.
#[derive(Debug, Clone)]
pub struct FileBuilder {
	def_type: EntryType,
	full_width: u32,
	full_height: u32,
	palette: Palette,
	groups: Vec<GroupSpec>,
}

impl FileBuilder {
	/// Creates an empty builder with a grayscale palette
	pub fn new(def_type: EntryType, full_width: u32, full_height: u32) -> Self {
		Self {
			def_type,
			full_width,
			full_height,
			palette: Palette::grayscale(),
			groups: Vec::new(),
		}
	}

	/// Replaces the palette
	pub fn palette(mut self, palette: Palette) -> Self {
		self.palette = palette;
		self
	}

	/// Appends a group
	pub fn group(mut self, group: GroupSpec) -> Self {
		self.groups.push(group);
		self
	}

	/// Serializes the sprite file
	///
	/// # Errors
	///
	/// Returns [`DefError::MalformedFrame`] if a frame's pixels cannot be
	/// encoded with the requested compression.
	pub fn build(&self) -> Result<Vec<u8>, DefError> {
		let table_size: usize = self
			.groups
			.iter()
			.map(|g| constants::GROUP_HEADER_SIZE + g.frames.len() * (constants::NAME_SIZE + 4))
			.sum();

		let mut out = Vec::with_capacity(constants::GROUPS_OFFSET + table_size);
		out.extend_from_slice(&self.def_type.to_u32().to_le_bytes());
		out.extend_from_slice(&self.full_width.to_le_bytes());
		out.extend_from_slice(&self.full_height.to_le_bytes());
		out.extend_from_slice(&(self.groups.len() as u32).to_le_bytes());
		out.extend_from_slice(&self.palette.to_bytes());

		let mut records = Vec::new();
		let mut written: HashMap<&str, u32> = HashMap::new();
		let records_start = constants::GROUPS_OFFSET + table_size;

		for group in &self.groups {
			out.extend_from_slice(&group.id.to_le_bytes());
			out.extend_from_slice(&(group.frames.len() as u32).to_le_bytes());
			out.extend_from_slice(&[0u8; 8]);

			for frame in &group.frames {
				out.extend_from_slice(&encode_name(&frame.name));
			}

			for frame in &group.frames {
				let offset = match written.get(frame.name.as_str()) {
					Some(&offset) => offset,
					None => {
						let offset = (records_start + records.len()) as u32;
						write_record(frame, &mut records)?;
						written.insert(&frame.name, offset);
						offset
					}
				};
				out.extend_from_slice(&offset.to_le_bytes());
			}
		}

		out.extend_from_slice(&records);
		Ok(out)
	}
}

fn write_record(frame: &FrameSpec, out: &mut Vec<u8>) -> Result<(), DefError> {
	let geometry = &frame.geometry;
	let body =
		encode_body(&frame.name, frame.compression, geometry.width, geometry.height, &frame.pixels)?;

	let header = FrameHeader {
		data_size: body.len() as u32,
		compression: frame.compression,
		geometry: *geometry,
	};
	out.extend_from_slice(&header.to_bytes());
	out.extend_from_slice(&body);
	Ok(())
}

fn encode_name(name: &str) -> [u8; constants::NAME_SIZE] {
	let mut raw = [0u8; constants::NAME_SIZE];
	let (encoded, _, _) = WINDOWS_1252.encode(name);
	let len = encoded.len().min(constants::NAME_SIZE - 1);
	raw[..len].copy_from_slice(&encoded[..len]);
	raw
}
