//! `.DEF` sprite support for `lodatlas`.
//!
//! DEF files hold palette-indexed animations. Frames are organized in groups
//! (one animation cycle each); every frame slot of a group carries a file name
//! and an offset to a frame record, and several slots may share one record.
//!
//! # File Structure
//!
//! | Offset | Size        | Field                                  |
//! |--------|-------------|----------------------------------------|
//! | 0x000  | 4           | sprite type                            |
//! | 0x004  | 4           | full width                             |
//! | 0x008  | 4           | full height                            |
//! | 0x00C  | 4           | group count                            |
//! | 0x010  | 768         | palette (256 × RGB)                    |
//! | 0x310  | variable    | groups                                 |
//!
//! Each group: `id: u32`, `frame_count: u32`, two reserved `u32`, then
//! `frame_count` 13-byte names followed by `frame_count` absolute `u32` offsets.
//!
//! Each frame record starts with a 32-byte header (`data_size`, `compression`,
//! `full_width`, `full_height`, `width`, `height`, `left: i32`, `top: i32`)
//! followed by the body described in [`decode`].
//!
//! # Examples
//!
//! ```
//! use lodatlas_types::file::def::{File, FileBuilder, FrameSpec, GroupSpec};
//! use lodatlas_types::file::lod::{EntryKind, EntryType};
//!
//! let bytes = FileBuilder::new(EntryType::MapObject, 32, 32)
//!     .group(GroupSpec::new(0).frame(FrameSpec::new("castle0.pcx", 2, 2, vec![0, 8, 8, 0])))
//!     .build()
//!     .unwrap();
//!
//! let def = File::from_bytes(&bytes, EntryKind::MapObject).unwrap();
//! assert_eq!(def.frames().count(), 1);
//! assert_eq!(def.groups()[0].aliases(), ["castle0.pcx"]);
//! ```

mod builder;
pub mod decode;
pub mod encode;
mod frame;
mod palette;


use std::collections::{HashMap, hash_map};
use std::fmt;

use encoding_rs::WINDOWS_1252;

pub use builder::{FileBuilder, FrameSpec, GroupSpec};
pub use frame::{Compression, FRAME_HEADER_SIZE, Frame, FrameHeader, FrameId, FrameKind, Geometry};
pub use palette::{Color, Palette};

use super::DefError;
use super::lod::{EntryKind, EntryType};

/// DEF file constants.
pub mod constants {
	/// Size of the fixed header fields preceding the palette
	pub const HEADER_SIZE: usize = 16;

	/// Offset of the first group record
	pub const GROUPS_OFFSET: usize = HEADER_SIZE + super::Palette::BYTE_SIZE;

	/// Size of the fixed part of a group record
	pub const GROUP_HEADER_SIZE: usize = 16;

	/// Size of a frame name slot
	pub const NAME_SIZE: usize = 13;
}

/// Animation cycle of a sprite file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
	id: u32,
	aliases: Vec<String>,
	frames: Vec<Frame>,
}

impl Group {
	/// Group identifier (animation kind)
	#[inline]
	pub fn id(&self) -> u32 {
		self.id
	}

	/// File names of the group's frame slots, in slot order
	#[inline]
	pub fn aliases(&self) -> &[String] {
		&self.aliases
	}

	/// Decoded frames, one per slot
	#[inline]
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}
}

/// Decoded DEF sprite file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	def_type: EntryType,
	full_width: u32,
	full_height: u32,
	palette: Palette,
	groups: Vec<Group>,
}

impl File {
	/// Parses and decodes a complete sprite file.
	///
	/// `kind` is the classification of the archive entry the bytes were read
	/// from; frames of terrain entries are tagged [`FrameKind::Terrain`].
	///
	/// # Errors
	///
	/// Returns [`DefError`] if the header, palette or group table is cut short,
	/// if a frame uses an unknown compression mode or if a frame body does not
	/// decode to exactly its declared extents.
	pub fn from_bytes(data: &[u8], kind: EntryKind) -> Result<Self, DefError> {
		if data.len() < constants::GROUPS_OFFSET {
			return Err(DefError::InsufficientData {
				context: "header",
				expected: constants::GROUPS_OFFSET,
				actual: data.len(),
			});
		}

		let def_type = EntryType::from_u32(read_u32(data, 0));
		let full_width = read_u32(data, 4);
		let full_height = read_u32(data, 8);
		let group_count = read_u32(data, 12) as usize;
		let palette = Palette::from_bytes(&data[constants::HEADER_SIZE..constants::GROUPS_OFFSET])?;

		let frame_kind = match kind {
			EntryKind::Terrain => FrameKind::Terrain {
				rotation: 0,
			},
			_ => FrameKind::Sprite,
		};

		// Slots sharing a frame record decode it once
		let mut decoded: HashMap<u32, (FrameHeader, Vec<u8>)> = HashMap::new();
		let mut groups = Vec::with_capacity(group_count.min(64));
		let mut pos = constants::GROUPS_OFFSET;

		for group_index in 0..group_count {
			let fixed = slice(data, pos, constants::GROUP_HEADER_SIZE, "group header")?;
			let id = read_u32(fixed, 0);
			let frame_count = read_u32(fixed, 4) as usize;
			pos += constants::GROUP_HEADER_SIZE;

			let names_len = frame_count.saturating_mul(constants::NAME_SIZE);
			let names = slice(data, pos, names_len, "group names")?;
			pos += names_len;

			let offsets_len = frame_count.saturating_mul(4);
			let offsets = slice(data, pos, offsets_len, "group offsets")?;
			pos += offsets_len;

			let mut aliases = Vec::with_capacity(frame_count);
			let mut frames = Vec::with_capacity(frame_count);

			for (index, (raw_name, raw_offset)) in
				names.chunks_exact(constants::NAME_SIZE).zip(offsets.chunks_exact(4)).enumerate()
			{
				let name = decode_name(raw_name);
				let offset = read_u32(raw_offset, 0);

				let (header, pixels) = match decoded.entry(offset) {
					hash_map::Entry::Occupied(slot) => slot.into_mut(),
					hash_map::Entry::Vacant(slot) => slot.insert(decode_frame(data, offset, &name)?),
				};

				frames.push(Frame::new(
					name.clone(),
					FrameId {
						group: group_index,
						index,
					},
					frame_kind,
					header.compression,
					header.geometry,
					pixels.clone(),
				));
				aliases.push(name);
			}

			groups.push(Group {
				id,
				aliases,
				frames,
			});
		}

		Ok(Self {
			def_type,
			full_width,
			full_height,
			palette,
			groups,
		})
	}

	/// Sprite type from the file header
	#[inline]
	pub fn def_type(&self) -> EntryType {
		self.def_type
	}

	/// Canvas width declared by the file header
	#[inline]
	pub fn full_width(&self) -> u32 {
		self.full_width
	}

	/// Canvas height declared by the file header
	#[inline]
	pub fn full_height(&self) -> u32 {
		self.full_height
	}

	/// Embedded palette
	#[inline]
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Groups in file order
	#[inline]
	pub fn groups(&self) -> &[Group] {
		&self.groups
	}

	/// Iterates over every frame slot in group order, then slot order
	pub fn frames(&self) -> impl Iterator<Item = &Frame> {
		self.groups.iter().flat_map(|group| group.frames.iter())
	}

	/// Returns the frame at `id`
	pub fn frame(&self, id: FrameId) -> Option<&Frame> {
		self.groups.get(id.group)?.frames.get(id.index)
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"DEF {} {}×{}, {} groups, {} frames",
			self.def_type,
			self.full_width,
			self.full_height,
			self.groups.len(),
			self.frames().count()
		)
	}
}

fn decode_frame(data: &[u8], offset: u32, name: &str) -> Result<(FrameHeader, Vec<u8>), DefError> {
	let start = offset as usize;
	let Some(record) = data.get(start..) else {
		return Err(DefError::malformed(
			name,
			format!("frame offset {start} lies beyond the {} byte file", data.len()),
		));
	};

	let header = FrameHeader::from_bytes(name, record)?;
	let body = &record[FRAME_HEADER_SIZE..];
	let body = &body[..body.len().min(header.data_size as usize)];

	let pixels = decode::decode_body(name, header.compression, &header.geometry, body)?;
	Ok((header, pixels))
}

fn decode_name(raw: &[u8]) -> String {
	let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
	let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&raw[..end]);
	decoded.into_owned()
}

fn slice<'a>(
	data: &'a [u8],
	pos: usize,
	len: usize,
	context: &'static str,
) -> Result<&'a [u8], DefError> {
	data.get(pos..pos.saturating_add(len)).ok_or(DefError::InsufficientData {
		context,
		expected: pos.saturating_add(len),
		actual: data.len(),
	})
}

#[inline]
fn read_u32(data: &[u8], at: usize) -> u32 {
	u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
