//! Header and file table records of LOD archives.

use std::fmt::Formatter;
use std::io::Read;

use encoding_rs::WINDOWS_1252;

use super::constants;
use crate::file::LodError;

/// Archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// Magic Number
	pub magic: [u8; 4],
	/// Archive kind
	pub kind: u32,
	/// Number of entries in the file table
	pub entry_count: u32,
}

impl Header {
	/// Creates a new header with the specified number of entries
	pub fn new(kind: u32, entry_count: u32) -> Self {
		Self {
			magic: constants::MAGIC,
			kind,
			entry_count,
		}
	}

	/// Loads header from a byte slice
	pub fn from_bytes(data: &[u8]) -> Result<Self, LodError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(LodError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}

		let magic = [data[0], data[1], data[2], data[3]];
		if magic != constants::MAGIC {
			return Err(LodError::InvalidMagic(magic));
		}

		Ok(Self {
			magic,
			kind: read_u32(data, 4),
			entry_count: read_u32(data, 8),
		})
	}

	/// Loads header from any reader
	///
	/// The reserved block is consumed as well, leaving the reader at the file table.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, LodError> {
		let mut buffer = Vec::with_capacity(constants::HEADER_SIZE);
		reader.take(constants::HEADER_SIZE as u64).read_to_end(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Serializes header (including the zeroed reserved block) to bytes
	pub fn to_bytes(self) -> [u8; constants::HEADER_SIZE] {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		buffer[0..4].copy_from_slice(&self.magic);
		buffer[4..8].copy_from_slice(&self.kind.to_le_bytes());
		buffer[8..12].copy_from_slice(&self.entry_count.to_le_bytes());
		buffer
	}
}

impl std::fmt::Display for Header {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "LOD {{ kind: {}, entries: {} }}", self.kind, self.entry_count)
	}
}

/// Entry type code stored in the file table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
	/// Spell animation (0x40)
	Spell,
	/// Generic sprite (0x41)
	Sprite,
	/// Combat creature (0x42)
	Creature,
	/// Adventure map object (0x43)
	MapObject,
	/// Adventure map hero (0x44)
	MapHero,
	/// Terrain tile set (0x45)
	Terrain,
	/// Mouse cursor (0x46)
	Cursor,
	/// Interface element (0x47)
	Interface,
	/// Single sprite frame (0x48)
	SpriteFrame,
	/// Combat hero (0x49)
	CombatHero,
	/// Anything else, kept verbatim
	Unknown(u32),
}

impl EntryType {
	/// Converts a raw type code
	pub fn from_u32(value: u32) -> Self {
		match value {
			0x40 => Self::Spell,
			0x41 => Self::Sprite,
			0x42 => Self::Creature,
			0x43 => Self::MapObject,
			0x44 => Self::MapHero,
			0x45 => Self::Terrain,
			0x46 => Self::Cursor,
			0x47 => Self::Interface,
			0x48 => Self::SpriteFrame,
			0x49 => Self::CombatHero,
			other => Self::Unknown(other),
		}
	}

	/// Converts back to the raw type code
	pub fn to_u32(self) -> u32 {
		match self {
			Self::Spell => 0x40,
			Self::Sprite => 0x41,
			Self::Creature => 0x42,
			Self::MapObject => 0x43,
			Self::MapHero => 0x44,
			Self::Terrain => 0x45,
			Self::Cursor => 0x46,
			Self::Interface => 0x47,
			Self::SpriteFrame => 0x48,
			Self::CombatHero => 0x49,
			Self::Unknown(value) => value,
		}
	}

	/// Coarse classification used by the atlas pipeline
	pub fn kind(self) -> EntryKind {
		match self {
			Self::Terrain => EntryKind::Terrain,
			Self::Sprite => EntryKind::Sprite,
			Self::MapObject => EntryKind::MapObject,
			_ => EntryKind::Other,
		}
	}
}

impl std::fmt::Display for EntryType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Spell => write!(f, "Spell"),
			Self::Sprite => write!(f, "Sprite"),
			Self::Creature => write!(f, "Creature"),
			Self::MapObject => write!(f, "MapObject"),
			Self::MapHero => write!(f, "MapHero"),
			Self::Terrain => write!(f, "Terrain"),
			Self::Cursor => write!(f, "Cursor"),
			Self::Interface => write!(f, "Interface"),
			Self::SpriteFrame => write!(f, "SpriteFrame"),
			Self::CombatHero => write!(f, "CombatHero"),
			Self::Unknown(value) => write!(f, "Unknown(0x{value:02X})"),
		}
	}
}

/// How an entry is treated by the atlas pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
	/// Terrain tiles, expanded to full canvases
	Terrain,
	/// Free-standing sprites
	Sprite,
	/// Adventure map objects
	MapObject,
	/// Not converted
	Other,
}

impl std::fmt::Display for EntryKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Terrain => write!(f, "terrain"),
			Self::Sprite => write!(f, "sprite"),
			Self::MapObject => write!(f, "map-object"),
			Self::Other => write!(f, "other"),
		}
	}
}

/// File table record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Raw name bytes, NUL padded
	pub raw_name: [u8; constants::NAME_SIZE],

	/// Absolute offset of the stored bytes
	pub offset: u32,

	/// Uncompressed size in bytes
	pub size: u32,

	/// Entry type code
	pub entry_type: EntryType,

	/// Compressed size in bytes, 0 when stored raw
	pub compressed_size: u32,
}

impl Entry {
	/// Creates a new entry; names longer than 15 bytes are truncated
	pub fn new(
		name: &str,
		offset: u32,
		size: u32,
		entry_type: EntryType,
		compressed_size: u32,
	) -> Self {
		let mut raw_name = [0u8; constants::NAME_SIZE];
		let (encoded, _, _) = WINDOWS_1252.encode(name);
		let len = encoded.len().min(constants::NAME_SIZE - 1);
		raw_name[..len].copy_from_slice(&encoded[..len]);

		Self {
			raw_name,
			offset,
			size,
			entry_type,
			compressed_size,
		}
	}

	/// Returns the name, decoded from Windows-1252 up to the first NUL
	pub fn name(&self) -> String {
		let end = self.raw_name.iter().position(|&b| b == 0).unwrap_or(self.raw_name.len());
		let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&self.raw_name[..end]);
		decoded.into_owned()
	}

	/// Returns `true` if the entry is stored as a zlib stream
	#[inline]
	pub fn is_compressed(&self) -> bool {
		self.compressed_size != 0
	}

	/// Number of bytes the entry occupies in the archive
	#[inline]
	pub fn stored_size(&self) -> u32 {
		if self.is_compressed() { self.compressed_size } else { self.size }
	}

	/// End offset of the stored bytes
	#[inline]
	pub fn end(&self) -> u64 {
		u64::from(self.offset) + u64::from(self.stored_size())
	}

	/// Coarse classification used by the atlas pipeline
	#[inline]
	pub fn kind(&self) -> EntryKind {
		self.entry_type.kind()
	}

	/// Loads entry from a 32-byte record
	pub fn from_bytes(data: &[u8; constants::ENTRY_SIZE]) -> Self {
		let mut raw_name = [0u8; constants::NAME_SIZE];
		raw_name.copy_from_slice(&data[..constants::NAME_SIZE]);

		Self {
			raw_name,
			offset: read_u32(data, 16),
			size: read_u32(data, 20),
			entry_type: EntryType::from_u32(read_u32(data, 24)),
			compressed_size: read_u32(data, 28),
		}
	}

	/// Serializes entry to a 32-byte record
	pub fn to_bytes(self) -> [u8; constants::ENTRY_SIZE] {
		let mut buffer = [0u8; constants::ENTRY_SIZE];
		buffer[..constants::NAME_SIZE].copy_from_slice(&self.raw_name);
		buffer[16..20].copy_from_slice(&self.offset.to_le_bytes());
		buffer[20..24].copy_from_slice(&self.size.to_le_bytes());
		buffer[24..28].copy_from_slice(&self.entry_type.to_u32().to_le_bytes());
		buffer[28..32].copy_from_slice(&self.compressed_size.to_le_bytes());
		buffer
	}
}

impl std::fmt::Display for Entry {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Entry {{ name: '{}', type: {}, offset: {}, size: {}, compressed: {} }}",
			self.name(),
			self.entry_type,
			self.offset,
			self.size,
			self.compressed_size
		)
	}
}

#[inline]
fn read_u32(data: &[u8], offset: usize) -> u32 {
	u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
