//! Archive construction and serialization.

use std::io::Write;

use flate2::{Compression, write::ZlibEncoder};

use super::constants;
use super::entry::{Entry, EntryType, Header};
use crate::file::LodError;

/// A file queued for writing
#[derive(Debug, Clone)]
struct PendingFile {
	name: String,
	entry_type: EntryType,
	data: Vec<u8>,
	compress: bool,
}

/// Builder producing a complete LOD archive in memory.
///
/// Payloads are laid out in insertion order directly after the file table.
///
/// # Examples
///
/// ```
/// use lodatlas_types::file::lod::{Archive, ArchiveBuilder, EntryType};
/// use std::io::Cursor;
///
/// let bytes = ArchiveBuilder::new()
///     .add("hello.txt", EntryType::Unknown(2), b"hello".to_vec())
///     .add_compressed("big.txt", EntryType::Unknown(2), vec![b'a'; 4096])
///     .build()
///     .unwrap();
///
/// let mut lod = Archive::from_reader(Cursor::new(bytes)).unwrap();
/// assert_eq!(lod.read_by_name("BIG.TXT").unwrap().len(), 4096);
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
	kind: u32,
	files: Vec<PendingFile>,
}

impl ArchiveBuilder {
	/// Creates an empty builder for a base game archive
	pub fn new() -> Self {
		Self {
			kind: constants::KIND_BASE,
			files: Vec::new(),
		}
	}

	/// Sets the archive kind written to the header
	pub fn kind(mut self, kind: u32) -> Self {
		self.kind = kind;
		self
	}

	/// Queues a file stored raw
	pub fn add(mut self, name: &str, entry_type: EntryType, data: Vec<u8>) -> Self {
		self.files.push(PendingFile {
			name: name.to_string(),
			entry_type,
			data,
			compress: false,
		});
		self
	}

	/// Queues a file stored as a zlib stream
	pub fn add_compressed(mut self, name: &str, entry_type: EntryType, data: Vec<u8>) -> Self {
		self.files.push(PendingFile {
			name: name.to_string(),
			entry_type,
			data,
			compress: true,
		});
		self
	}

	/// Returns the number of queued files
	pub fn file_count(&self) -> usize {
		self.files.len()
	}

	/// Serializes the archive
	///
	/// # Errors
	///
	/// Only fails if the zlib encoder reports an error.
	pub fn build(&self) -> Result<Vec<u8>, LodError> {
		let table_size = self.files.len() * constants::ENTRY_SIZE;
		let mut offset = constants::HEADER_SIZE + table_size;

		let mut table = Vec::with_capacity(table_size);
		let mut payload = Vec::new();

		for file in &self.files {
			let (stored, compressed_size) = if file.compress {
				let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
				encoder.write_all(&file.data)?;
				let stored = encoder.finish()?;
				let len = stored.len() as u32;
				(stored, len)
			} else {
				(file.data.clone(), 0)
			};

			let entry = Entry::new(
				&file.name,
				offset as u32,
				file.data.len() as u32,
				file.entry_type,
				compressed_size,
			);
			table.extend_from_slice(&entry.to_bytes());

			offset += stored.len();
			payload.extend_from_slice(&stored);
		}

		let header = Header::new(self.kind, self.files.len() as u32);

		let mut out = Vec::with_capacity(offset);
		out.extend_from_slice(&header.to_bytes());
		out.extend_from_slice(&table);
		out.extend_from_slice(&payload);
		Ok(out)
	}
}

impl Default for ArchiveBuilder {
	fn default() -> Self {
		Self::new()
	}
}
