//! Streaming reader for LOD archives.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use flate2::read::ZlibDecoder;

use super::constants;
use super::entry::{Entry, Header};
use crate::file::LodError;

/// An opened LOD archive.
///
/// Only the header and file table are held in memory. Entry payloads are read
/// from the underlying stream on request and never cached.
#[derive(Debug)]
pub struct Archive<R> {
	/// Underlying reader for file operations
	reader: R,

	/// Archive header
	header: Header,

	/// File table in on-disk order
	entries: Vec<Entry>,

	/// Lower-cased name to table index
	by_name: HashMap<String, usize>,

	/// Stored offset to table index
	by_offset: BTreeMap<u32, usize>,

	/// Total length of the underlying stream
	stream_len: u64,
}

impl<R: Read + Seek> Archive<R> {
	/// Reads the header and file table from the given reader
	///
	/// # Errors
	///
	/// Returns [`LodError::InvalidMagic`] for streams that are not LOD archives and
	/// [`LodError::TruncatedTable`] when the table ends before the announced count.
	pub fn from_reader(mut reader: R) -> Result<Self, LodError> {
		let stream_len = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;

		let header = Header::from_reader(&mut reader)?;

		let mut entries = Vec::with_capacity(header.entry_count.min(16_384) as usize);
		let mut record = [0u8; constants::ENTRY_SIZE];
		for _ in 0..header.entry_count {
			match reader.read_exact(&mut record) {
				Ok(()) => entries.push(Entry::from_bytes(&record)),
				Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
					return Err(LodError::TruncatedTable {
						expected: header.entry_count,
						actual: entries.len(),
					});
				}
				Err(e) => return Err(e.into()),
			}
		}

		let mut by_name = HashMap::with_capacity(entries.len());
		let mut by_offset = BTreeMap::new();
		for (index, entry) in entries.iter().enumerate() {
			by_name.entry(entry.name().to_lowercase()).or_insert(index);
			by_offset.entry(entry.offset).or_insert(index);
		}

		Ok(Self {
			reader,
			header,
			entries,
			by_name,
			by_offset,
			stream_len,
		})
	}

	/// Reads the payload of an entry, inflating it if it is stored compressed
	///
	/// # Errors
	///
	/// Returns [`LodError::EntryOutOfBounds`] if the stored bytes extend past the end
	/// of the stream, and [`LodError::InflateFailed`] / [`LodError::SizeMismatch`]
	/// for damaged compressed payloads.
	pub fn read_entry(&mut self, entry: &Entry) -> Result<Vec<u8>, LodError> {
		self.check_bounds(entry)?;

		self.reader.seek(SeekFrom::Start(u64::from(entry.offset)))?;
		let mut stored = Vec::with_capacity(entry.stored_size() as usize);
		(&mut self.reader).take(u64::from(entry.stored_size())).read_to_end(&mut stored)?;

		if stored.len() != entry.stored_size() as usize {
			return Err(LodError::EntryOutOfBounds {
				name: entry.name(),
				offset: u64::from(entry.offset),
				end: entry.end(),
				available: u64::from(entry.offset) + stored.len() as u64,
			});
		}

		if !entry.is_compressed() {
			return Ok(stored);
		}

		// One byte past the declared size is enough to detect a mismatch
		let mut data = Vec::new();
		ZlibDecoder::new(stored.as_slice())
			.take(u64::from(entry.size) + 1)
			.read_to_end(&mut data)
			.map_err(|source| LodError::InflateFailed {
				name: entry.name(),
				source,
			})?;

		if data.len() != entry.size as usize {
			return Err(LodError::SizeMismatch {
				name: entry.name(),
				expected: entry.size as usize,
				actual: data.len(),
			});
		}

		Ok(data)
	}

	/// Reads the payload of the entry with the given name (case-insensitive)
	pub fn read_by_name(&mut self, name: &str) -> Result<Vec<u8>, LodError> {
		let entry = *self.find(name).ok_or_else(|| LodError::EntryNotFound(name.to_string()))?;
		self.read_entry(&entry)
	}

	/// Verifies that every entry lies within the underlying stream
	pub fn validate(&self) -> Result<(), LodError> {
		self.entries.iter().try_for_each(|entry| self.check_bounds(entry))
	}

	fn check_bounds(&self, entry: &Entry) -> Result<(), LodError> {
		if entry.end() > self.stream_len {
			return Err(LodError::EntryOutOfBounds {
				name: entry.name(),
				offset: u64::from(entry.offset),
				end: entry.end(),
				available: self.stream_len,
			});
		}
		Ok(())
	}
}

impl<R> Archive<R> {
	/// Returns the archive header
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns the file table in on-disk order
	pub fn list(&self) -> &[Entry] {
		&self.entries
	}

	/// Returns the number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the archive has no entries
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Looks an entry up by name, ignoring ASCII and Latin-1 case
	///
	/// When several entries share a name the first one in the table wins.
	pub fn find(&self, name: &str) -> Option<&Entry> {
		self.by_name.get(&name.to_lowercase()).map(|&index| &self.entries[index])
	}

	/// Looks an entry up by the offset of its stored bytes
	pub fn find_by_offset(&self, offset: u32) -> Option<&Entry> {
		self.by_offset.get(&offset).map(|&index| &self.entries[index])
	}

	/// Consumes the archive, returning the underlying reader
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl Archive<std::io::BufReader<std::fs::File>> {
	/// Opens a `.LOD` archive from the given path
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, LodError> {
		let file = std::fs::File::open(path)?;
		Self::from_reader(std::io::BufReader::new(file))
	}
}
