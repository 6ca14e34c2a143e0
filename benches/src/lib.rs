//! Benchmark helper utilities for lodatlas
//!
//! Generates synthetic DEF files and LOD archives so the benchmarks run
//! without the original game data. Pixel content mixes flat runs with noisy
//! spans so every RLE opcode is exercised.

use lodatlas_types::file::def::{Compression, FileBuilder, FrameSpec, GroupSpec};
use lodatlas_types::file::lod::{ArchiveBuilder, EntryType};

/// Generates an indexed bitmap with a transparent border, a shadow band and
/// a noisy body
pub fn generate_pixels(width: u32, height: u32) -> Vec<u8> {
	let mut pixels = Vec::with_capacity((width * height) as usize);
	for y in 0..height {
		for x in 0..width {
			let border = x < width / 8 || x >= width - width / 8;
			let value = if border {
				0
			} else if y % 16 < 2 {
				// Shadow band, kept in the short-run range of the packed encodings
				4
			} else {
				// A few pixels long, then changes
				(((x / 3) * 7 + y * 13) % 200) as u8 + 8
			};
			pixels.push(value);
		}
	}
	pixels
}

/// Generates a DEF file with one group of `frames` distinct frames named
/// `<prefix><n>.pcx`, which must fit the 12 characters of a slot name
///
/// Returns an empty buffer if the frames cannot be encoded.
pub fn generate_def(prefix: &str, width: u32, height: u32, frames: usize, compression: Compression) -> Vec<u8> {
	let mut group = GroupSpec::new(0);
	for i in 0..frames {
		group = group.frame(
			FrameSpec::new(&format!("{prefix}{i}.pcx"), width, height, generate_pixels(width, height))
				.compression(compression),
		);
	}
	FileBuilder::new(EntryType::MapObject, width, height)
		.group(group)
		.build()
		.unwrap_or_default()
}

/// Generates a LOD archive with `entries` sprite DEFs, every other one
/// stored zlib-compressed
pub fn generate_lod(entries: usize, frame_size: u32, frames: usize) -> Vec<u8> {
	let mut builder = ArchiveBuilder::new();
	for i in 0..entries {
		let prefix = format!("b{i:02}_");
		let def = generate_def(&prefix, frame_size, frame_size, frames, Compression::PackedRle);
		let name = format!("bench{i:03}.def");
		builder = if i % 2 == 0 {
			builder.add(&name, EntryType::MapObject, def)
		} else {
			builder.add_compressed(&name, EntryType::MapObject, def)
		};
	}
	builder.build().unwrap_or_default()
}

/// Common frame sizes
pub mod sizes {
	/// Small adventure map object: 32x32
	pub const SMALL: (u32, u32) = (32, 32);
	/// Terrain tile: 64x64 (stored as 32x32 in the game, doubled here)
	pub const TILE: (u32, u32) = (64, 64);
	/// Large creature frame: 128x128, the largest noisy frame whose packed
	/// rows stay addressable by 16-bit offsets
	pub const LARGE: (u32, u32) = (128, 128);
}

#[cfg(test)]
mod tests {
	use super::*;
	use lodatlas_types::file::def::File;
	use lodatlas_types::file::lod::{Archive, EntryKind};
	use std::io::Cursor;

	#[test]
	fn test_generate_def_decodes() {
		for compression in
			[Compression::Raw, Compression::RowRle, Compression::PackedRle, Compression::SegmentRle]
		{
			let data = generate_def("test", 64, 32, 3, compression);
			let file = File::from_bytes(&data, EntryKind::MapObject).unwrap();
			assert_eq!(file.frames().count(), 3);
			let frame = file.frames().next().unwrap();
			assert_eq!(frame.pixels(), generate_pixels(64, 32).as_slice());
		}
	}

	#[test]
	fn test_generate_lod() {
		let data = generate_lod(4, 32, 2);
		let mut archive = Archive::from_reader(Cursor::new(data)).unwrap();
		assert_eq!(archive.len(), 4);
		assert!(archive.read_by_name("bench001.def").is_ok());
	}
}
