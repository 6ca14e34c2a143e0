//! Frame body compression.
//!
//! Inverse of [`super::decode`]. Runs are chosen greedily:
//!
//! - Row mode: runs of two or more identical pixels become `(value, len - 1)`
//!   pairs; everything else is grouped into `0xFF` literal spans. Pixels with
//!   the value `0xFF` always go through literals since a repeat of them would
//!   read back as a literal marker.
//! - Packed and segment modes: only indices below 7 fit the 3-bit code, so
//!   they become repeats and everything else becomes literal spans of at most
//!   32 pixels.

use super::decode::{PACKED_LITERAL, ROW_LITERAL, SEGMENT_WIDTH};
use super::frame::Compression;
use crate::file::DefError;

/// Longest span a row-mode pair can describe
const ROW_MAX_SPAN: usize = 256;

/// Longest span a packed byte can describe
const PACKED_MAX_SPAN: usize = 32;

/// Encodes `width × height` palette indices into a frame body
///
/// # Errors
///
/// Returns [`DefError::MalformedFrame`] if the pixel count does not match the
/// extents, if segment mode is asked for a width that is not a multiple of 32,
/// or if a 16-bit offset table cannot address the encoded rows.
pub fn encode_body(
	name: &str,
	compression: Compression,
	width: u32,
	height: u32,
	pixels: &[u8],
) -> Result<Vec<u8>, DefError> {
	let width = width as usize;
	let height = height as usize;

	if pixels.len() != width * height {
		return Err(DefError::malformed(
			name,
			format!("{} pixels given for {}×{} extents", pixels.len(), width, height),
		));
	}
	if width == 0 || height == 0 {
		return Ok(Vec::new());
	}

	match compression {
		Compression::Raw => Ok(pixels.to_vec()),
		Compression::RowRle => {
			let mut body = vec![0u8; height * 4];
			for (row, line) in pixels.chunks_exact(width).enumerate() {
				let offset = body.len() as u32;
				body[row * 4..row * 4 + 4].copy_from_slice(&offset.to_le_bytes());
				encode_row_rle(line, &mut body);
			}
			Ok(body)
		}
		Compression::PackedRle => encode_packed_lines(name, pixels.chunks_exact(width), height),
		Compression::SegmentRle => {
			if width % SEGMENT_WIDTH != 0 {
				return Err(DefError::malformed(
					name,
					format!("segment mode requires a width divisible by {SEGMENT_WIDTH}, got {width}"),
				));
			}
			let segments = height * (width / SEGMENT_WIDTH);
			encode_packed_lines(name, pixels.chunks_exact(SEGMENT_WIDTH), segments)
		}
	}
}

fn encode_packed_lines<'a>(
	name: &str,
	lines: impl Iterator<Item = &'a [u8]>,
	count: usize,
) -> Result<Vec<u8>, DefError> {
	let mut body = vec![0u8; count * 2];
	for (index, line) in lines.enumerate() {
		let offset = u16::try_from(body.len()).map_err(|_| {
			DefError::malformed(name, "encoded body exceeds the 16-bit offset range")
		})?;
		body[index * 2..index * 2 + 2].copy_from_slice(&offset.to_le_bytes());
		encode_packed_rle(line, &mut body);
	}
	Ok(body)
}

/// Length of the run of `line[start]` values, capped at `max`
#[inline]
fn run_length(line: &[u8], start: usize, max: usize) -> usize {
	let value = line[start];
	line[start..].iter().take(max).take_while(|&&v| v == value).count()
}

fn encode_row_rle(line: &[u8], out: &mut Vec<u8>) {
	let mut pos = 0;
	while pos < line.len() {
		let run = run_length(line, pos, ROW_MAX_SPAN);
		if run >= 2 && line[pos] != ROW_LITERAL {
			out.push(line[pos]);
			out.push((run - 1) as u8);
			pos += run;
			continue;
		}

		let start = pos;
		while pos < line.len() && pos - start < ROW_MAX_SPAN {
			if line[pos] != ROW_LITERAL && run_length(line, pos, 2) == 2 {
				break;
			}
			pos += 1;
		}
		out.push(ROW_LITERAL);
		out.push((pos - start - 1) as u8);
		out.extend_from_slice(&line[start..pos]);
	}
}

fn encode_packed_rle(line: &[u8], out: &mut Vec<u8>) {
	let mut pos = 0;
	while pos < line.len() {
		if line[pos] < PACKED_LITERAL {
			let run = run_length(line, pos, PACKED_MAX_SPAN);
			out.push((line[pos] << 5) | (run - 1) as u8);
			pos += run;
			continue;
		}

		let start = pos;
		while pos < line.len() && pos - start < PACKED_MAX_SPAN && line[pos] >= PACKED_LITERAL {
			pos += 1;
		}
		out.push((PACKED_LITERAL << 5) | (pos - start - 1) as u8);
		out.extend_from_slice(&line[start..pos]);
	}
}
