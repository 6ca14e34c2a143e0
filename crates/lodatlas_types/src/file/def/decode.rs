//! Frame body decompression.
//!
//! All run-length modes address rows (or 32-pixel segments) through an offset
//! table at the start of the body; offsets are relative to the body start.
//! A row is complete once exactly `width` pixels have been produced. Spans that
//! would overrun the row, offsets pointing outside the body and bodies that end
//! mid-row are reported as [`DefError::MalformedFrame`].

use super::frame::{Compression, Geometry};
use crate::file::DefError;

/// Width of one segment in [`Compression::SegmentRle`] bodies
pub const SEGMENT_WIDTH: usize = 32;

/// Literal marker in [`Compression::RowRle`] spans
pub(super) const ROW_LITERAL: u8 = 0xFF;

/// Literal code in packed spans
pub(super) const PACKED_LITERAL: u8 = 7;

/// Decodes a frame body into `width × height` palette indices
pub fn decode_body(
	name: &str,
	compression: Compression,
	geometry: &Geometry,
	body: &[u8],
) -> Result<Vec<u8>, DefError> {
	let width = geometry.width as usize;
	let height = geometry.height as usize;
	let Some(pixel_count) = width.checked_mul(height) else {
		return Err(DefError::malformed(name, format!("extents {width}×{height} overflow")));
	};

	if pixel_count == 0 {
		return Ok(Vec::new());
	}

	// Extents are untrusted; the buffer grows only as the body provides pixels
	let mut pixels = Vec::new();
	match compression {
		Compression::Raw => {
			let Some(raw) = body.get(..pixel_count) else {
				return Err(DefError::malformed(
					name,
					format!("raw body has {} bytes, {} pixels declared", body.len(), pixel_count),
				));
			};
			pixels.extend_from_slice(raw);
		}
		Compression::RowRle => {
			for row in 0..height {
				let offset = read_u32(name, body, row * 4)? as usize;
				decode_row_rle(name, body, offset, width, &mut pixels)?;
			}
		}
		Compression::PackedRle => {
			for row in 0..height {
				let offset = read_u16(name, body, row * 2)? as usize;
				decode_packed_rle(name, body, offset, width, &mut pixels)?;
			}
		}
		Compression::SegmentRle => {
			if width % SEGMENT_WIDTH != 0 {
				return Err(DefError::malformed(
					name,
					format!("segment mode requires a width divisible by {SEGMENT_WIDTH}, got {width}"),
				));
			}
			let segments = height * (width / SEGMENT_WIDTH);
			for segment in 0..segments {
				let offset = read_u16(name, body, segment * 2)? as usize;
				decode_packed_rle(name, body, offset, SEGMENT_WIDTH, &mut pixels)?;
			}
		}
	}

	if pixels.len() != pixel_count {
		return Err(DefError::malformed(
			name,
			format!("decoded {} pixels, {} declared", pixels.len(), pixel_count),
		));
	}

	Ok(pixels)
}

/// Decodes one row of `(code, length - 1)` pairs
fn decode_row_rle(
	name: &str,
	body: &[u8],
	mut pos: usize,
	width: usize,
	out: &mut Vec<u8>,
) -> Result<(), DefError> {
	let mut produced = 0;
	while produced < width {
		let code = byte_at(name, body, pos)?;
		let len = byte_at(name, body, pos + 1)? as usize + 1;
		pos += 2;

		check_span(name, produced, len, width)?;

		if code == ROW_LITERAL {
			out.extend_from_slice(slice_at(name, body, pos, len)?);
			pos += len;
		} else {
			out.extend(std::iter::repeat_n(code, len));
		}
		produced += len;
	}
	Ok(())
}

/// Decodes `width` pixels of packed `code:3 | length - 1:5` spans
fn decode_packed_rle(
	name: &str,
	body: &[u8],
	mut pos: usize,
	width: usize,
	out: &mut Vec<u8>,
) -> Result<(), DefError> {
	let mut produced = 0;
	while produced < width {
		let packed = byte_at(name, body, pos)?;
		pos += 1;

		let code = packed >> 5;
		let len = (packed & 0x1F) as usize + 1;

		check_span(name, produced, len, width)?;

		if code == PACKED_LITERAL {
			out.extend_from_slice(slice_at(name, body, pos, len)?);
			pos += len;
		} else {
			out.extend(std::iter::repeat_n(code, len));
		}
		produced += len;
	}
	Ok(())
}

#[inline]
fn check_span(name: &str, produced: usize, len: usize, width: usize) -> Result<(), DefError> {
	if produced + len > width {
		return Err(DefError::malformed(
			name,
			format!("span of {len} pixels at column {produced} overruns row width {width}"),
		));
	}
	Ok(())
}

#[inline]
fn byte_at(name: &str, body: &[u8], pos: usize) -> Result<u8, DefError> {
	body.get(pos).copied().ok_or_else(|| truncated(name, pos, body.len()))
}

#[inline]
fn slice_at<'a>(name: &str, body: &'a [u8], pos: usize, len: usize) -> Result<&'a [u8], DefError> {
	body.get(pos..pos + len).ok_or_else(|| truncated(name, pos + len, body.len()))
}

fn read_u16(name: &str, body: &[u8], pos: usize) -> Result<u16, DefError> {
	let bytes = slice_at(name, body, pos, 2)?;
	Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(name: &str, body: &[u8], pos: usize) -> Result<u32, DefError> {
	let bytes = slice_at(name, body, pos, 4)?;
	Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn truncated(name: &str, needed: usize, available: usize) -> DefError {
	DefError::malformed(name, format!("body truncated: needs byte {needed}, has {available}"))
}
