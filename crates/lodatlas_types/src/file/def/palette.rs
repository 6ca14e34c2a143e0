//! DEF palette support.
//!
//! Every DEF file embeds its own 256-color RGB palette. The first eight
//! entries are reserved by the engine for transparency and shadow effects and
//! must not be taken at face value when rendering.

use std::fmt;

use crate::file::DefError;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// DEF color palette (256 RGB triples, fully opaque as stored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	/// 256-color palette
	colors: [Color; 256],
}

impl Palette {
	/// Total palette size
	pub const PALETTE_SIZE: usize = 256;

	/// Size of the serialized palette in bytes (256 colors × 3 bytes)
	pub const BYTE_SIZE: usize = Self::PALETTE_SIZE * 3;

	/// Number of leading indices reserved by the engine
	pub const RESERVED_COUNT: usize = 8;

	/// Creates a new palette with all colors set to opaque black.
	pub fn new() -> Self {
		Self {
			colors: [Color::rgb(0, 0, 0); 256],
		}
	}

	/// Creates a default grayscale palette.
	///
	/// All 256 colors are set to grayscale values matching their index.
	pub fn grayscale() -> Self {
		let mut palette = Self::new();
		for i in 0..Self::PALETTE_SIZE {
			palette.colors[i] = Color::gray(i as u8);
		}
		palette
	}

	/// Loads a palette from 768 bytes of RGB triples.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DefError> {
		if data.len() < Self::BYTE_SIZE {
			return Err(DefError::InsufficientData {
				context: "palette",
				expected: Self::BYTE_SIZE,
				actual: data.len(),
			});
		}

		let mut palette = Self::new();
		for (color, rgb) in palette.colors.iter_mut().zip(data.chunks_exact(3)) {
			*color = Color::rgb(rgb[0], rgb[1], rgb[2]);
		}
		Ok(palette)
	}

	/// Serializes the palette to 768 bytes of RGB triples.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Sets a color at the specified index.
	#[inline]
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[index as usize] = color;
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}

impl std::ops::IndexMut<u8> for Palette {
	fn index_mut(&mut self, index: u8) -> &mut Self::Output {
		&mut self.colors[index as usize]
	}
}
