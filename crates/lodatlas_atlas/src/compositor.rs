//! Palette compositing.
//!
//! The first eight palette slots are engine effects (transparency, shadows and
//! selection outlines) and never take their color from the sprite palette.

use image::{Rgba, RgbaImage};
use lodatlas_types::file::def::{Color, Frame, Palette};

/// Colors substituted for the reserved palette slots
pub const RESERVED_COLORS: [Color; Palette::RESERVED_COUNT] = [
	Color::new(0x00, 0x00, 0x00, 0x00),
	Color::new(0x00, 0x00, 0x00, 0x40),
	Color::new(0x00, 0x00, 0x00, 0x00),
	Color::new(0x00, 0x00, 0x00, 0x00),
	Color::new(0x00, 0x00, 0x00, 0x80),
	Color::new(0x80, 0x80, 0x80, 0xFF),
	Color::new(0x00, 0x00, 0x00, 0x80),
	Color::new(0x00, 0x00, 0x00, 0x40),
];

/// Builds the RGBA lookup table for a sprite palette
pub fn color_table(palette: &Palette) -> [Rgba<u8>; Palette::PALETTE_SIZE] {
	let mut table = [Rgba([0, 0, 0, 0]); Palette::PALETTE_SIZE];
	for (index, slot) in table.iter_mut().enumerate() {
		let color = match RESERVED_COLORS.get(index) {
			Some(&reserved) => reserved,
			None => Color {
				a: 0xFF,
				..palette.get(index as u8)
			},
		};
		*slot = Rgba(color.to_array());
	}
	table
}

/// Converts a frame's palette indices to an RGBA bitmap of its stored extents
pub fn composite(frame: &Frame, palette: &Palette) -> RgbaImage {
	let table = color_table(palette);
	let mut image = RgbaImage::new(frame.width(), frame.height());
	for (pixel, &index) in image.pixels_mut().zip(frame.pixels()) {
		*pixel = table[index as usize];
	}
	image
}

#[cfg(test)]
mod tests {
	use super::*;
	use lodatlas_types::file::def::{Compression, FrameId, FrameKind, Geometry};

	fn frame(width: u32, height: u32, pixels: Vec<u8>) -> Frame {
		Frame::new(
			"test.pcx",
			FrameId::default(),
			FrameKind::Sprite,
			Compression::Raw,
			Geometry::full(width, height),
			pixels,
		)
	}

	#[test]
	fn test_reserved_indices_ignore_palette() {
		// A palette that would make every reserved slot bright and opaque
		let mut palette = Palette::new();
		for index in 0..8 {
			palette.set(index, Color::rgb(200, 100, 50));
		}

		let image = composite(&frame(8, 1, (0..8).collect()), &palette);
		let alphas: Vec<u8> = image.pixels().map(|p| p[3]).collect();

		assert_eq!(alphas, vec![0x00, 0x40, 0x00, 0x00, 0x80, 0xFF, 0x80, 0x40]);
		assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
		assert_eq!(*image.get_pixel(5, 0), Rgba([0x80, 0x80, 0x80, 0xFF]));
		assert_eq!(*image.get_pixel(4, 0), Rgba([0, 0, 0, 0x80]));
	}

	#[test]
	fn test_palette_indices_are_opaque() {
		let mut palette = Palette::new();
		palette.set(8, Color::rgb(1, 2, 3));
		palette.set(255, Color::new(9, 8, 7, 0));

		let image = composite(&frame(2, 1, vec![8, 255]), &palette);

		assert_eq!(*image.get_pixel(0, 0), Rgba([1, 2, 3, 0xFF]));
		assert_eq!(*image.get_pixel(1, 0), Rgba([9, 8, 7, 0xFF]));
	}

	#[test]
	fn test_dimensions() {
		let image = composite(&frame(3, 2, vec![0; 6]), &Palette::grayscale());
		assert_eq!(image.dimensions(), (3, 2));
		assert!(image.pixels().all(|p| p[3] == 0));
	}
}
