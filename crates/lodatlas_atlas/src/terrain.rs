//! Terrain tile normalization.
//!
//! Terrain frames are stored cropped like every other sprite, but tiles are
//! drawn on a fixed grid, so they are packed at full tile size with the draw
//! offset baked into the bitmap.

use image::{RgbaImage, imageops};
use lodatlas_types::file::def::Geometry;

/// Places a composited terrain frame on its full transparent canvas.
///
/// Pixels falling outside the canvas are clipped. Returns the expanded bitmap
/// with the geometry it now has: no offset, stored size equal to full size.
pub fn expand(image: &RgbaImage, geometry: &Geometry) -> (RgbaImage, Geometry) {
	let mut canvas = RgbaImage::new(geometry.full_width, geometry.full_height);
	imageops::replace(&mut canvas, image, i64::from(geometry.offset_x), i64::from(geometry.offset_y));

	let expanded = Geometry::full(geometry.full_width, geometry.full_height);
	(canvas, expanded)
}
