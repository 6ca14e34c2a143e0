//! Guillotine bin packing onto fixed-size pages.
//!
//! Every page keeps a list of free rectangles ordered top-left-most first
//! (by `y`, then `x`). A bitmap goes into the first free rectangle it fits,
//! searching pages in creation order; the rectangle is then cut along the
//! axis with the shorter leftover. A new page is opened only when no existing
//! page has room.
//!
//! Padding is added to the right of and below each bitmap. The free space of a
//! page extends `padding` pixels past its edges so that a bitmap touching the
//! page border does not need a gap there.

use std::collections::HashMap;
use std::fmt;

use image::{RgbaImage, imageops};
use log::debug;

use crate::AtlasError;

/// Axis-aligned rectangle in page pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
	/// Left edge
	pub x: u32,
	/// Top edge
	pub y: u32,
	/// Width
	pub width: u32,
	/// Height
	pub height: u32,
}

impl Rect {
	/// Creates a rectangle
	pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Exclusive right edge
	#[inline]
	pub fn right(&self) -> u32 {
		self.x + self.width
	}

	/// Exclusive bottom edge
	#[inline]
	pub fn bottom(&self) -> u32 {
		self.y + self.height
	}

	/// Returns `true` if the rectangle covers no pixels
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// Returns `true` if both rectangles share at least one pixel
	pub fn overlaps(&self, other: &Rect) -> bool {
		!self.is_empty()
			&& !other.is_empty()
			&& self.x < other.right()
			&& other.x < self.right()
			&& self.y < other.bottom()
			&& other.y < self.bottom()
	}
}

impl fmt::Display for Rect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} at ({}, {})", self.width, self.height, self.x, self.y)
	}
}

/// Where a bitmap was packed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
	/// Index of the page in creation order
	pub page: usize,
	/// Rectangle occupied by the bitmap, without padding
	pub rect: Rect,
}

/// A packed bitmap on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
	/// Name the bitmap was packed under
	pub name: String,
	/// Rectangle occupied by the bitmap
	pub rect: Rect,
}

/// One atlas page
#[derive(Debug, Clone)]
pub struct Page {
	image: RgbaImage,
	regions: Vec<Region>,
	free: Vec<Rect>,
}

impl Page {
	fn new(width: u32, height: u32, padding: u32) -> Self {
		Self {
			image: RgbaImage::new(width, height),
			regions: Vec::new(),
			free: vec![Rect::new(0, 0, width + padding, height + padding)],
		}
	}

	/// Page raster
	#[inline]
	pub fn image(&self) -> &RgbaImage {
		&self.image
	}

	/// Page width
	#[inline]
	pub fn width(&self) -> u32 {
		self.image.width()
	}

	/// Page height
	#[inline]
	pub fn height(&self) -> u32 {
		self.image.height()
	}

	/// Packed regions in placement order
	#[inline]
	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	/// Index of the first free rectangle that can hold `width × height`
	fn find_free(&self, width: u32, height: u32) -> Option<usize> {
		self.free.iter().position(|free| width <= free.width && height <= free.height)
	}

	/// Takes `width × height` from the top-left corner of free rectangle `index`
	fn split(&mut self, index: usize, width: u32, height: u32) -> (u32, u32) {
		let free = self.free.remove(index);
		let leftover_w = free.width - width;
		let leftover_h = free.height - height;

		let (right, below) = if leftover_w <= leftover_h {
			(
				Rect::new(free.x + width, free.y, leftover_w, height),
				Rect::new(free.x, free.y + height, free.width, leftover_h),
			)
		} else {
			(
				Rect::new(free.x + width, free.y, leftover_w, free.height),
				Rect::new(free.x, free.y + height, width, leftover_h),
			)
		};

		for rect in [right, below] {
			if !rect.is_empty() {
				let at = self.free.partition_point(|r| (r.y, r.x) < (rect.y, rect.x));
				self.free.insert(at, rect);
			}
		}

		(free.x, free.y)
	}
}

/// Accumulates bitmaps onto pages, packing every name at most once
#[derive(Debug)]
pub struct Packer {
	page_width: u32,
	page_height: u32,
	padding: u32,
	pages: Vec<Page>,
	placed: HashMap<String, Placement>,
}

impl Packer {
	/// Creates a packer for `page_width × page_height` pages
	pub fn new(page_width: u32, page_height: u32, padding: u32) -> Self {
		Self {
			page_width,
			page_height,
			padding,
			pages: Vec::new(),
			placed: HashMap::new(),
		}
	}

	/// Packs a bitmap under `name`.
	///
	/// Packing a name a second time returns the first placement and leaves the
	/// pages untouched. Bitmaps without pixels are recorded at the origin of
	/// the first page without taking up space.
	///
	/// # Errors
	///
	/// Returns [`AtlasError::PageOverflow`] if the bitmap is wider or taller
	/// than a page.
	pub fn pack(&mut self, name: &str, bitmap: &RgbaImage) -> Result<Placement, AtlasError> {
		if let Some(&placement) = self.placed.get(name) {
			return Ok(placement);
		}

		let (width, height) = bitmap.dimensions();
		self.check_fits(name, width, height)?;

		let placement = if width == 0 || height == 0 {
			if self.pages.is_empty() {
				self.open_page();
			}
			Placement {
				page: 0,
				rect: Rect::new(0, 0, width, height),
			}
		} else {
			self.place(bitmap)
		};

		debug!("packed {name} on page {}: {}", placement.page, placement.rect);

		self.pages[placement.page].regions.push(Region {
			name: name.to_string(),
			rect: placement.rect,
		});
		self.placed.insert(name.to_string(), placement);
		Ok(placement)
	}

	fn place(&mut self, bitmap: &RgbaImage) -> Placement {
		let (width, height) = bitmap.dimensions();
		let padded_w = width + self.padding;
		let padded_h = height + self.padding;

		let found = self
			.pages
			.iter()
			.enumerate()
			.find_map(|(page, p)| p.find_free(padded_w, padded_h).map(|free| (page, free)));

		let (page, free) = match found {
			Some(found) => found,
			// An empty page always fits a bitmap that passed the size check
			None => (self.open_page(), 0),
		};

		let target = &mut self.pages[page];
		let (x, y) = target.split(free, padded_w, padded_h);
		imageops::replace(&mut target.image, bitmap, i64::from(x), i64::from(y));

		Placement {
			page,
			rect: Rect::new(x, y, width, height),
		}
	}

	fn open_page(&mut self) -> usize {
		debug!("opening page {}", self.pages.len());
		self.pages.push(Page::new(self.page_width, self.page_height, self.padding));
		self.pages.len() - 1
	}

	/// Checks that a `width × height` bitmap fits on an empty page
	///
	/// # Errors
	///
	/// Returns [`AtlasError::PageOverflow`] if it does not.
	pub fn check_fits(&self, name: &str, width: u32, height: u32) -> Result<(), AtlasError> {
		if width > self.page_width || height > self.page_height {
			return Err(AtlasError::PageOverflow {
				name: name.to_string(),
				width,
				height,
				page_width: self.page_width,
				page_height: self.page_height,
			});
		}
		Ok(())
	}

	/// Placement of a previously packed name
	pub fn placement(&self, name: &str) -> Option<Placement> {
		self.placed.get(name).copied()
	}

	/// Returns `true` if `name` was packed
	pub fn contains(&self, name: &str) -> bool {
		self.placed.contains_key(name)
	}

	/// Number of packed names
	pub fn len(&self) -> usize {
		self.placed.len()
	}

	/// Returns `true` if nothing was packed
	pub fn is_empty(&self) -> bool {
		self.placed.is_empty()
	}

	/// Pages in creation order
	pub fn pages(&self) -> &[Page] {
		&self.pages
	}

	/// Consumes the packer, returning its pages
	pub fn into_pages(self) -> Vec<Page> {
		self.pages
	}
}
