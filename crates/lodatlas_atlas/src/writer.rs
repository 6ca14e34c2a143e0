//! Atlas output.
//!
//! All files of an atlas are written into a staging directory created next to
//! the destination and moved into place in one rename once every file is
//! complete. A failed run leaves an earlier atlas at the destination intact.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use log::{debug, info};

use crate::AtlasError;
use crate::config::PixelFormat;
use crate::descriptor::Descriptor;

/// Prefix of the staging directories
const STAGING_PREFIX: &str = ".lodatlas-";

/// File name of page `index`
pub fn page_file_name(atlas_name: &str, index: usize) -> String {
	format!("{atlas_name}_{index}.png")
}

/// File name of the descriptor
pub fn descriptor_file_name(atlas_name: &str) -> String {
	format!("{atlas_name}.atlas")
}

/// Reduces every channel to 4 bits, spreading the result over the full range
pub fn quantize_4444(image: &mut RgbaImage) {
	for channel in image.iter_mut() {
		*channel = (*channel >> 4) * 17;
	}
}

/// Encodes a page as PNG in the given pixel format
pub fn encode_page<W: Write>(
	writer: W,
	image: &RgbaImage,
	format: PixelFormat,
) -> Result<(), AtlasError> {
	let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);

	match format {
		PixelFormat::Rgba8888 => {
			encoder.write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)?;
		}
		PixelFormat::Rgba4444 => {
			let mut reduced = image.clone();
			quantize_4444(&mut reduced);
			encoder.write_image(
				reduced.as_raw(),
				reduced.width(),
				reduced.height(),
				ExtendedColorType::Rgba8,
			)?;
		}
	}
	Ok(())
}

/// Paths of a written atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasFiles {
	/// Output directory
	pub directory: PathBuf,
	/// Descriptor path
	pub descriptor: PathBuf,
	/// Page raster paths in page order
	pub pages: Vec<PathBuf>,
}

/// Writes the page rasters and the descriptor into `directory`.
///
/// `pages` must be in the order the descriptor lists them. Any previous
/// contents of `directory` are replaced.
pub fn write_atlas<'a>(
	directory: &Path,
	atlas_name: &str,
	pages: impl IntoIterator<Item = &'a RgbaImage>,
	descriptor: &Descriptor,
	format: PixelFormat,
) -> Result<AtlasFiles, AtlasError> {
	let parent = match directory.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => PathBuf::from("."),
	};
	fs::create_dir_all(&parent)?;

	let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir_in(&parent)?;
	debug!("staging atlas in {}", staging.path().display());

	let mut page_names = Vec::new();
	for (index, image) in pages.into_iter().enumerate() {
		let name = page_file_name(atlas_name, index);
		let file = fs::File::create(staging.path().join(&name))?;
		let mut writer = BufWriter::new(file);
		encode_page(&mut writer, image, format)?;
		writer.flush()?;
		debug!("wrote {name} ({}×{})", image.width(), image.height());
		page_names.push(name);
	}

	let descriptor_name = descriptor_file_name(atlas_name);
	fs::write(staging.path().join(&descriptor_name), descriptor.to_string())?;

	publish(staging.path(), directory, &parent)?;
	info!(
		"wrote {} page(s) and {} records to {}",
		page_names.len(),
		descriptor.record_count(),
		directory.display()
	);

	Ok(AtlasFiles {
		directory: directory.to_path_buf(),
		descriptor: directory.join(descriptor_name),
		pages: page_names.into_iter().map(|name| directory.join(name)).collect(),
	})
}

/// Moves `staged` to `directory`, replacing what was there
fn publish(staged: &Path, directory: &Path, parent: &Path) -> Result<(), AtlasError> {
	if !directory.exists() {
		fs::rename(staged, directory)?;
		return Ok(());
	}

	// The previous output is parked inside a temporary directory that removes
	// it when dropped
	let trash = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir_in(parent)?;
	let parked = trash.path().join("previous");
	fs::rename(directory, &parked)?;

	if let Err(err) = fs::rename(staged, directory) {
		fs::rename(&parked, directory)?;
		return Err(err.into());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::PageHeader;
	use image::Rgba;

	fn descriptor(pages: usize) -> Descriptor {
		let mut descriptor = Descriptor::new();
		for index in 0..pages {
			descriptor.push_page(PageHeader::new(
				page_file_name("assets", index),
				8,
				8,
				PixelFormat::Rgba8888,
			));
		}
		descriptor
	}

	#[test]
	fn test_quantize_4444() {
		let mut image = RgbaImage::from_pixel(1, 1, Rgba([0x00, 0x1F, 0x80, 0xFF]));
		quantize_4444(&mut image);
		assert_eq!(*image.get_pixel(0, 0), Rgba([0x00, 0x11, 0x88, 0xFF]));
	}

	#[test]
	fn test_write_atlas() {
		let root = tempfile::tempdir().unwrap();
		let out = root.path().join("atlas");
		let pages = [RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 4])), RgbaImage::new(8, 8)];

		let files = write_atlas(&out, "assets", &pages, &descriptor(2), PixelFormat::Rgba8888).unwrap();

		assert_eq!(files.pages, vec![out.join("assets_0.png"), out.join("assets_1.png")]);
		assert!(files.descriptor.ends_with("assets.atlas"));

		let text = fs::read_to_string(&files.descriptor).unwrap();
		assert!(text.starts_with("\nassets_0.png\nsize: 8,8\n"));

		let decoded = image::open(&files.pages[0]).unwrap().to_rgba8();
		assert_eq!(decoded, pages[0]);

		// Nothing but the output directory is left behind
		let leftovers: Vec<_> = fs::read_dir(root.path()).unwrap().collect();
		assert_eq!(leftovers.len(), 1);
	}

	#[test]
	fn test_write_atlas_replaces_previous_output() {
		let root = tempfile::tempdir().unwrap();
		let out = root.path().join("atlas");
		fs::create_dir_all(&out).unwrap();
		fs::write(out.join("stale.png"), b"old").unwrap();

		write_atlas(&out, "assets", &[RgbaImage::new(8, 8)], &descriptor(1), PixelFormat::Rgba4444)
			.unwrap();

		assert!(!out.join("stale.png").exists());
		assert!(out.join("assets_0.png").exists());
		assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
	}
}
