//! Archive to atlas conversion.
//!
//! Selected entries are processed in archive offset order, then group order,
//! then slot order. The first frame to claim a packed name wins; what happens
//! to later claimants is decided by [`DuplicatePolicy`].

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Seek};
use std::path::Path;

use image::RgbaImage;
use log::{debug, info, warn};
use lodatlas_types::file::def::{File as DefFile, Frame, FrameId, FrameKind, Geometry};
use lodatlas_types::file::lod::{Archive, Entry};

use crate::config::{ConvertConfig, DuplicatePolicy};
use crate::descriptor::{Descriptor, PackedRegion, PageHeader, fan_out};
use crate::packer::{Packer, Page};
use crate::writer::{AtlasFiles, page_file_name, write_atlas};
use crate::{AtlasError, compositor, terrain};

/// Names needed to emit records for frames of one entry
#[derive(Debug, Clone)]
struct Source {
	entry: String,
	aliases: Vec<Vec<String>>,
}

/// A frame that made it onto a page
#[derive(Debug, Clone)]
struct PackedFrame {
	source: usize,
	id: FrameId,
	name: String,
	kind: FrameKind,
	geometry: Geometry,
	fingerprint: u64,
}

/// Counters of one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
	/// Entries decoded
	pub entries: usize,
	/// Frame slots seen
	pub frames: usize,
	/// Distinct frames packed
	pub packed: usize,
	/// Frame slots skipped because their name was already packed
	pub duplicates: usize,
	/// Pages created
	pub pages: usize,
	/// Descriptor records emitted
	pub records: usize,
}

impl fmt::Display for Stats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} entries, {} frames ({} packed, {} duplicates), {} pages, {} records",
			self.entries, self.frames, self.packed, self.duplicates, self.pages, self.records
		)
	}
}

/// A converted atlas held in memory
#[derive(Debug)]
pub struct Atlas {
	/// Pages in creation order
	pub pages: Vec<Page>,
	/// Descriptor listing every page and record
	pub descriptor: Descriptor,
	/// Counters
	pub stats: Stats,
}

/// Drives the conversion of one archive
#[derive(Debug, Clone, Default)]
pub struct Converter {
	config: ConvertConfig,
}

impl Converter {
	/// Creates a converter with the given settings
	pub fn new(config: ConvertConfig) -> Self {
		Self {
			config,
		}
	}

	/// Settings in use
	pub fn config(&self) -> &ConvertConfig {
		&self.config
	}

	/// Entries taking part in the conversion, in processing order
	pub fn select<R>(&self, archive: &Archive<R>) -> Vec<Entry> {
		let mut selected: Vec<Entry> =
			archive.list().iter().filter(|entry| self.config.selects(entry)).copied().collect();
		selected.sort_by_key(|entry| entry.offset);
		selected
	}

	/// Converts an archive and writes the atlas into `directory`
	pub fn convert<R: Read + Seek>(
		&self,
		archive: &mut Archive<R>,
		directory: &Path,
	) -> Result<(AtlasFiles, Stats), AtlasError> {
		let atlas = self.build(archive)?;
		let files = write_atlas(
			directory,
			&self.config.atlas_name,
			atlas.pages.iter().map(Page::image),
			&atlas.descriptor,
			self.config.pixel_format,
		)?;
		Ok((files, atlas.stats))
	}

	/// Converts an archive into an in-memory atlas
	pub fn build<R: Read + Seek>(&self, archive: &mut Archive<R>) -> Result<Atlas, AtlasError> {
		self.config.validate()?;

		let entries = self.select(archive);
		info!("converting {} of {} entries", entries.len(), archive.len());

		let mut packer =
			Packer::new(self.config.page_size, self.config.page_size, self.config.padding);
		let mut sources = Vec::with_capacity(entries.len());
		let mut packed: Vec<PackedFrame> = Vec::new();
		let mut by_name: HashMap<String, usize> = HashMap::new();
		let mut stats = Stats::default();

		for entry in &entries {
			let name = entry.name();
			let data = archive.read_entry(entry)?;
			let def =
				DefFile::from_bytes(&data, entry.kind()).map_err(|err| AtlasError::sprite(&name, err))?;
			info!("{name}: {def}");

			let source = sources.len();
			sources.push(Source {
				entry: name.clone(),
				aliases: def.groups().iter().map(|group| group.aliases().to_vec()).collect(),
			});
			stats.entries += 1;

			for frame in def.frames() {
				stats.frames += 1;
				let packed_name = frame.packed_name();

				if let Some(&first) = by_name.get(&packed_name) {
					stats.duplicates += 1;
					self.check_duplicate(&packed[first], &sources, frame, &name)?;
					continue;
				}

				let image = compositor::composite(frame, def.palette());
				let (bitmap, geometry) = match frame.kind() {
					FrameKind::Terrain {
						..
					} => {
						// The canvas size comes straight from the frame header
						let g = frame.geometry();
						packer.check_fits(&packed_name, g.full_width, g.full_height)?;
						terrain::expand(&image, g)
					}
					FrameKind::Sprite => (image, *frame.geometry()),
				};
				warn_if_blank(&bitmap, &packed_name);

				packer.pack(&packed_name, &bitmap)?;
				by_name.insert(packed_name, packed.len());
				packed.push(PackedFrame {
					source,
					id: frame.id(),
					name: frame.name().to_string(),
					kind: frame.kind(),
					geometry,
					fingerprint: fingerprint(frame),
				});
			}
		}
		stats.packed = packed.len();

		let pages = packer.into_pages();
		let mut descriptor = Descriptor::new();
		for (index, page) in pages.iter().enumerate() {
			descriptor.push_page(PageHeader::new(
				page_file_name(&self.config.atlas_name, index),
				page.width(),
				page.height(),
				self.config.pixel_format,
			));

			for region in page.regions() {
				let Some(&at) = by_name.get(&region.name) else {
					continue;
				};
				let frame = &packed[at];
				let source = &sources[frame.source];
				descriptor.extend_records(fan_out(&PackedRegion {
					entry: &source.entry,
					aliases: &source.aliases[frame.id.group],
					frame_name: &frame.name,
					kind: frame.kind,
					rect: region.rect,
					geometry: frame.geometry,
				}));
			}
		}
		stats.pages = pages.len();
		stats.records = descriptor.record_count();
		info!("{stats}");

		Ok(Atlas {
			pages,
			descriptor,
			stats,
		})
	}

	fn check_duplicate(
		&self,
		first: &PackedFrame,
		sources: &[Source],
		frame: &Frame,
		entry: &str,
	) -> Result<(), AtlasError> {
		let first_entry = &sources[first.source].entry;
		match self.config.duplicates {
			DuplicatePolicy::KeepFirst => {
				debug!("{entry}: {} already packed from {first_entry}, skipped", frame.name());
				Ok(())
			}
			DuplicatePolicy::Strict if fingerprint(frame) == first.fingerprint => Ok(()),
			DuplicatePolicy::Strict => Err(AtlasError::DuplicateFrame {
				name: frame.name().to_string(),
				first_entry: first_entry.clone(),
				entry: entry.to_string(),
			}),
		}
	}
}

/// Identity of a frame's stored content
fn fingerprint(frame: &Frame) -> u64 {
	let mut hasher = DefaultHasher::new();
	frame.geometry().hash(&mut hasher);
	frame.pixels().hash(&mut hasher);
	hasher.finish()
}

fn warn_if_blank(bitmap: &RgbaImage, name: &str) {
	let (width, height) = bitmap.dimensions();
	if width > 0 && height > 0 && bitmap.pixels().all(|p| p[3] == 0) {
		warn!("{name} is fully transparent");
	}
}
