//! End-to-end conversion tests for `lodatlas`

use std::fs;
use std::io::Cursor;

use lodatlas::lodatlas_atlas::packer::Rect;
use lodatlas::prelude::*;

fn lod(builder: LodArchiveBuilder) -> LodArchive<Cursor<Vec<u8>>> {
	LodArchive::from_reader(Cursor::new(builder.build().unwrap())).unwrap()
}

fn filled(width: u32, height: u32, value: u8) -> Vec<u8> {
	vec![value; (width * height) as usize]
}

fn castle() -> Vec<u8> {
	DefFileBuilder::new(EntryType::Sprite, 64, 64)
		.group(
			GroupSpec::new(0)
				.frame(FrameSpec::new("castle0.pcx", 32, 32, filled(32, 32, 20)))
				.frame(
					FrameSpec::new("castle1.pcx", 64, 64, filled(64, 64, 21))
						.compression(Compression::PackedRle),
				),
		)
		.build()
		.unwrap()
}

/// Splits descriptor text into `(name, body lines)` records, skipping page headers
fn records(text: &str) -> Vec<(String, Vec<String>)> {
	let mut out: Vec<(String, Vec<String>)> = Vec::new();
	for line in text.lines() {
		if let Some(field) = line.strip_prefix("  ") {
			if let Some(last) = out.last_mut() {
				last.1.push(field.to_string());
			}
		} else if !line.is_empty() && !line.ends_with(".png") && !line.contains(": ") {
			out.push((line.to_string(), Vec::new()));
		}
	}
	out
}

#[test]
fn test_castle_end_to_end() {
	let root = tempfile::tempdir().unwrap();
	let out = root.path().join("atlas");
	let mut archive = lod(LodArchiveBuilder::new().add_compressed("castle.def", EntryType::Sprite, castle()));

	let (files, stats) = Converter::default().convert(&mut archive, &out).unwrap();
	assert_eq!(stats.pages, 1);
	assert_eq!(stats.records, 2);
	assert_eq!(files.pages, vec![out.join("assets_0.png")]);

	let text = fs::read_to_string(out.join("assets.atlas")).unwrap();
	assert!(text.starts_with(
		"\nassets_0.png\nsize: 2048,2048\nformat: RGBA8888\nfilter: Nearest,Nearest\nrepeat: none\n"
	));

	let records = records(&text);
	assert_eq!(records.len(), 2);

	assert_eq!(records[0].0, "castle");
	assert_eq!(records[0].1, vec![
		"rotate: false",
		"xy: 0, 0",
		"size: 32, 32",
		"orig: 32, 32",
		"offset: 0, 0",
		"index: 0",
	]);

	assert_eq!(records[1].0, "castle");
	assert!(records[1].1.contains(&"rotate: false".to_string()));
	assert!(records[1].1.contains(&"size: 64, 64".to_string()));
	assert!(records[1].1.contains(&"orig: 64, 64".to_string()));
	assert!(records[1].1.contains(&"index: 1".to_string()));

	let page = image::open(&files.pages[0]).unwrap().to_rgba8();
	assert_eq!(page.dimensions(), (2048, 2048));
	// Palette index 20 of the grayscale palette, fully opaque
	assert_eq!(page.get_pixel(0, 0).0, [20, 20, 20, 255]);
}

#[test]
fn test_ignored_entries_produce_nothing() {
	let mut archive = lod(LodArchiveBuilder::new()
		.add("AVWMON1.DEF", EntryType::MapObject, castle())
		.add("castle.def", EntryType::Sprite, castle()));

	let atlas = Converter::default().build(&mut archive).unwrap();
	assert_eq!(atlas.stats.entries, 1);

	let text = atlas.descriptor.to_string();
	assert!(!text.contains("avwmon1"));
	assert_eq!(records(&text).len(), 2);
}

#[test]
fn test_custom_ignore_list() {
	let mut archive = lod(LodArchiveBuilder::new().add("castle.def", EntryType::Sprite, castle()));
	let config = ConvertConfig {
		ignore: vec!["CASTLE.DEF".to_string()],
		..Default::default()
	};

	let atlas = Converter::new(config).build(&mut archive).unwrap();
	assert!(atlas.pages.is_empty());
	assert_eq!(atlas.descriptor.record_count(), 0);
}

#[test]
fn test_alias_fan_out() {
	// Three slots referencing one frame, plus one distinct frame
	let shared = FrameSpec::new("avxmill0.pcx", 16, 16, filled(16, 16, 30));
	let bytes = DefFileBuilder::new(EntryType::MapObject, 16, 16)
		.group(
			GroupSpec::new(0)
				.frame(shared.clone())
				.frame(FrameSpec::new("avxmill1.pcx", 16, 16, filled(16, 16, 31)))
				.frame(shared.clone())
				.frame(shared),
		)
		.build()
		.unwrap();
	let mut archive = lod(LodArchiveBuilder::new().add("AVXmill.def", EntryType::MapObject, bytes));

	let atlas = Converter::default().build(&mut archive).unwrap();
	assert_eq!(atlas.stats.packed, 2);

	let (_, records) = &atlas.descriptor.pages()[0];
	let shared: Vec<_> = records.iter().filter(|r| r.xy == (0, 0)).collect();
	assert_eq!(shared.len(), 3);
	assert!(shared.iter().all(|r| r.name == "avxmill" && r.size == (16, 16)));
	assert_eq!(shared.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2, 3]);
	assert_eq!(records.len(), 4);
}

#[test]
fn test_terrain_tiles() {
	let bytes = DefFileBuilder::new(EntryType::Terrain, 32, 32)
		.group(
			GroupSpec::new(0)
				.frame(FrameSpec::new("tgrs000.pcx", 10, 6, filled(10, 6, 40)).canvas(32, 32, 3, 20))
				.frame(FrameSpec::new("tgrs001.pcx", 32, 32, filled(32, 32, 41))),
		)
		.build()
		.unwrap();
	let mut archive = lod(LodArchiveBuilder::new().add("Tgrs.def", EntryType::Terrain, bytes));

	let atlas = Converter::default().build(&mut archive).unwrap();
	let page = &atlas.pages[0];

	for region in page.regions() {
		assert!(region.name.ends_with("_0"));
		assert_eq!((region.rect.width, region.rect.height), (32, 32));
	}

	// The cropped pixels sit at their draw offset inside the expanded tile
	let first = page.regions()[0].rect;
	let image = page.image();
	assert_eq!(image.get_pixel(first.x + 3, first.y + 20).0[3], 255);
	assert_eq!(image.get_pixel(first.x + 2, first.y + 20).0[3], 0);

	let (_, records) = &atlas.descriptor.pages()[0];
	let named: Vec<_> = records.iter().map(|r| (r.name.as_str(), r.index, r.offset, r.orig)).collect();
	assert_eq!(named, vec![
		("tgrs/0", 0, (0, 0), (32, 32)),
		("tgrs/1", 0, (0, 0), (32, 32)),
	]);
}

#[test]
fn test_multiple_pages() {
	let mut group = GroupSpec::new(0);
	for i in 0..12 {
		group = group.frame(FrameSpec::new(&format!("big{i}.pcx"), 100, 100, filled(100, 100, 50)));
	}
	let bytes = DefFileBuilder::new(EntryType::MapObject, 100, 100).group(group).build().unwrap();
	let mut archive = lod(LodArchiveBuilder::new().add("big.def", EntryType::MapObject, bytes));

	let config = ConvertConfig {
		page_size: 256,
		..Default::default()
	};
	let atlas = Converter::new(config).build(&mut archive).unwrap();

	assert_eq!(atlas.stats.packed, 12);
	assert!(atlas.pages.len() >= 2);

	let page_bounds = Rect::new(0, 0, 256, 256);
	for page in &atlas.pages {
		for region in page.regions() {
			assert!(region.rect.right() <= page_bounds.right());
			assert!(region.rect.bottom() <= page_bounds.bottom());
		}
	}

	let text = atlas.descriptor.to_string();
	assert!(text.contains("\nassets_1.png\nsize: 256,256\n"));
}

#[test]
fn test_failed_run_keeps_previous_output() {
	let root = tempfile::tempdir().unwrap();
	let out = root.path().join("atlas");

	let mut good = lod(LodArchiveBuilder::new().add("castle.def", EntryType::Sprite, castle()));
	Converter::default().convert(&mut good, &out).unwrap();
	let before = fs::read_to_string(out.join("assets.atlas")).unwrap();

	let mut broken = castle();
	broken.truncate(broken.len() - 3);
	let mut bad = lod(LodArchiveBuilder::new().add("castle.def", EntryType::Sprite, broken));

	let err = Converter::default().convert(&mut bad, &out).unwrap_err();
	assert!(matches!(err, AtlasError::Sprite { .. }));
	assert_eq!(fs::read_to_string(out.join("assets.atlas")).unwrap(), before);
}

#[test]
fn test_rgba4444_pages() {
	let root = tempfile::tempdir().unwrap();
	let out = root.path().join("atlas");
	let mut archive = lod(LodArchiveBuilder::new().add("castle.def", EntryType::Sprite, castle()));

	let config = ConvertConfig {
		pixel_format: PixelFormat::Rgba4444,
		atlas_name: "map".to_string(),
		..Default::default()
	};
	let (files, _) = Converter::new(config).convert(&mut archive, &out).unwrap();

	let text = fs::read_to_string(&files.descriptor).unwrap();
	assert!(text.starts_with("\nmap_0.png\n"));
	assert!(text.contains("format: RGBA4444\n"));

	let page = image::open(out.join("map_0.png")).unwrap().to_rgba8();
	// 20 = 0x14 is reduced to 0x11
	assert_eq!(page.get_pixel(0, 0).0, [0x11, 0x11, 0x11, 0xFF]);
}
