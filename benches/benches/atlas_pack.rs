//! Benchmark suite for atlas assembly
//!
//! Covers palette compositing, rectangle packing and a full in-memory
//! conversion of a synthetic archive.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench atlas_pack

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use lodatlas_atlas::compositor::composite;
use lodatlas_atlas::packer::Packer;
use lodatlas_atlas::{ConvertConfig, Converter};
use lodatlas_benches::{generate_def, generate_lod, sizes};
use lodatlas_types::file::def::{Compression, File};
use lodatlas_types::file::lod::{Archive, EntryKind};
use std::hint::black_box;
use std::io::Cursor;

/// Benchmark turning indexed frames into RGBA bitmaps
fn bench_composite(c: &mut Criterion) {
	let mut group = c.benchmark_group("atlas_composite");
	let (width, height) = sizes::LARGE;
	let data = generate_def("bench", width, height, 1, Compression::RowRle);

	let file = match File::from_bytes(&data, EntryKind::MapObject) {
		Ok(file) => file,
		Err(err) => {
			eprintln!("Warning: could not parse synthetic DEF: {err}");
			return;
		}
	};
	let Some(frame) = file.frames().next() else {
		return;
	};

	group.throughput(Throughput::Elements(u64::from(width * height)));
	group.bench_function("composite", |b| {
		b.iter(|| black_box(composite(black_box(frame), file.palette())));
	});

	group.finish();
}

/// Benchmark packing many bitmaps of mixed sizes
fn bench_packer(c: &mut Criterion) {
	let mut group = c.benchmark_group("atlas_packer");

	let bitmaps: Vec<RgbaImage> = (0..512u32)
		.map(|i| RgbaImage::from_pixel(16 + (i * 37) % 96, 16 + (i * 53) % 80, Rgba([255, 0, 0, 255])))
		.collect();

	for padding in [0u32, 2] {
		group.throughput(Throughput::Elements(bitmaps.len() as u64));
		group.bench_with_input(BenchmarkId::new("pack_512", padding), &bitmaps, |b, bitmaps| {
			b.iter(|| {
				let mut packer = Packer::new(1024, 1024, padding);
				for (i, bitmap) in bitmaps.iter().enumerate() {
					let _ = packer.pack(&format!("frame{i}"), bitmap);
				}
				black_box(packer.pages().len())
			});
		});
	}

	group.finish();
}

/// Benchmark a full conversion without writing files
fn bench_build_atlas(c: &mut Criterion) {
	let mut group = c.benchmark_group("atlas_build");
	group.sample_size(20);

	let data = generate_lod(16, sizes::TILE.0, 4);
	let converter = Converter::new(ConvertConfig {
		page_size: 1024,
		..Default::default()
	});

	group.bench_function("build_16_entries", |b| {
		b.iter(|| {
			let mut archive = match Archive::from_reader(Cursor::new(data.as_slice())) {
				Ok(archive) => archive,
				Err(_) => return 0,
			};
			let pages = converter.build(&mut archive).map(|atlas| atlas.pages.len()).unwrap_or(0);
			black_box(pages)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_composite, bench_packer, bench_build_atlas);
criterion_main!(benches);
