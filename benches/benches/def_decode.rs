//! Benchmark suite for DEF frame decoding
//!
//! Measures the four frame body encodings, whole-file parsing and LOD entry
//! inflation.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench def_decode

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lodatlas_benches::{generate_def, generate_lod, generate_pixels, sizes};
use lodatlas_types::file::def::decode::decode_body;
use lodatlas_types::file::def::encode::encode_body;
use lodatlas_types::file::def::{Compression, File, Geometry};
use lodatlas_types::file::lod::{Archive, EntryKind};
use std::hint::black_box;
use std::io::Cursor;

const MODES: [(&str, Compression); 4] = [
	("raw", Compression::Raw),
	("row_rle", Compression::RowRle),
	("packed_rle", Compression::PackedRle),
	("segment_rle", Compression::SegmentRle),
];

/// Benchmark frame body decoding per compression mode
fn bench_decode_body(c: &mut Criterion) {
	let mut group = c.benchmark_group("def_decode_body");
	let (width, height) = sizes::LARGE;
	let geometry = Geometry::full(width, height);
	let pixels = generate_pixels(width, height);

	for (label, compression) in MODES {
		let body = match encode_body("bench.pcx", compression, width, height, &pixels) {
			Ok(body) => body,
			Err(err) => {
				eprintln!("Warning: could not encode {label}: {err}");
				continue;
			}
		};

		group.throughput(Throughput::Elements(u64::from(width * height)));
		group.bench_with_input(BenchmarkId::new("decode", label), &body, |b, body| {
			b.iter(|| {
				let result = decode_body("bench.pcx", compression, &geometry, black_box(body));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark parsing a whole DEF file at different frame sizes
fn bench_parse_file(c: &mut Criterion) {
	let mut group = c.benchmark_group("def_parse");

	for (label, (width, height)) in [("small", sizes::SMALL), ("tile", sizes::TILE), ("large", sizes::LARGE)] {
		let data = generate_def("bench", width, height, 8, Compression::PackedRle);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("from_bytes", label), &data, |b, data| {
			b.iter(|| {
				let result = File::from_bytes(black_box(data), EntryKind::MapObject);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark reading every entry of an archive, half of them deflated
fn bench_read_entries(c: &mut Criterion) {
	let mut group = c.benchmark_group("lod_read");
	let data = generate_lod(16, sizes::TILE.0, 4);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("read_all_entries", |b| {
		b.iter(|| {
			let mut archive = match Archive::from_reader(Cursor::new(black_box(data.as_slice()))) {
				Ok(archive) => archive,
				Err(_) => return 0,
			};
			let entries = archive.list().to_vec();
			let mut total = 0;
			for entry in &entries {
				if let Ok(bytes) = archive.read_entry(entry) {
					total += bytes.len();
				}
			}
			black_box(total)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_decode_body, bench_parse_file, bench_read_entries);
criterion_main!(benches);
