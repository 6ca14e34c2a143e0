//! LOD Atlas CLI
//!
//! A command-line tool for turning Heroes III `.lod` archives into libGDX
//! texture atlases and for inspecting their contents.
//!
//! # Usage
//!
//! ```bash
//! # Convert the adventure map sprites into out/assets.atlas + out/assets_N.png
//! lodatlas convert H3sprite.lod -o out
//!
//! # Same, with a config file and 4-bit channels
//! lodatlas convert H3sprite.lod -o out -c lodatlas.toml --format RGBA4444
//!
//! # List terrain entries as JSON
//! lodatlas list H3sprite.lod --kind terrain --json
//!
//! # Dump a single entry
//! lodatlas extract H3sprite.lod AVWANGL.DEF -o avwangl.def
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lodatlas::lodatlas_types::file::lod::{Archive, Entry, EntryKind};
use lodatlas::{ConvertConfig, Converter, DuplicatePolicy, PixelFormat};
use log::info;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "lodatlas")]
#[command(version)]
#[command(about = "Heroes III LOD archive to libGDX texture atlas converter", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Convert the sprites of an archive into a texture atlas
	Convert {
		/// Input LOD archive
		#[arg(value_name = "LOD")]
		input: PathBuf,

		/// Output directory, replaced as a whole
		#[arg(short, long, value_name = "DIR")]
		output: PathBuf,

		/// Base name of the atlas files
		#[arg(short = 'n', long, value_name = "NAME")]
		name: Option<String>,

		/// TOML configuration file
		#[arg(short, long, value_name = "CONFIG")]
		config: Option<PathBuf>,

		/// Page pixel format (RGBA8888 or RGBA4444)
		#[arg(long, value_name = "FORMAT")]
		format: Option<PixelFormat>,

		/// Fail when two different frames share a name
		#[arg(long)]
		strict: bool,

		/// Page width and height in pixels
		#[arg(long, value_name = "N")]
		page_size: Option<u32>,

		/// Gap between packed frames in pixels
		#[arg(long, value_name = "N")]
		padding: Option<u32>,
	},

	/// Print the file table of an archive
	List {
		/// Input LOD archive
		#[arg(value_name = "LOD")]
		input: PathBuf,

		/// Print JSON instead of a table
		#[arg(long)]
		json: bool,

		/// Only list entries of this kind
		#[arg(long, value_enum, value_name = "KIND")]
		kind: Option<KindFilter>,
	},

	/// Write the (inflated) bytes of one entry to a file
	Extract {
		/// Input LOD archive
		#[arg(value_name = "LOD")]
		input: PathBuf,

		/// Entry name, case-insensitive
		#[arg(value_name = "ENTRY")]
		entry: String,

		/// Output file, defaults to the entry name
		#[arg(short, long, value_name = "FILE")]
		output: Option<PathBuf>,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum KindFilter {
	Terrain,
	Sprite,
	MapObject,
	Other,
}

impl From<KindFilter> for EntryKind {
	fn from(kind: KindFilter) -> Self {
		match kind {
			KindFilter::Terrain => EntryKind::Terrain,
			KindFilter::Sprite => EntryKind::Sprite,
			KindFilter::MapObject => EntryKind::MapObject,
			KindFilter::Other => EntryKind::Other,
		}
	}
}

/// One file table row for `list --json`
#[derive(Serialize)]
struct EntryRow {
	name: String,
	offset: u32,
	size: u32,
	compressed_size: u32,
	entry_type: u32,
	kind: EntryKind,
}

impl From<&Entry> for EntryRow {
	fn from(entry: &Entry) -> Self {
		Self {
			name: entry.name(),
			offset: entry.offset,
			size: entry.size,
			compressed_size: entry.compressed_size,
			entry_type: entry.entry_type.to_u32(),
			kind: entry.kind(),
		}
	}
}

fn open_archive(path: &Path) -> Result<Archive<std::io::BufReader<fs::File>>> {
	Archive::open(path).with_context(|| format!("Failed to open archive {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
fn convert(
	input: &Path,
	output: &Path,
	name: Option<String>,
	config_path: Option<&Path>,
	format: Option<PixelFormat>,
	strict: bool,
	page_size: Option<u32>,
	padding: Option<u32>,
) -> Result<()> {
	let mut config = ConvertConfig::load(config_path).context("Failed to load configuration")?;
	if let Some(name) = name {
		config.atlas_name = name;
	}
	if let Some(format) = format {
		config.pixel_format = format;
	}
	if strict {
		config.duplicates = DuplicatePolicy::Strict;
	}
	if let Some(page_size) = page_size {
		config.page_size = page_size;
	}
	if let Some(padding) = padding {
		config.padding = padding;
	}
	config.validate()?;

	let mut archive = open_archive(input)?;
	info!("{}: {} entries", input.display(), archive.len());

	let converter = Converter::new(config);
	let (files, stats) = converter
		.convert(&mut archive, output)
		.with_context(|| format!("Failed to convert {}", input.display()))?;

	println!("{stats}");
	println!("Descriptor: {}", files.descriptor.display());
	for page in &files.pages {
		println!("Page: {}", page.display());
	}
	Ok(())
}

fn list(input: &Path, json: bool, kind: Option<KindFilter>) -> Result<()> {
	let archive = open_archive(input)?;
	let kind = kind.map(EntryKind::from);
	let entries: Vec<&Entry> =
		archive.list().iter().filter(|entry| kind.is_none_or(|k| entry.kind() == k)).collect();

	if json {
		let rows: Vec<EntryRow> = entries.into_iter().map(EntryRow::from).collect();
		println!("{}", serde_json::to_string_pretty(&rows)?);
		return Ok(());
	}

	println!("{:<16} {:>10} {:>10} {:>10}  {}", "NAME", "OFFSET", "SIZE", "STORED", "TYPE");
	for entry in &entries {
		println!(
			"{:<16} {:>10} {:>10} {:>10}  {}",
			entry.name(),
			entry.offset,
			entry.size,
			entry.stored_size(),
			entry.entry_type
		);
	}
	println!("{} of {} entries", entries.len(), archive.len());
	Ok(())
}

fn extract(input: &Path, name: &str, output: Option<PathBuf>) -> Result<()> {
	let mut archive = open_archive(input)?;
	let data = archive
		.read_by_name(name)
		.with_context(|| format!("Failed to read {name} from {}", input.display()))?;

	let output = output.unwrap_or_else(|| PathBuf::from(name));
	fs::write(&output, &data).with_context(|| format!("Failed to write {}", output.display()))?;

	println!("Extracted {name} ({} bytes) to {}", data.len(), output.display());
	Ok(())
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	match cli.command {
		Commands::Convert {
			input,
			output,
			name,
			config,
			format,
			strict,
			page_size,
			padding,
		} => convert(
			&input,
			&output,
			name,
			config.as_deref(),
			format,
			strict,
			page_size,
			padding,
		),
		Commands::List {
			input,
			json,
			kind,
		} => list(&input, json, kind),
		Commands::Extract {
			input,
			entry,
			output,
		} => extract(&input, &entry, output),
	}
}
