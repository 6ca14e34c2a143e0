//! Conversion settings.
//!
//! Settings are layered the usual way: built-in defaults, then an optional TOML
//! file, then `LODATLAS_*` environment variables. Command-line flags are applied
//! on top by the caller.
//!
//! ```toml
//! atlas_name = "assets"
//! page_size = 2048
//! padding = 0
//! pixel_format = "RGBA4444"
//! ignore = ["arrow.def", "adag.def"]
//! sprite_prefix = "av"
//! duplicates = "strict"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use lodatlas_types::file::lod::{Entry, EntryKind};
use serde::{Deserialize, Serialize};

use crate::AtlasError;

/// Prefix of the environment variables read by [`ConvertConfig::load`]
pub const ENV_PREFIX: &str = "LODATLAS";

/// Entries skipped by default: cursors, battle arrows and random-monster
/// placeholders that only make sense inside the map editor.
pub const DEFAULT_IGNORE: [&str; 15] = [
	"arrow.def",
	"avwattack.def",
	"adag.def",
	"avwmon1.def",
	"avwmon2.def",
	"avwmon3.def",
	"avwmon4.def",
	"avwmon5.def",
	"avwmon6.def",
	"avarnd1.def",
	"avarnd2.def",
	"avarnd3.def",
	"avarnd4.def",
	"avarnd5.def",
	"avtrndm0.def",
];

/// Pixel format of the page rasters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
	/// 8 bits per channel
	#[default]
	#[serde(rename = "RGBA8888", alias = "rgba8888")]
	Rgba8888,
	/// 4 bits per channel
	#[serde(rename = "RGBA4444", alias = "rgba4444")]
	Rgba4444,
}

impl PixelFormat {
	/// Name used in the atlas descriptor
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Rgba8888 => "RGBA8888",
			Self::Rgba4444 => "RGBA4444",
		}
	}
}

impl fmt::Display for PixelFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PixelFormat {
	type Err = AtlasError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"RGBA8888" => Ok(Self::Rgba8888),
			"RGBA4444" => Ok(Self::Rgba4444),
			_ => Err(AtlasError::InvalidOption(format!("unknown pixel format '{s}'"))),
		}
	}
}

/// What to do when several frames share one name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// The first frame in packing order wins, later ones are skipped
	#[default]
	KeepFirst,
	/// Later frames must be identical to the packed one
	Strict,
}

/// Settings of one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
	/// Base name of the descriptor and page files
	pub atlas_name: String,
	/// Width and height of every page
	pub page_size: u32,
	/// Transparent gap kept to the right of and below every region
	pub padding: u32,
	/// Pixel format of the page rasters
	pub pixel_format: PixelFormat,
	/// Entry names to skip, compared case-insensitively
	pub ignore: Vec<String>,
	/// When set, sprite entries must start with this prefix
	pub sprite_prefix: Option<String>,
	/// Handling of frames sharing a name
	pub duplicates: DuplicatePolicy,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		Self {
			atlas_name: "assets".to_string(),
			page_size: 2048,
			padding: 0,
			pixel_format: PixelFormat::default(),
			ignore: DEFAULT_IGNORE.iter().map(ToString::to_string).collect(),
			sprite_prefix: None,
			duplicates: DuplicatePolicy::default(),
		}
	}
}

impl ConvertConfig {
	/// Loads settings from an optional TOML file layered with `LODATLAS_*`
	/// environment variables.
	///
	/// Missing keys keep their default. `LODATLAS_IGNORE` takes a
	/// comma-separated list.
	pub fn load(path: Option<&Path>) -> Result<Self, AtlasError> {
		let mut builder = config::Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(
				config::File::from(path).format(config::FileFormat::Toml).required(true),
			);
		}
		builder = builder.add_source(
			config::Environment::with_prefix(ENV_PREFIX)
				.try_parsing(true)
				.list_separator(",")
				.with_list_parse_key("ignore"),
		);

		let loaded: Self = builder.build()?.try_deserialize()?;
		loaded.validate()?;
		Ok(loaded)
	}

	/// Checks option values that cannot produce a usable atlas
	pub fn validate(&self) -> Result<(), AtlasError> {
		if self.page_size == 0 {
			return Err(AtlasError::InvalidOption("page_size must be positive".to_string()));
		}
		if self.padding >= self.page_size {
			return Err(AtlasError::InvalidOption(format!(
				"padding {} leaves no room on a {} page",
				self.padding, self.page_size
			)));
		}
		if self.atlas_name.is_empty()
			|| self.atlas_name.contains(['/', '\\'])
			|| self.atlas_name.starts_with('.')
		{
			return Err(AtlasError::InvalidOption(format!(
				"atlas_name '{}' is not a plain file name",
				self.atlas_name
			)));
		}
		Ok(())
	}

	/// Returns `true` if `name` is on the ignore list
	pub fn is_ignored(&self, name: &str) -> bool {
		self.ignore.iter().any(|ignored| ignored.eq_ignore_ascii_case(name))
	}

	/// Returns `true` if the entry takes part in the conversion
	pub fn selects(&self, entry: &Entry) -> bool {
		let name = entry.name();
		if !has_suffix_ignore_case(&name, ".def") || self.is_ignored(&name) {
			return false;
		}

		match entry.kind() {
			EntryKind::Terrain | EntryKind::MapObject => true,
			EntryKind::Sprite => self
				.sprite_prefix
				.as_deref()
				.is_none_or(|prefix| has_prefix_ignore_case(&name, prefix)),
			EntryKind::Other => false,
		}
	}
}

fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
	name.len() >= suffix.len()
		&& name.as_bytes()[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

fn has_prefix_ignore_case(name: &str, prefix: &str) -> bool {
	name.len() >= prefix.len() && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;
	use lodatlas_types::file::lod::EntryType;
	use std::io::Write;

	fn entry(name: &str, entry_type: EntryType) -> Entry {
		Entry::new(name, 0, 0, entry_type, 0)
	}

	#[test]
	fn test_defaults() {
		let config = ConvertConfig::default();

		assert_eq!(config.atlas_name, "assets");
		assert_eq!(config.page_size, 2048);
		assert_eq!(config.padding, 0);
		assert_eq!(config.pixel_format, PixelFormat::Rgba8888);
		assert_eq!(config.duplicates, DuplicatePolicy::KeepFirst);
		assert!(config.is_ignored("AVWMON3.DEF"));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_selection() {
		let config = ConvertConfig::default();

		assert!(config.selects(&entry("Tgrs.def", EntryType::Terrain)));
		assert!(config.selects(&entry("AVXmill.DEF", EntryType::MapObject)));
		assert!(config.selects(&entry("castle.def", EntryType::Sprite)));
		assert!(!config.selects(&entry("castle.pcx", EntryType::Sprite)));
		assert!(!config.selects(&entry("cradvntr.def", EntryType::Cursor)));
		assert!(!config.selects(&entry("Arrow.def", EntryType::MapObject)));
	}

	#[test]
	fn test_sprite_prefix() {
		let config = ConvertConfig {
			sprite_prefix: Some("av".to_string()),
			..Default::default()
		};

		assert!(config.selects(&entry("AVWangl.def", EntryType::Sprite)));
		assert!(!config.selects(&entry("castle.def", EntryType::Sprite)));
		// The prefix only restricts sprites
		assert!(config.selects(&entry("castle.def", EntryType::MapObject)));
	}

	#[test]
	fn test_pixel_format_names() {
		assert_eq!("rgba4444".parse::<PixelFormat>().unwrap(), PixelFormat::Rgba4444);
		assert_eq!(PixelFormat::Rgba8888.to_string(), "RGBA8888");
		assert!("rgb565".parse::<PixelFormat>().is_err());
	}

	#[test]
	fn test_validate() {
		let config = ConvertConfig {
			padding: 2048,
			..Default::default()
		};
		assert!(matches!(config.validate(), Err(AtlasError::InvalidOption(_))));

		let config = ConvertConfig {
			atlas_name: "../escape".to_string(),
			..Default::default()
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_load_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"atlas_name = \"map\"\npage_size = 1024\npixel_format = \"RGBA4444\"\nduplicates = \"strict\"\nignore = [\"castle.def\"]"
		)
		.unwrap();

		let config = ConvertConfig::load(Some(file.path())).unwrap();
		assert_eq!(config.atlas_name, "map");
		assert_eq!(config.page_size, 1024);
		assert_eq!(config.padding, 0);
		assert_eq!(config.pixel_format, PixelFormat::Rgba4444);
		assert_eq!(config.duplicates, DuplicatePolicy::Strict);
		assert_eq!(config.ignore, vec!["castle.def".to_string()]);
	}

	#[test]
	fn test_load_rejects_bad_values() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "page_size = 0").unwrap();

		assert!(ConvertConfig::load(Some(file.path())).is_err());
	}
}
