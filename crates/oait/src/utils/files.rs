use crate::{Error, Result};
use simple_fs::read_to_string;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

// region:    --- File Parser/Writer

/// Non-empty lines of a text file, trimmed.
pub fn read_lines(file: &Path) -> Result<Vec<String>> {
	let content = read_to_string(file)?;

	Ok(content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(String::from)
		.collect())
}

pub fn save_to_json<T>(file: impl AsRef<Path>, data: &T) -> Result<()>
where
	T: serde::Serialize,
{
	let file = file.as_ref();

	let file = File::create(file).map_err(|e| Error::FileCannotCreate {
		file: file.to_string_lossy().to_string(),
		cause: e,
	})?;

	serde_json::to_writer_pretty(BufWriter::new(file), data)?;

	Ok(())
}

pub fn create_file(file: &Path) -> Result<File> {
	File::create(file).map_err(|e| Error::FileCannotCreate {
		file: file.to_string_lossy().to_string(),
		cause: e,
	})
}

// endregion: --- File Parser/Writer

// region:    --- XFile

/// Trait that has methods that returns
/// the `&str` when ok, and when none or err, returns ""
pub trait XFile {
	fn x_file_stem(&self) -> &str;
	fn x_extension(&self) -> &str;
	/// Same directory and extension, `-{suffix}` appended to the stem.
	fn x_with_stem_suffix(&self, suffix: &str) -> PathBuf;
}

impl XFile for Path {
	fn x_file_stem(&self) -> &str {
		self.file_stem().and_then(OsStr::to_str).unwrap_or("")
	}

	fn x_extension(&self) -> &str {
		self.extension().and_then(OsStr::to_str).unwrap_or("")
	}

	fn x_with_stem_suffix(&self, suffix: &str) -> PathBuf {
		let file_name = match self.x_extension() {
			"" => format!("{}-{suffix}", self.x_file_stem()),
			ext => format!("{}-{suffix}.{ext}", self.x_file_stem()),
		};
		self.with_file_name(file_name)
	}
}

// endregion: --- XFile

// region:    --- Tests


// endregion: --- Tests
