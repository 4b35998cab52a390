//! The `output` module writes retrieved data to a destination file.
//!
//! Values are tagged by the api layer (`OutputValue`) and dispatched on the tag:
//! - Record: pretty json, `.json` only (several records become one json array).
//! - Binary: raw image (`.png`), or one `{"image_base64": ...}` line per image (`.jsonl`).
//! - List: each item dispatched to the same destination.
//!
//! The whole value is checked against the destination extension before anything is written.
//!
//! Threads have their own formatting in `thread`.

// region:    --- Modules

mod thread;

pub use thread::{render_threads, save_threads, MsgLine, ThreadRecord};

use crate::utils::files::{create_file, save_to_json, XFile};
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Local;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// endregion: --- Modules

const TIMESTAMP_FMT: &str = "%d-%m-%Y_%H-%M-%S";

// region:    --- Types

#[derive(Debug, Clone)]
pub enum OutputValue {
	Record(Value),
	Binary(Vec<u8>),
	List(Vec<OutputValue>),
}

impl OutputValue {
	/// Extension of the default destination, from the first leaf value.
	pub fn default_ext(&self) -> &'static str {
		match self {
			OutputValue::Record(_) => "json",
			OutputValue::Binary(_) => "png",
			OutputValue::List(items) => items.first().map_or("json", OutputValue::default_ext),
		}
	}
}

// endregion: --- Types

/// `{prefix}-{timestamp}.{ext}` in the working directory.
pub fn default_output_path(prefix: &str, value: &OutputValue) -> PathBuf {
	let now = Local::now().format(TIMESTAMP_FMT);
	PathBuf::from(format!("{prefix}-{now}.{}", value.default_ext()))
}

pub fn write_value(value: &OutputValue, dest: &Path) -> Result<()> {
	check_format(value, dest.x_extension())?;

	let mut writer = ValueWriter::new(dest);
	writer.write(value)?;
	writer.finish()
}

fn check_format(value: &OutputValue, ext: &str) -> Result<()> {
	match value {
		OutputValue::Record(_) if ext == "json" => Ok(()),
		OutputValue::Record(_) => Err(Error::OutputFormat {
			kind: "record",
			ext: ext.to_string(),
			accepted: "json",
		}),
		OutputValue::Binary(_) if matches!(ext, "png" | "jsonl") => Ok(()),
		OutputValue::Binary(_) => Err(Error::OutputFormat {
			kind: "image",
			ext: ext.to_string(),
			accepted: "png, jsonl",
		}),
		OutputValue::List(items) => items.iter().try_for_each(|item| check_format(item, ext)),
	}
}

/// Api objects as one pretty json array (`.json` only), readable back as an id input file.
pub fn save_records<T: Serialize>(dest: &Path, records: &[T]) -> Result<()> {
	match dest.x_extension() {
		"json" => {
			save_to_json(dest, &records)?;
			info!(file = %dest.display(), count = records.len(), "records written");
			Ok(())
		}
		ext => Err(Error::OutputFormat {
			kind: "records",
			ext: ext.to_string(),
			accepted: "json",
		}),
	}
}

pub fn render_records<T: Serialize>(records: &[T]) -> Result<String> {
	Ok(serde_json::to_string_pretty(records)?)
}

// region:    --- ValueWriter

struct ValueWriter<'a> {
	dest: &'a Path,
	records: Vec<&'a Value>,
	images_written: usize,
	jsonl: Option<BufWriter<File>>,
}

impl<'a> ValueWriter<'a> {
	fn new(dest: &'a Path) -> Self {
		Self {
			dest,
			records: Vec::new(),
			images_written: 0,
			jsonl: None,
		}
	}

	fn write(&mut self, value: &'a OutputValue) -> Result<()> {
		match value {
			OutputValue::Record(record) => self.write_record(record),
			OutputValue::Binary(bytes) => self.write_binary(bytes),
			OutputValue::List(items) => {
				for item in items {
					self.write(item)?;
				}
				Ok(())
			}
		}
	}

	/// Format checked by `check_format`.
	fn write_record(&mut self, record: &'a Value) -> Result<()> {
		self.records.push(record);
		Ok(())
	}

	/// `.png` or `.jsonl`, checked by `check_format`.
	fn write_binary(&mut self, bytes: &[u8]) -> Result<()> {
		if self.dest.x_extension() == "png" {
			let file = if self.images_written == 0 {
				self.dest.to_path_buf()
			} else {
				self.dest.x_with_stem_suffix(&self.images_written.to_string())
			};
			create_file(&file)?.write_all(bytes)?;
			self.images_written += 1;
			info!(file = %file.display(), "image written");
			return Ok(());
		}

		if self.jsonl.is_none() {
			let file = create_file(self.dest)?;
			self.jsonl = Some(BufWriter::new(file));
		}
		if let Some(writer) = self.jsonl.as_mut() {
			let line = json!({ "image_base64": STANDARD.encode(bytes) });
			serde_json::to_writer(&mut *writer, &line)?;
			writer.write_all(b"\n")?;
		}
		Ok(())
	}

	fn finish(mut self) -> Result<()> {
		match self.records.as_slice() {
			[] => (),
			[record] => save_to_json(self.dest, record)?,
			records => save_to_json(self.dest, &records)?,
		}
		if !self.records.is_empty() {
			info!(file = %self.dest.display(), count = self.records.len(), "records written");
		}

		if let Some(mut writer) = self.jsonl.take() {
			writer.flush()?;
			info!(file = %self.dest.display(), "image lines written");
		}

		Ok(())
	}
}

// endregion: --- ValueWriter

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use std::fs;

	#[test]
	fn test_write_value_record_json() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("image.json");
		let value = OutputValue::Record(json!({"url": "https://img/1.png"}));

		// -- Exec
		write_value(&value, &dest)?;

		// -- Check
		let written: Value = serde_json::from_str(&fs::read_to_string(&dest)?)?;
		assert_eq!(written["url"], "https://img/1.png");

		Ok(())
	}

	#[test]
	fn test_write_value_record_list_is_array() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("images.json");
		let value = OutputValue::List(vec![
			OutputValue::Record(json!({"url": "u1"})),
			OutputValue::Record(json!({"url": "u2"})),
		]);

		// -- Exec
		write_value(&value, &dest)?;

		// -- Check
		let written: Value = serde_json::from_str(&fs::read_to_string(&dest)?)?;
		assert_eq!(written, json!([{"url": "u1"}, {"url": "u2"}]));

		Ok(())
	}

	#[test]
	fn test_write_value_record_to_png_fails() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("image.png");
		let value = OutputValue::Record(json!({"url": "u1"}));

		// -- Exec
		let res = write_value(&value, &dest);

		// -- Check
		assert!(matches!(
			res,
			Err(crate::Error::OutputFormat { kind: "record", ext, .. }) if ext == "png"
		));
		assert!(!dest.exists());

		Ok(())
	}

	#[test]
	fn test_write_value_mixed_list_to_png_writes_nothing() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("image.png");
		let value = OutputValue::List(vec![
			OutputValue::Binary(vec![1, 2, 3]),
			OutputValue::Record(json!({"url": "u1"})),
		]);

		// -- Exec
		let res = write_value(&value, &dest);

		// -- Check
		assert!(matches!(
			res,
			Err(crate::Error::OutputFormat { kind: "record", .. })
		));
		assert_eq!(fs::read_dir(dir.path())?.count(), 0);

		Ok(())
	}

	#[test]
	fn test_save_records_array_and_format() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("assts.json");
		let records = vec![json!({"id": "asst_a", "created_at": 1})];

		// -- Exec
		save_records(&dest, &records)?;
		let res = save_records(&dir.path().join("assts.txt"), &records);

		// -- Check
		let written: Value = serde_json::from_str(&fs::read_to_string(&dest)?)?;
		assert_eq!(written, json!([{"id": "asst_a", "created_at": 1}]));
		assert!(matches!(
			res,
			Err(crate::Error::OutputFormat { kind: "records", .. })
		));

		Ok(())
	}

	#[test]
	fn test_write_value_binary_jsonl_base64_lines() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("images.jsonl");
		let value = OutputValue::List(vec![
			OutputValue::Binary(b"first".to_vec()),
			OutputValue::Binary(b"second".to_vec()),
		]);

		// -- Exec
		write_value(&value, &dest)?;

		// -- Check
		let content = fs::read_to_string(&dest)?;
		let lines: Vec<Value> = content
			.lines()
			.map(serde_json::from_str)
			.collect::<core::result::Result<_, _>>()?;
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0]["image_base64"], STANDARD.encode(b"first"));
		assert_eq!(lines[1]["image_base64"], STANDARD.encode(b"second"));

		Ok(())
	}

	#[test]
	fn test_write_value_binary_png_numbered() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let dest = dir.path().join("image.png");
		let value = OutputValue::List(vec![
			OutputValue::Binary(vec![1, 2, 3]),
			OutputValue::Binary(vec![4, 5]),
		]);

		// -- Exec
		write_value(&value, &dest)?;

		// -- Check
		assert_eq!(fs::read(&dest)?, vec![1, 2, 3]);
		assert_eq!(fs::read(dir.path().join("image-1.png"))?, vec![4, 5]);

		Ok(())
	}

	#[test]
	fn test_default_output_path_ext() -> Result<()> {
		let image = OutputValue::List(vec![OutputValue::Binary(vec![0])]);
		let record = OutputValue::Record(json!({}));

		assert_eq!(default_output_path("image", &image).x_extension(), "png");
		assert_eq!(default_output_path("image", &record).x_extension(), "json");

		Ok(())
	}
}

// endregion: --- Tests
