use crate::ais::msg::Role;
use crate::ais::thread::Thread;
use crate::ais::ThreadId;
use crate::utils::files::{create_file, save_to_json, XFile};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

const THREAD_BREAK_WIDTH: usize = 70;
const MSG_BREAK_WIDTH: usize = 20;

// region:    --- Types

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgLine {
	pub role: Role,
	pub text: String,
}

/// A thread as written to the output, messages in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
	pub thread_id: ThreadId,
	pub thread: Vec<MsgLine>,
}

impl From<Thread> for ThreadRecord {
	fn from(thread: Thread) -> Self {
		let lines = thread
			.messages
			.into_iter()
			.rev()
			.flat_map(|msg| {
				let role = msg.role;
				msg.content.into_iter().map(move |content| MsgLine {
					role,
					text: content.to_line(),
				})
			})
			.collect();

		ThreadRecord {
			thread_id: thread.thread_id,
			thread: lines,
		}
	}
}

// endregion: --- Types

// region:    --- Render

/// Human readable listing of the threads, with `[i/n]` position markers.
pub fn render_threads(records: &[ThreadRecord]) -> String {
	let mut lines: Vec<String> = Vec::new();
	let thread_break = "-".repeat(THREAD_BREAK_WIDTH);
	let msg_break = "-".repeat(MSG_BREAK_WIDTH);

	let total = records.len();
	for (idx, record) in records.iter().enumerate() {
		let progress = format!("[{}/{total}]", idx + 1);
		let width = THREAD_BREAK_WIDTH.saturating_sub(progress.len());
		lines.push(thread_break.clone());
		lines.push(format!("{:<width$}{progress}", format!("Thread ID: {}", record.thread_id)));
		lines.push(thread_break.clone());
		lines.push(String::new());

		let msg_total = record.thread.len();
		for (msg_idx, msg) in record.thread.iter().enumerate() {
			let progress = format!("[{}/{msg_total}]", msg_idx + 1);
			let width = MSG_BREAK_WIDTH.saturating_sub(progress.len());
			lines.push(msg_break.clone());
			lines.push(format!("{:<width$}{progress}", msg.role.as_str().to_uppercase()));
			lines.push(msg_break.clone());
			lines.push(msg.text.clone());
			lines.push(String::new());
		}

		lines.push(String::new());
	}

	let mut out = lines.join("\n");
	if !out.is_empty() {
		out.push('\n');
	}
	out
}

// endregion: --- Render

// region:    --- Save

/// `.json` gets the records, `.txt` the rendered listing.
pub fn save_threads(dest: &Path, records: &[ThreadRecord]) -> Result<()> {
	match dest.x_extension() {
		"json" => save_to_json(dest, &records)?,
		"txt" => create_file(dest)?.write_all(render_threads(records).as_bytes())?,
		ext => {
			return Err(Error::OutputFormat {
				kind: "threads",
				ext: ext.to_string(),
				accepted: "json, txt",
			})
		}
	}

	info!(file = %dest.display(), count = records.len(), "threads written");

	Ok(())
}

// endregion: --- Save

// region:    --- Tests


// endregion: --- Tests
