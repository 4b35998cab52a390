use crate::Result;
use console::{style, Style, StyledObject, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use oait::batch::{BatchStage, ItemKind};

// region:    --- Prompts

pub fn confirm(text: &str) -> Result<bool> {
	let theme = ColorfulTheme {
		prompt_style: Style::new().for_stderr().color256(45),
		prompt_prefix: style("?".to_string()).color256(45).for_stderr(),
		..ColorfulTheme::default()
	};

	Term::stderr().write_line("")?;
	let res = Confirm::with_theme(&theme)
		.with_prompt(text)
		.default(false)
		.interact()?;

	Ok(res)
}

// endregion: --- Prompts

// region:    --- Icons

pub fn ico_res() -> StyledObject<&'static str> {
	style("➤").color256(45)
}

pub fn ico_check() -> StyledObject<&'static str> {
	style("✔").green()
}

pub fn ico_run() -> StyledObject<&'static str> {
	style("↻").yellow()
}

pub fn ico_deleted_ok() -> StyledObject<&'static str> {
	style("⌫").green()
}

pub fn ico_err() -> StyledObject<&'static str> {
	style("✗").red()
}

// endregion: --- Icons

// region:    --- Text Output

pub fn txt_res(text: String) -> StyledObject<String> {
	style(text).bright()
}

pub fn stage_label(stage: BatchStage) -> &'static str {
	match stage {
		BatchStage::Filter => "Filtering",
		BatchStage::Fetch => "Retrieving",
		BatchStage::Delete => "Deleting",
	}
}

pub fn kind_plural(kind: ItemKind) -> &'static str {
	match kind {
		ItemKind::Thread => "threads",
		ItemKind::Asst => "assistants",
		ItemKind::File => "files",
	}
}

/// e.g., `Deleting threads [3/10]`
pub fn txt_progress(stage: BatchStage, kind: ItemKind, done: usize, total: usize) -> String {
	format!("{} {} [{done}/{total}]", stage_label(stage), kind_plural(kind))
}

/// `Waiting` followed by 1 to 3 dots, padded to a constant width.
pub fn txt_waiting(dots: u8) -> String {
	let dots = ".".repeat(dots as usize);
	format!("Waiting{dots:<3}")
}

// endregion: --- Text Output

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;

	#[test]
	fn test_txt_progress_and_waiting() -> Result<()> {
		assert_eq!(
			txt_progress(BatchStage::Delete, ItemKind::Thread, 3, 10),
			"Deleting threads [3/10]"
		);
		assert_eq!(
			txt_progress(BatchStage::Fetch, ItemKind::Asst, 1, 2),
			"Retrieving assistants [1/2]"
		);
		assert_eq!(txt_waiting(1), "Waiting.  ");
		assert_eq!(txt_waiting(3), "Waiting...");

		Ok(())
	}
}

// endregion: --- Tests
