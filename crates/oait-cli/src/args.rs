//! Command line surface of `oait`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

// region:    --- Cli

#[derive(Debug, Parser)]
#[command(name = "oait", version, about = "OpenAI tools: threads, images and assistants")]
pub struct Cli {
	/// OpenAI api key
	#[arg(short = 'k', long = "key", env = "OPENAI_API_KEY", hide_env_values = true)]
	pub api_key: Option<String>,

	/// OpenAI organization id
	#[arg(long = "org", env = "OPENAI_ORG_ID")]
	pub org_id: Option<String>,

	/// TOML config file (default: ./oait.toml if present)
	#[arg(short = 'c', long = "config")]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub log: LogArgs,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Args)]
pub struct LogArgs {
	/// Console log level INFO
	#[arg(short = 'v', long, group = "level")]
	pub verbose: bool,

	/// Console log level DEBUG
	#[arg(short = 'd', long, group = "level")]
	pub debug: bool,

	/// Console log level ERROR
	#[arg(short = 's', long, group = "level")]
	pub silent: bool,

	/// No console log
	#[arg(short = 'S', long = "super-silent", group = "level")]
	pub super_silent: bool,

	/// Also log to logs_oait_<timestamp>.txt (DEBUG)
	#[arg(short = 'l', long = "log-file")]
	pub log_file: bool,
}

impl LogArgs {
	pub fn console_level(&self) -> LevelFilter {
		if self.verbose {
			LevelFilter::INFO
		} else if self.debug {
			LevelFilter::DEBUG
		} else if self.silent {
			LevelFilter::ERROR
		} else if self.super_silent {
			LevelFilter::OFF
		} else {
			LevelFilter::WARN
		}
	}
}

// endregion: --- Cli

// region:    --- Commands

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Retrieve, delete or create threads, add messages
	#[command(subcommand)]
	Threads(ThreadsCmd),

	/// Generate or retrieve images
	#[command(subcommand)]
	Images(ImagesCmd),

	/// Create, modify, run, retrieve or delete assistants
	#[command(subcommand)]
	Assts(AsstsCmd),

	/// Retrieve or delete uploaded files
	#[command(subcommand)]
	Files(FilesCmd),
}

/// Exactly one of the ids, `-f` or `-s` is expected.
#[derive(Debug, Args)]
pub struct IdSourceArgs {
	/// Thread ids
	pub ids: Vec<String>,

	/// Input file of thread ids (.json or .txt)
	#[arg(short = 'f', long = "file", num_args = 0..=1, default_missing_value = "input.txt")]
	pub file: Option<PathBuf>,

	/// Session token, to list the threads of a browser session
	#[arg(short = 's', long = "session")]
	pub session: Option<String>,

	/// Max number of threads listed from the session
	#[arg(short = 'l', long = "limit")]
	pub limit: Option<u32>,
}

/// Exactly one of the ids, `-f` or `-A` is expected.
#[derive(Debug, Args)]
pub struct ItemSourceArgs {
	/// Object ids
	pub ids: Vec<String>,

	/// Input file of ids (.json or .txt)
	#[arg(short = 'f', long = "file", num_args = 0..=1, default_missing_value = "input.txt")]
	pub file: Option<PathBuf>,

	/// All the objects of the organization
	#[arg(short = 'A', long = "all")]
	pub all: bool,
}

/// Creation time filters, both may be given.
#[derive(Debug, Args)]
pub struct DaysArgs {
	/// Keep what was created within the last N days
	#[arg(short = 'd', long = "days", allow_negative_numbers = true)]
	pub within: Option<f64>,

	/// Keep what was created more than N days ago
	#[arg(short = 'D', long = "older-than", allow_negative_numbers = true)]
	pub older_than: Option<f64>,
}

#[derive(Debug, Args)]
pub struct NameArgs {
	/// Keep the names containing this text (repeatable, all must match)
	#[arg(short = 'n', long = "name")]
	pub contains: Vec<String>,

	/// Drop the names containing this text (repeatable)
	#[arg(short = 'N', long = "not-name")]
	pub not_contains: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum ThreadsCmd {
	/// Retrieve threads and their messages
	Ret {
		#[command(flatten)]
		source: IdSourceArgs,

		/// Output file (.json or .txt), prints the threads when absent
		#[arg(short = 'o', long = "output", num_args = 0..=1, default_missing_value = "output.json")]
		output: Option<PathBuf>,

		/// Keep the threads with at least this many messages
		#[arg(short = 'm', long = "minlen", default_value_t = 1)]
		min_len: usize,

		// filters on the newest message creation time
		#[command(flatten)]
		days: DaysArgs,
	},

	/// Delete threads
	Del {
		#[command(flatten)]
		source: IdSourceArgs,

		/// Delete only the threads with at most this many messages
		/// (default 1 for a file or a session, no filter for explicit ids)
		#[arg(short = 'M', long = "maxlen")]
		max_len: Option<usize>,

		// filters on the newest message creation time
		#[command(flatten)]
		days: DaysArgs,

		/// Do not ask for confirmation
		#[arg(short = 'y', long = "yes")]
		yes: bool,
	},

	/// Create a thread, optionally with initial user messages
	Create {
		#[arg(short = 'm', long = "message")]
		messages: Vec<String>,
	},

	/// Add a user message to a thread
	Add {
		thread_id: String,

		#[arg(short = 'm', long = "message")]
		message: String,
	},
}

#[derive(Debug, Subcommand)]
pub enum ImagesCmd {
	/// Generate an image from a prompt
	Gen {
		#[arg(short = 'p', long = "prompt")]
		prompt: String,

		/// Image model (default from config)
		#[arg(long = "model")]
		model: Option<String>,

		/// Image size (default from config)
		#[arg(long = "size")]
		size: Option<String>,

		/// Output file (.json), image-<timestamp>.json when absent
		#[arg(short = 'o', long = "output", num_args = 0..=1)]
		output: Option<PathBuf>,
	},

	/// Retrieve an image by file id or url
	Ret {
		#[command(flatten)]
		src: ImageSrcArgs,

		/// Output file (.png or .jsonl), image-<timestamp>.png when absent
		#[arg(short = 'o', long = "output", num_args = 0..=1)]
		output: Option<PathBuf>,
	},
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ImageSrcArgs {
	/// File id of an uploaded image
	#[arg(short = 'f', long = "file-id")]
	pub file_id: Option<String>,

	/// Url of the image
	#[arg(short = 'u', long = "url")]
	pub url: Option<String>,
}

#[derive(Debug, Args)]
pub struct AsstOptArgs {
	#[arg(short = 'd', long = "description")]
	pub description: Option<String>,

	#[arg(short = 'm', long = "model")]
	pub model: Option<String>,

	/// Comma separated tools (code, retrieval)
	#[arg(short = 't', long = "tools")]
	pub tools: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AsstsCmd {
	/// Create an assistant
	Create {
		#[arg(short = 'n', long = "name")]
		name: String,

		#[arg(short = 'i', long = "instructions")]
		instructions: String,

		#[command(flatten)]
		opts: AsstOptArgs,
	},

	/// Modify the given fields of an assistant
	Modify {
		asst_id: String,

		#[arg(short = 'n', long = "name")]
		name: Option<String>,

		#[arg(short = 'i', long = "instructions")]
		instructions: Option<String>,

		#[command(flatten)]
		opts: AsstOptArgs,
	},

	/// Run an assistant on a thread and print its reply
	Run {
		asst_id: String,

		thread_id: String,

		/// Wait on this existing run instead of starting one
		#[arg(short = 'r', long = "run-id")]
		run_id: Option<String>,
	},

	/// Retrieve assistants
	Get {
		#[command(flatten)]
		source: ItemSourceArgs,

		#[command(flatten)]
		names: NameArgs,

		#[command(flatten)]
		days: DaysArgs,

		/// Output file (.json), prints the assistants when absent
		#[arg(short = 'o', long = "output", num_args = 0..=1, default_missing_value = "output.json")]
		output: Option<PathBuf>,
	},

	/// Delete assistants
	Del {
		#[command(flatten)]
		source: ItemSourceArgs,

		#[command(flatten)]
		names: NameArgs,

		#[command(flatten)]
		days: DaysArgs,

		/// Do not ask for confirmation
		#[arg(short = 'y', long = "yes")]
		yes: bool,
	},
}

#[derive(Debug, Subcommand)]
pub enum FilesCmd {
	/// Retrieve uploaded files (metadata)
	Get {
		#[command(flatten)]
		source: ItemSourceArgs,

		// filters on the file name
		#[command(flatten)]
		names: NameArgs,

		#[command(flatten)]
		days: DaysArgs,

		/// Output file (.json), prints the files when absent
		#[arg(short = 'o', long = "output", num_args = 0..=1, default_missing_value = "output.json")]
		output: Option<PathBuf>,
	},

	/// Delete uploaded files
	Del {
		#[command(flatten)]
		source: ItemSourceArgs,

		// filters on the file name
		#[command(flatten)]
		names: NameArgs,

		#[command(flatten)]
		days: DaysArgs,

		/// Do not ask for confirmation
		#[arg(short = 'y', long = "yes")]
		yes: bool,
	},
}

// endregion: --- Commands

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;

	fn parse(args: &[&str]) -> core::result::Result<Cli, clap::Error> {
		Cli::try_parse_from(std::iter::once("oait").chain(args.iter().copied()))
	}

	#[test]
	fn test_args_threads_ret_defaults() -> Result<()> {
		// -- Exec
		let cli = parse(&["-k", "sk-test", "threads", "ret", "-f", "-o"])?;

		// -- Check
		let Command::Threads(ThreadsCmd::Ret {
			source,
			output,
			min_len,
			days,
		}) = cli.command
		else {
			return Err("should be threads ret".into());
		};
		assert_eq!(source.file, Some(PathBuf::from("input.txt")));
		assert_eq!(output, Some(PathBuf::from("output.json")));
		assert_eq!(min_len, 1);
		assert_eq!(days.within, None);
		assert!(source.ids.is_empty());
		assert_eq!(source.limit, None);

		Ok(())
	}

	#[test]
	fn test_args_threads_del_ids_and_flags() -> Result<()> {
		// -- Exec
		let cli = parse(&["-k", "sk-test", "threads", "del", "thread_a", "thread_b", "-M", "3", "-y"])?;

		// -- Check
		let Command::Threads(ThreadsCmd::Del {
			source,
			max_len,
			yes,
			..
		}) = cli.command
		else {
			return Err("should be threads del".into());
		};
		assert_eq!(source.ids, vec!["thread_a", "thread_b"]);
		assert_eq!(max_len, Some(3));
		assert!(yes);

		Ok(())
	}

	#[test]
	fn test_args_threads_del_max_len_not_defaulted() -> Result<()> {
		// -- Exec
		let cli = parse(&["-k", "sk-test", "threads", "del", "thread_a", "-D", "30"])?;

		// -- Check
		let Command::Threads(ThreadsCmd::Del { max_len, days, .. }) = cli.command else {
			return Err("should be threads del".into());
		};
		assert_eq!(max_len, None);
		assert_eq!(days.older_than, Some(30.));

		Ok(())
	}

	#[test]
	fn test_args_assts_get_all_with_filters() -> Result<()> {
		// -- Exec
		let cli = parse(&[
			"-k", "sk-test", "assts", "get", "-A", "-n", "test", "-n", "bot", "-N", "old", "-d",
			"7.5", "-o",
		])?;

		// -- Check
		let Command::Assts(AsstsCmd::Get {
			source,
			names,
			days,
			output,
		}) = cli.command
		else {
			return Err("should be assts get".into());
		};
		assert!(source.all);
		assert!(source.ids.is_empty());
		assert_eq!(names.contains, vec!["test", "bot"]);
		assert_eq!(names.not_contains, vec!["old"]);
		assert_eq!(days.within, Some(7.5));
		assert_eq!(output, Some(PathBuf::from("output.json")));

		Ok(())
	}

	#[test]
	fn test_args_files_del_negative_days_reaches_validation() -> Result<()> {
		// -- Exec
		let cli = parse(&["-k", "sk-test", "files", "del", "-f", "files.txt", "-D", "-2", "-y"])?;

		// -- Check
		let Command::Files(FilesCmd::Del {
			source, days, yes, ..
		}) = cli.command
		else {
			return Err("should be files del".into());
		};
		assert_eq!(source.file, Some(PathBuf::from("files.txt")));
		assert_eq!(days.older_than, Some(-2.));
		assert!(yes);

		Ok(())
	}

	#[test]
	fn test_args_log_levels_conflict() -> Result<()> {
		let res = parse(&["-k", "sk-test", "-v", "-d", "threads", "create"]);

		assert!(res.is_err());

		Ok(())
	}

	#[test]
	fn test_args_log_level_select() -> Result<()> {
		let cli = parse(&["-k", "sk-test", "-S", "-l", "threads", "create", "-m", "hi"])?;

		assert_eq!(cli.log.console_level(), LevelFilter::OFF);
		assert!(cli.log.log_file);

		Ok(())
	}

	#[test]
	fn test_args_images_ret_source_required_and_exclusive() -> Result<()> {
		assert!(parse(&["-k", "sk-test", "images", "ret"]).is_err());
		assert!(parse(&["-k", "sk-test", "images", "ret", "-f", "file-1", "-u", "http://x"]).is_err());

		let cli = parse(&["-k", "sk-test", "images", "ret", "-f", "file-1"])?;
		let Command::Images(ImagesCmd::Ret { src, output }) = cli.command else {
			return Err("should be images ret".into());
		};
		assert_eq!(src.file_id.as_deref(), Some("file-1"));
		assert_eq!(output, None);

		Ok(())
	}

	#[test]
	fn test_args_assts_modify_optional_fields() -> Result<()> {
		let cli = parse(&["-k", "sk-test", "assts", "modify", "asst_1", "-t", "code,retrieval"])?;

		let Command::Assts(AsstsCmd::Modify {
			asst_id,
			name,
			opts,
			..
		}) = cli.command
		else {
			return Err("should be assts modify".into());
		};
		assert_eq!(asst_id, "asst_1");
		assert_eq!(name, None);
		assert_eq!(opts.tools.as_deref(), Some("code,retrieval"));

		Ok(())
	}
}

// endregion: --- Tests
