use crate::args::{DaysArgs, IdSourceArgs, ThreadsCmd};
use crate::cmd::created_filters;
use crate::printer::Printer;
use crate::utils::cli::{confirm, ico_check, ico_deleted_ok};
use crate::Result;
use oait::ais::{thread, AisClient, ThreadId};
use oait::batch::{self, delete_len_filter, IdSource, LenFilter, ThreadFilter};
use oait::output::{render_threads, save_threads, ThreadRecord};
use std::path::PathBuf;
use tracing::info;

const RET_SESSION_LIMIT: u32 = 10;
const DEL_SESSION_LIMIT: u32 = 1;

pub(super) async fn exec(cmd: ThreadsCmd, ais: &AisClient, printer: &Printer) -> Result<()> {
	match cmd {
		ThreadsCmd::Ret {
			source,
			output,
			min_len,
			days,
		} => ret(ais, source, output, min_len, days).await,
		ThreadsCmd::Del {
			source,
			max_len,
			days,
			yes,
		} => del(ais, printer, source, max_len, days, yes).await,
		ThreadsCmd::Create { messages } => {
			let thread_id = thread::create_thread(ais, &messages).await?;
			println!("{thread_id}");
			Ok(())
		}
		ThreadsCmd::Add { thread_id, message } => {
			let thread_id = ThreadId::from(thread_id);
			let msg_id = thread::add_message(ais, &thread_id, &message).await?;
			println!("{msg_id}");
			Ok(())
		}
	}
}

fn id_source(source: IdSourceArgs, default_limit: u32) -> Result<IdSource> {
	Ok(IdSource::from_inputs(
		source.ids,
		source.file,
		source.session,
		source.limit,
		default_limit,
	)?)
}

async fn ret(
	ais: &AisClient,
	source: IdSourceArgs,
	output: Option<PathBuf>,
	min_len: usize,
	days: DaysArgs,
) -> Result<()> {
	let filter = ThreadFilter {
		len: Some(LenFilter::Min(min_len)),
		created: created_filters(&days)?,
	};
	let thread_ids = id_source(source, RET_SESSION_LIMIT)?.resolve(ais).await?;

	let threads = batch::fetch_threads(ais, thread_ids, &filter, ais.event_bus()).await?;
	let records: Vec<ThreadRecord> = threads.into_iter().map(ThreadRecord::from).collect();

	match output {
		Some(dest) => {
			save_threads(&dest, &records)?;
			eprintln!(
				"{} {} thread(s) saved to {}",
				ico_check(),
				records.len(),
				dest.display()
			);
		}
		None => print!("{}", render_threads(&records)),
	}

	Ok(())
}

async fn del(
	ais: &AisClient,
	printer: &Printer,
	source: IdSourceArgs,
	max_len: Option<usize>,
	days: DaysArgs,
	yes: bool,
) -> Result<()> {
	let source = id_source(source, DEL_SESSION_LIMIT)?;
	let filter = ThreadFilter {
		len: delete_len_filter(&source, max_len),
		created: created_filters(&days)?,
	};
	let thread_ids = source.resolve(ais).await?;

	let mut prompt_err = None;
	let report = batch::delete_threads(
		ais,
		thread_ids,
		&filter,
		|count| {
			yes || {
				printer.drain();
				match confirm(&format!("Delete {count} thread(s)?")) {
					Ok(answer) => answer,
					Err(err) => {
						prompt_err = Some(err);
						false
					}
				}
			}
		},
		ais.event_bus(),
	)
	.await?;

	if let Some(err) = prompt_err {
		return Err(err);
	}

	if report.targeted == 0 {
		eprintln!("No threads to delete");
	} else if report.aborted {
		eprintln!("Deletion cancelled");
	} else {
		eprintln!(
			"{} {} thread(s) deleted, {} failed",
			ico_deleted_ok(),
			report.deleted,
			report.failed
		);
	}
	info!(?report, "threads del done");

	Ok(())
}
