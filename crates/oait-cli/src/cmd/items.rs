//! `get` / `del` shared by the assistants and the files.

use crate::args::ItemSourceArgs;
use crate::printer::Printer;
use crate::utils::cli::{confirm, ico_check, ico_deleted_ok, kind_plural};
use crate::Result;
use oait::ais::AisClient;
use oait::batch::{self, ItemFilter, ItemOps, ItemSource, Listed};
use oait::output::{render_records, save_records};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

pub(super) async fn get<T>(
	ais: &AisClient,
	source: ItemSourceArgs,
	filter: ItemFilter,
	output: Option<PathBuf>,
) -> Result<()>
where
	T: Listed + Serialize,
	AisClient: ItemOps<T>,
{
	let source = ItemSource::from_inputs(source.ids, source.file, source.all)?;
	let items: Vec<T> = batch::fetch_items(ais, source, &filter, ais.event_bus()).await?;

	match output {
		Some(dest) => {
			save_records(&dest, &items)?;
			eprintln!(
				"{} {} {} saved to {}",
				ico_check(),
				items.len(),
				kind_plural(T::KIND),
				dest.display()
			);
		}
		None => println!("{}", render_records(&items)?),
	}

	Ok(())
}

pub(super) async fn del<T>(
	ais: &AisClient,
	printer: &Printer,
	source: ItemSourceArgs,
	filter: ItemFilter,
	yes: bool,
) -> Result<()>
where
	T: Listed,
	AisClient: ItemOps<T>,
{
	let plural = kind_plural(T::KIND);
	let source = ItemSource::from_inputs(source.ids, source.file, source.all)?;

	let mut prompt_err = None;
	let report = batch::delete_items::<T, _>(
		ais,
		source,
		&filter,
		|count| {
			yes || {
				printer.drain();
				match confirm(&format!("Delete {count} {plural}?")) {
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
		eprintln!("No {plural} to delete");
	} else if report.aborted {
		eprintln!("Deletion cancelled");
	} else {
		eprintln!(
			"{} {} {plural} deleted, {} failed",
			ico_deleted_ok(),
			report.deleted,
			report.failed
		);
	}
	info!(kind = T::KIND.label(), ?report, "del done");

	Ok(())
}
