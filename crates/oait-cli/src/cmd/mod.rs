//! Command handlers. Each one resolves its inputs, calls the library and
//! writes the result to stdout or to the output file.

// region:    --- Modules

mod assts;
mod files;
mod images;
mod items;
mod threads;

use crate::args::{Command, DaysArgs, NameArgs};
use crate::printer::Printer;
use crate::Result;
use chrono::Utc;
use oait::ais::AisClient;
use oait::batch::{CreatedFilter, ItemFilter, NameFilter};
use oait::config::Config;

// endregion: --- Modules

pub async fn exec(
	command: Command,
	ais: &AisClient,
	config: &Config,
	printer: &Printer,
) -> Result<()> {
	match command {
		Command::Threads(cmd) => threads::exec(cmd, ais, printer).await,
		Command::Images(cmd) => images::exec(cmd, ais, config).await,
		Command::Assts(cmd) => assts::exec(cmd, ais, config, printer).await,
		Command::Files(cmd) => files::exec(cmd, ais, printer).await,
	}
}

// region:    --- Filters

/// Day counts relative to now.
fn created_filters(days: &DaysArgs) -> Result<Vec<CreatedFilter>> {
	let now = Utc::now().timestamp();
	Ok(CreatedFilter::from_days(days.within, days.older_than, now)?)
}

fn item_filter(names: NameArgs, days: &DaysArgs) -> Result<ItemFilter> {
	Ok(ItemFilter {
		created: created_filters(days)?,
		name: NameFilter {
			contains: names.contains,
			not_contains: names.not_contains,
		},
	})
}

// endregion: --- Filters
