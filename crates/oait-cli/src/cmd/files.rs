use crate::args::FilesCmd;
use crate::cmd::{item_filter, items};
use crate::printer::Printer;
use crate::Result;
use oait::ais::file::FileObj;
use oait::ais::AisClient;

pub(super) async fn exec(cmd: FilesCmd, ais: &AisClient, printer: &Printer) -> Result<()> {
	match cmd {
		FilesCmd::Get {
			source,
			names,
			days,
			output,
		} => items::get::<FileObj>(ais, source, item_filter(names, &days)?, output).await,
		FilesCmd::Del {
			source,
			names,
			days,
			yes,
		} => items::del::<FileObj>(ais, printer, source, item_filter(names, &days)?, yes).await,
	}
}
