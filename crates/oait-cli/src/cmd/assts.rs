use crate::args::{AsstOptArgs, AsstsCmd};
use crate::cmd::{item_filter, items};
use crate::printer::Printer;
use crate::utils::cli::{ico_res, txt_res};
use crate::{Error, Result};
use oait::ais::asst::{self, parse_tools, AsstConfig, AsstObj};
use oait::ais::{run, AisClient, AsstId, RunId, ThreadId};
use oait::config::Config;
use oait::poller::{self, RunOutcome};
use textwrap::wrap;

const WRAP_WIDTH: usize = 80;

pub(super) async fn exec(
	cmd: AsstsCmd,
	ais: &AisClient,
	config: &Config,
	printer: &Printer,
) -> Result<()> {
	match cmd {
		AsstsCmd::Create {
			name,
			instructions,
			opts,
		} => {
			let asst_config = asst_config(Some(name), Some(instructions), opts)?;
			let asst_id = asst::create(ais, &asst_config, &config.assistant_model).await?;
			println!("{asst_id}");
			Ok(())
		}
		AsstsCmd::Modify {
			asst_id,
			name,
			instructions,
			opts,
		} => {
			let asst_config = asst_config(name, instructions, opts)?;
			let asst_id = asst::modify(ais, &AsstId::from(asst_id), &asst_config).await?;
			println!("{asst_id}");
			Ok(())
		}
		AsstsCmd::Run {
			asst_id,
			thread_id,
			run_id,
		} => exec_run(ais, config, asst_id.into(), thread_id.into(), run_id).await,
		AsstsCmd::Get {
			source,
			names,
			days,
			output,
		} => items::get::<AsstObj>(ais, source, item_filter(names, &days)?, output).await,
		AsstsCmd::Del {
			source,
			names,
			days,
			yes,
		} => items::del::<AsstObj>(ais, printer, source, item_filter(names, &days)?, yes).await,
	}
}

fn asst_config(
	name: Option<String>,
	instructions: Option<String>,
	opts: AsstOptArgs,
) -> Result<AsstConfig> {
	let tools = opts.tools.as_deref().map(parse_tools).transpose()?;

	Ok(AsstConfig {
		name,
		instructions,
		description: opts.description,
		model: opts.model,
		tools,
	})
}

async fn exec_run(
	ais: &AisClient,
	config: &Config,
	asst_id: AsstId,
	thread_id: ThreadId,
	run_id: Option<String>,
) -> Result<()> {
	let run_id = match run_id {
		Some(run_id) => RunId::from(run_id),
		None => run::start_run(ais, &asst_id, &thread_id).await?,
	};

	let outcome = poller::wait_for_run(
		ais,
		&thread_id,
		&run_id,
		&config.poll_config(),
		ais.event_bus(),
	)
	.await?;

	match outcome {
		RunOutcome::Completed { .. } => {
			let reply = run::get_latest_msg_text(ais, &thread_id).await?;
			let reply = wrap(&reply, WRAP_WIDTH).join("\n");
			println!("{} {}", ico_res(), txt_res(reply));
			Ok(())
		}
		outcome => Err(Error::RunNotCompleted {
			run_id: run_id.to_string(),
			outcome,
		}),
	}
}
