//! Event printer: renders the library events on stderr in a spawned task.

use crate::utils::cli::{
	ico_check, ico_err, ico_res, ico_run, txt_progress, txt_waiting,
};
use crate::Result;
use console::Term;
use oait::ais::AisEvent;
use oait::batch::BatchEvent;
use oait::event::{Event, EventBus};
use oait::poller::RunEvent;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::debug;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);
const DRAIN_POLL: Duration = Duration::from_millis(5);

pub struct Printer {
	handle: JoinHandle<()>,
	/// Events rendered (or skipped on lag) by the printer task.
	printed: Arc<AtomicUsize>,
	/// Subscribed with the printer, counts the events sent so far.
	tally: Mutex<Tally>,
}

struct Tally {
	rx: Receiver<Event>,
	sent: usize,
}

impl Printer {
	pub fn start(event_bus: &EventBus) -> Result<Printer> {
		let rx = event_bus.subscribe()?;
		let tally = Tally {
			rx: event_bus.subscribe()?,
			sent: 0,
		};
		let printed = Arc::new(AtomicUsize::new(0));

		let handle = tokio::spawn(print_events(rx, printed.clone()));

		Ok(Printer {
			handle,
			printed,
			tally: Mutex::new(tally),
		})
	}

	/// Blocks until the events sent so far are printed (at most `DRAIN_TIMEOUT`),
	/// then flushes stderr. Called before an interactive prompt.
	pub fn drain(&self) {
		let sent = match self.tally.lock() {
			Ok(mut tally) => tally.count_sent(),
			Err(_) => return,
		};

		let deadline = Instant::now() + DRAIN_TIMEOUT;
		tokio::task::block_in_place(|| {
			while self.printed.load(Ordering::Acquire) < sent && Instant::now() < deadline {
				std::thread::sleep(DRAIN_POLL);
			}
		});

		let _ = Term::stderr().flush();
	}

	/// Waits for the printer task, which ends once every bus handle is dropped.
	pub async fn join(self) {
		if let Err(err) = self.handle.await {
			debug!(%err, "event printer ended abnormally");
		}
	}
}

impl Tally {
	fn count_sent(&mut self) -> usize {
		loop {
			match self.rx.try_recv() {
				Ok(_) => self.sent += 1,
				Err(TryRecvError::Lagged(skipped)) => self.sent += skipped as usize,
				Err(TryRecvError::Empty | TryRecvError::Closed) => break,
			}
		}
		self.sent
	}
}

async fn print_events(mut rx: Receiver<Event>, printed: Arc<AtomicUsize>) {
	let term = Term::stderr();
	let is_term = term.is_term();

	loop {
		let evt = match rx.recv().await {
			Ok(evt) => evt,
			Err(RecvError::Lagged(skipped)) => {
				debug!(skipped, "event printer lagged");
				printed.fetch_add(skipped as usize, Ordering::Release);
				continue;
			}
			// if here, all the bus handles are dropped, nothing more to print.
			Err(RecvError::Closed) => break,
		};

		match evt {
			Event::Ais(ais_evt) => {
				let line = match ais_evt {
					AisEvent::AsstCreated(asst_ref) => format!(
						"{} Assistant {} created ({})",
						ico_check(),
						asst_ref.name,
						asst_ref.id
					),
					AisEvent::AsstModified(asst_ref) => format!(
						"{} Assistant {} modified ({})",
						ico_check(),
						asst_ref.name,
						asst_ref.id
					),
					AisEvent::ThreadCreated(thread_id) => {
						format!("{} Thread {thread_id} created", ico_check())
					}
					AisEvent::MsgAdded { thread_id, msg_id } => {
						format!("{} Message {msg_id} added to thread {thread_id}", ico_check())
					}
					AisEvent::RunStarted { thread_id, run_id } => {
						format!("{} Run {run_id} started on thread {thread_id}", ico_res())
					}
				};
				let _ = term.write_line(&line);
			}

			Event::Batch(batch_evt) => match batch_evt {
				BatchEvent::Started { .. } => (),
				BatchEvent::Progress {
					stage,
					kind,
					done,
					total,
				} => {
					let line = txt_progress(stage, kind, done, total);
					if is_term {
						let _ = term.clear_line();
						let _ = term.write_str(&line);
						if done == total {
							let _ = term.write_line("");
						}
					} else if done == total {
						let _ = term.write_line(&line);
					}
				}
				BatchEvent::ItemFailed {
					kind, id, cause, ..
				} => {
					if is_term {
						let _ = term.clear_line();
					}
					let _ = term.write_line(&format!(
						"{} {} {id} skipped\n   cause: {cause}",
						ico_err(),
						kind.label()
					));
				}
				BatchEvent::Finished { .. } => (),
			},

			Event::Run(run_evt) => match run_evt {
				RunEvent::Waiting { dots, .. } => {
					if is_term {
						let _ = term.clear_line();
						let _ = term.write_str(&format!("{} {}", ico_run(), txt_waiting(dots)));
					}
				}
				RunEvent::StatusChecked { run_id, status } => {
					if is_term {
						let _ = term.clear_line();
					}
					debug!(run_id = %run_id, ?status, "run status checked");
				}
			},
		}

		let _ = term.flush();
		printed.fetch_add(1, Ordering::Release);
	}
}

// region:    --- Tests


// endregion: --- Tests
