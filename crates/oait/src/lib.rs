// region:    --- Modules

pub mod ais;
pub mod batch;
pub mod config;
mod error;
pub mod event;
pub mod output;
pub mod poller;
mod utils;

pub use self::error::{Error, Result};

// endregion: --- Modules
