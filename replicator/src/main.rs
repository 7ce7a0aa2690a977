//! Entity sync replicator binary.
//!
//! Loads the configuration, builds the entity catalog and replays JSON-lines events through the
//! sync pipeline. Stops at the end of the input or on Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use ::config::Environment;
use telemetry::tracing::{LogFormat, init_tracing};

use crate::config::load_replicator_config;
use crate::core::start_replicator;

mod config;
mod core;

#[derive(Debug, Parser)]
#[command(name = "replicator", about = "Synchronizes entity events into sink tables")]
struct Args {
    /// File of JSON-lines events, one `{"topic": ..., "payload": ...}` object per line. Standard
    /// input is read when omitted.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Directory of the daily rolling log files. Logs go to standard output when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration errors abort before any event is read.
    let replicator_config = load_replicator_config()?;

    let format = if Environment::load()?.is_deployed() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"), format, args.log_dir.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(start_replicator(replicator_config, args.events))
}
