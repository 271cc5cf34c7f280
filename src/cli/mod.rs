//! cli
//!
//! Command-line interface layer for ghpush.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT talk to the forge directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! command handlers, which resolve configuration and drive the
//! [`crate::push`] pipeline over a forge created through
//! [`crate::forge::create_forge`].

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::ui::output::Verbosity;
use anyhow::Result;
use std::path::PathBuf;

/// Shared command context derived from global CLI flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override (`--cwd`)
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Target repository override (`--repo`)
    pub repo: Option<String>,
}

impl Context {
    /// Output verbosity derived from the quiet/debug flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        repo: cli.repo.clone(),
    };

    commands::dispatch(cli.command, &ctx)
}
