//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves configuration (flags over project config over global config)
//! 2. Creates a forge and drives it
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! All commands are async because they involve network I/O. Each handler
//! is a synchronous wrapper that spins up a tokio runtime around its async
//! body.

mod push;
mod repos;
mod whoami;

// Re-export command functions for testing and direct invocation
pub use push::push;
pub use repos::repos;
pub use whoami::whoami;

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::cli::args::Command;
use crate::cli::Context;
use crate::config::Config;
use crate::forge::RepoCoordinate;

/// Environment variables consulted for the API token, in order.
const TOKEN_ENV_VARS: &[&str] = &["GHPUSH_TOKEN", "GITHUB_TOKEN"];

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Push {
            path,
            message,
            branch,
            from,
            content,
        } => push::push(
            ctx,
            &path,
            &message,
            branch.as_deref(),
            from.as_deref(),
            content.as_deref(),
        ),
        Command::Whoami => whoami::whoami(ctx),
        Command::Repos { per_page } => repos::repos(ctx, per_page),
    }
}

/// Resolve the effective working directory (`--cwd` or the process cwd).
pub(crate) fn working_dir(ctx: &Context) -> Result<PathBuf> {
    match &ctx.cwd {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("failed to determine the working directory"),
    }
}

/// Load configuration for the working directory.
pub(crate) fn load_config(ctx: &Context) -> Result<Config> {
    let cwd = working_dir(ctx)?;
    Config::load(Some(&cwd)).context("failed to load configuration")
}

/// Resolve the target repository: `--repo` flag over configuration.
pub(crate) fn resolve_coordinate(ctx: &Context, config: &Config) -> Result<RepoCoordinate> {
    if let Some(spec) = &ctx.repo {
        return RepoCoordinate::parse(spec).ok_or_else(|| {
            anyhow::anyhow!(
                "invalid repository '{}'; expected owner/repo or a GitHub remote URL",
                spec
            )
        });
    }

    match config.coordinate() {
        Some(coordinate) => Ok(coordinate),
        None => bail!(
            "no repository configured; pass --repo or set [repository] owner \
             and name in .ghpush.toml"
        ),
    }
}

/// Resolve the API token from the environment.
///
/// Token acquisition is deliberately simple: `GHPUSH_TOKEN` wins over
/// `GITHUB_TOKEN`, and a missing token is a local error raised before any
/// network call.
pub(crate) fn resolve_token() -> Result<String> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }
    }
    bail!("no API token found; set GHPUSH_TOKEN or GITHUB_TOKEN")
}
