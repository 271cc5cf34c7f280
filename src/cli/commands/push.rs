//! cli::commands::push
//!
//! Commit one file to a remote branch.
//!
//! # Design
//!
//! The handler resolves everything local first — configuration, repository
//! coordinate, branch, token, and file content — so that misconfiguration
//! fails before any network call. It then hands the request to
//! [`CommitBuilder::push_file`], which runs the six-step pipeline against
//! the forge.
//!
//! Content sources, in order of precedence: `--content`, `--from <file>`,
//! stdin.
//!
//! # Example
//!
//! ```bash
//! # Push inline content
//! ghp push notes/today.md -m "daily notes" --content "all quiet"
//!
//! # Push a local file
//! ghp push config/app.yaml -m "update config" --from ./app.yaml
//!
//! # Pipe from another tool
//! generate-report | ghp push reports/weekly.txt -m "weekly report"
//! ```

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::forge::create_forge;
use crate::push::{CommitBuilder, PushRequest};
use crate::ui::output::{self, Verbosity};

use super::{load_config, resolve_coordinate, resolve_token, working_dir};

/// Run the push command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn push(
    ctx: &Context,
    path: &str,
    message: &str,
    branch: Option<&str>,
    from: Option<&Path>,
    content: Option<&str>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(push_async(ctx, path, message, branch, from, content))
}

/// Async implementation of push.
async fn push_async(
    ctx: &Context,
    path: &str,
    message: &str,
    branch: Option<&str>,
    from: Option<&Path>,
    content: Option<&str>,
) -> Result<()> {
    let verbosity = ctx.verbosity();

    let config = load_config(ctx)?;
    let coordinate = resolve_coordinate(ctx, &config)?;
    let branch = match branch.or(config.branch()) {
        Some(b) => b.to_string(),
        None => anyhow::bail!(
            "no branch configured; pass --branch or set repository.branch in .ghpush.toml"
        ),
    };
    let token = resolve_token()?;
    let content = read_content(ctx, from, content)?;

    output::debug(
        format!(
            "pushing {} bytes to {} on {}",
            content.len(),
            path,
            coordinate
        ),
        verbosity,
    );

    let forge = create_forge(coordinate, &token, config.api_base());
    let builder = CommitBuilder::new(forge, branch);
    let request = PushRequest::new(path, content, message);

    let commit = builder
        .push_file(&request)
        .await
        .with_context(|| format!("failed to push '{}' to branch '{}'", path, builder.branch()))?;

    if verbosity == Verbosity::Quiet {
        // Machine-readable: just the new commit SHA
        println!("{}", commit);
    } else {
        output::success(
            format!(
                "pushed {} to {} as {}",
                request.path,
                builder.branch(),
                output::short_sha(commit.as_str())
            ),
            verbosity,
        );
        output::print(format!("commit {}", commit), verbosity);
    }

    Ok(())
}

/// Gather the file content from the chosen source.
fn read_content(ctx: &Context, from: Option<&Path>, content: Option<&str>) -> Result<Vec<u8>> {
    if let Some(text) = content {
        return Ok(text.as_bytes().to_vec());
    }

    if let Some(file) = from {
        let resolved = if file.is_absolute() {
            file.to_path_buf()
        } else {
            working_dir(ctx)?.join(file)
        };
        return fs::read(&resolved)
            .with_context(|| format!("failed to read content from '{}'", resolved.display()));
    }

    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read content from stdin")?;
    Ok(buf)
}
