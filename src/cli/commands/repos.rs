//! cli::commands::repos
//!
//! List repositories of the authenticated user.
//!
//! Fetches a single page; there is no pagination loop. The `--per-page`
//! flag caps how many entries that page carries.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::forge::create_forge;
use crate::ui::output;

use super::{load_config, resolve_coordinate, resolve_token};

/// Run the repos command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn repos(ctx: &Context, per_page: u32) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(repos_async(ctx, per_page))
}

/// Async implementation of repos.
async fn repos_async(ctx: &Context, per_page: u32) -> Result<()> {
    let verbosity = ctx.verbosity();

    let config = load_config(ctx)?;
    let coordinate = resolve_coordinate(ctx, &config)?;
    let token = resolve_token()?;

    let forge = create_forge(coordinate, &token, config.api_base());
    let repos = forge
        .list_repositories(per_page)
        .await
        .context("failed to list repositories")?;

    if repos.is_empty() {
        output::print("no repositories found", verbosity);
        return Ok(());
    }

    for repo in repos {
        if repo.private {
            output::print(format!("{} (private)", repo.full_name), verbosity);
        } else {
            output::print(repo.full_name, verbosity);
        }
    }

    Ok(())
}
