//! cli::commands::whoami
//!
//! Show the authenticated user.

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::forge::create_forge;
use crate::ui::output;

use super::{load_config, resolve_coordinate, resolve_token};

/// Run the whoami command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn whoami(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(whoami_async(ctx))
}

/// Async implementation of whoami.
async fn whoami_async(ctx: &Context) -> Result<()> {
    let verbosity = ctx.verbosity();

    let config = load_config(ctx)?;
    let coordinate = resolve_coordinate(ctx, &config)?;
    let token = resolve_token()?;

    let forge = create_forge(coordinate, &token, config.api_base());
    let user = forge
        .authenticated_user()
        .await
        .context("failed to fetch the authenticated user")?;

    match user.name {
        Some(name) if !name.is_empty() => {
            output::print(format!("{} ({})", user.login, name), verbosity)
        }
        _ => output::print(user.login, verbosity),
    }

    Ok(())
}
