//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--repo <owner/repo>`: Target repository override

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ghpush - Commit single files to GitHub branches over the REST API
#[derive(Parser, Debug)]
#[command(name = "ghp")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Run as if ghp was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Target repository (owner/repo shorthand or a remote URL)
    #[arg(long, global = true, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commit one file to a remote branch
    #[command(
        name = "push",
        long_about = "Commit one file to a remote branch.\n\n\
            Appends exactly one commit to the target branch, containing the file \
            at the given path with the given content. All other paths on the \
            branch are left unchanged. No local clone is needed; the commit is \
            assembled remotely via the forge's git-data API.\n\n\
            Content is taken from --content, from the file named by --from, or \
            from stdin, in that order of precedence. The new commit's SHA is \
            printed on success.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Push inline content
    ghp push notes/today.md -m \"daily notes\" --content \"all quiet\"

    # Push a local file to a configured repository
    ghp push config/app.yaml -m \"update config\" --from ./app.yaml

    # Pipe content from another tool
    generate-report | ghp push reports/weekly.txt -m \"weekly report\"

    # Override the configured repository and branch
    ghp push VERSION -m \"bump\" --repo octocat/hello-world --branch release

CONCURRENT WRITERS:
    If another writer moves the branch tip while the push is in flight,
    the final ref update is rejected and the push fails. Objects already
    written are harmless; re-run the push to retry against the new tip."
    )]
    Push {
        /// Path of the file within the repository tree
        path: String,

        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Target branch (overrides configuration)
        #[arg(long)]
        branch: Option<String>,

        /// Read content from this local file
        #[arg(long, value_name = "FILE", conflicts_with = "content")]
        from: Option<PathBuf>,

        /// Use this string as the file content
        #[arg(long)]
        content: Option<String>,
    },

    /// Show the authenticated user
    #[command(
        name = "whoami",
        long_about = "Show the authenticated user.\n\n\
            Resolves the token from the environment and asks the forge which \
            account it belongs to. Useful for verifying credentials before \
            pushing."
    )]
    Whoami,

    /// List repositories of the authenticated user
    #[command(
        name = "repos",
        long_about = "List repositories of the authenticated user.\n\n\
            Fetches a single page of repositories visible to the token. \
            Private repositories are marked in the output.",
        after_help = "\
WORKFLOW EXAMPLES:
    # List the first 30 repositories
    ghp repos

    # Fetch a longer page
    ghp repos --per-page 100"
    )]
    Repos {
        /// Number of repositories to fetch (single page)
        #[arg(long, default_value_t = 30)]
        per_page: u32,
    },
}
