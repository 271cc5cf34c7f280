//! ghpush - Commit single files to GitHub branches over the REST API
//!
//! ghpush is a single-binary tool that appends one commit to a remote branch
//! without a local clone. It drives GitHub's git-data API directly: read the
//! branch tip, read the tip commit's tree, write a blob, write a tree, write
//! a commit, and move the branch ref.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to push)
//! - [`push`] - Orchestrates the six-step commit pipeline
//! - [`forge`] - Abstraction for remote forges (GitHub v1)
//! - [`config`] - Configuration schema and loading
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! ghpush maintains the following invariants:
//!
//! 1. Every commit it creates has exactly one parent: the branch tip observed
//!    at the start of the operation
//! 2. The six pipeline steps run strictly in order; a failure aborts all
//!    remaining steps
//! 3. No compensating rollback is attempted; orphaned objects are left to the
//!    forge's garbage collection
//! 4. SHA values are opaque handles threaded between calls, never synthesized
//!    locally

pub mod cli;
pub mod config;
pub mod forge;
pub mod push;
pub mod ui;
