//! forge
//!
//! Abstraction for remote forges (GitHub v1).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for the git-data operations this
//! tool consumes: resolve a branch ref, read a commit, write blobs, trees,
//! and commits, and move a ref. Commands use the [`create_forge`] factory
//! function rather than importing specific forge implementations directly.
//!
//! Forge failures never leave local state to clean up; objects already
//! written on the remote are content-addressed and inert until a ref
//! points at them.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait, SHA newtypes, and value types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge creation
//!
//! # Example
//!
//! ```ignore
//! use ghpush::forge::{create_forge, RepoCoordinate};
//!
//! let forge = create_forge(
//!     RepoCoordinate::parse("octocat/hello-world").unwrap(),
//!     token,
//!     None,
//! );
//!
//! let tip = forge.get_branch_ref("main").await?;
//! println!("main is at {}", tip);
//! ```

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::create_forge;
pub use traits::*;
