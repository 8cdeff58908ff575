//! Git access for the publish phase.
//!
//! Repository discovery goes through `gix`; the mutating operations shell
//! out to the `git` client so they honor the user's hooks, credentials and
//! remote configuration.

mod repo;
mod vcs;

pub use repo::discover_repo;
pub use vcs::{GitCli, Vcs};
