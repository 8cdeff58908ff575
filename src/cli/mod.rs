//! Command-line interface and the three phases of a run.
//!
//! Update → Serve → Publish, strictly in that order, each exactly once.

mod args;
pub mod publish;
pub mod serve;
pub mod update;

pub use args::Cli;
