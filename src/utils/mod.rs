//! Utility modules: process execution, git access and path handling.

pub mod exec;
pub mod git;
pub mod path;
