//! Domain failures and their process exit codes.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

// ============================================================================
// FlowError
// ============================================================================

/// Failures that end a run with a specific exit status.
///
/// Anything else (spawn errors, terminal I/O) travels as `anyhow::Error`
/// and exits with status 1.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Commit message cannot be empty")]
    EmptyCommitMessage,

    #[error("update step `{command}` failed with {status}")]
    UpdateFailed { command: String, status: ExitStatus },

    #[error("`{step}` failed with {status}")]
    StepFailed { step: &'static str, status: ExitStatus },

    #[error("`{0}` not found")]
    MissingProgram(String),

    #[error("`{}` is not inside a git repository", .0.display())]
    NotARepository(PathBuf),
}

impl FlowError {
    /// Process exit status for this failure.
    ///
    /// Failed children hand their own code through; a child killed by a
    /// signal has no code and maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpdateFailed { status, .. } | Self::StepFailed { status, .. } => {
                status.code().filter(|code| *code != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

/// Exit status for a top-level error.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FlowError>().map_or(1, FlowError::exit_code)
}

// ============================================================================
// Tests
// ============================================================================
