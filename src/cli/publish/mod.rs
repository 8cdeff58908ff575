//! Phase C: review, commit and push, after interactive confirmation.
//!
//! ```text
//! AwaitingMessage ──empty──▶ fail (exit 1)
//!        │
//!        ▼
//! AwaitingConfirmation ──no──▶ Aborted (exit 0)
//!        │ yes
//!        ▼
//! Publishing: add → commit → push ──▶ Done
//! ```
//!
//! Nothing loops back; the first failing git step ends the run with that
//! step's exit status and the remaining steps are not run.

mod prompt;

use crate::{
    config::Settings,
    core::FlowError,
    debug, log,
    utils::git::{GitCli, Vcs, discover_repo},
};
use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use std::io::{self, BufRead, Write};
use std::process::ExitStatus;

/// How the publish phase ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    /// Changes were staged, committed and pushed
    Pushed,
    /// The operator declined; nothing was changed
    Aborted,
}

/// Run the publish phase against the real terminal and `git`.
pub fn run_publish(settings: &Settings) -> Result<Published> {
    let root = &settings.paths.root;
    let repo = discover_repo(root)?;
    debug!("publish"; "repository found for {}", repo.root.display());

    let mut git = GitCli::new(root);
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    publish(&mut git, repo.branch.as_deref(), &mut input, &mut output)
}

/// Drive the publish state machine.
pub fn publish<V, R, W>(
    vcs: &mut V,
    branch: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<Published>
where
    V: Vcs,
    R: BufRead,
    W: Write,
{
    writeln!(output)?;
    writeln!(
        output,
        "{}",
        "=== Changes to publish ===".if_supports_color(Stream::Stdout, |t| t.bold())
    )?;
    if let Some(branch) = branch {
        writeln!(output, "branch: {branch}")?;
    }
    output.flush()?;

    // Informational only
    let diff = vcs.diff_stat()?;
    if !diff.success() {
        debug!("publish"; "`git diff --stat` exited with {}", diff);
    }
    writeln!(output)?;

    let message = prompt::ask(&mut *input, &mut *output, "Commit message: ")?;
    if message.is_empty() {
        return Err(FlowError::EmptyCommitMessage.into());
    }

    writeln!(output, "Commit message: \"{message}\"")?;
    let answer = prompt::ask(&mut *input, &mut *output, "Commit and push these changes? [y/N] ")?;
    if !prompt::is_affirmative(&answer) {
        writeln!(output, "Aborted.")?;
        return Ok(Published::Aborted);
    }

    check("git add", vcs.add_all()?)?;
    check("git commit", vcs.commit(&message)?)?;
    check("git push", vcs.push()?)?;

    log!("publish"; "pushed \"{}\"", message);
    writeln!(output, "Changes committed and pushed.")?;
    Ok(Published::Pushed)
}

fn check(step: &'static str, status: ExitStatus) -> Result<(), FlowError> {
    if status.success() {
        Ok(())
    } else {
        Err(FlowError::StepFailed { step, status })
    }
}
