//! The single-active-issue session state machine.
//!
//! A session is either idle or tracking exactly one issue, recorded by the
//! marker store. Starting runs the `pre_start`/`post_start` hooks around
//! marker creation; stopping runs `pre_stop`, computes the elapsed time,
//! asks the user whether to log it, submits a worklog, clears the marker,
//! and runs `post_stop`.

pub mod clock;
pub mod hooks;
pub mod marker;

pub use hooks::{HookRunner, HookStage};
pub use marker::{ActiveSession, MarkerStore};

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// A worklog to submit to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogEntry {
    /// Duration in the tracker's format, e.g. "2h 5m".
    pub duration: String,
    /// Free-text comment; empty when the user declined to describe the work.
    pub comment: String,
}

/// How a stop request concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Worklog submitted with a user-supplied comment.
    Logged { key: String, duration: String },
    /// Worklog submitted with an empty comment.
    Skipped { key: String, duration: String },
    /// The user aborted: marker untouched, no worklog, post_stop skipped.
    Aborted,
}

enum StopChoice {
    Log,
    Skip,
    Abort,
}

pub struct SessionTracker {
    marker: MarkerStore,
    hooks: HookRunner,
}

impl SessionTracker {
    pub fn new(marker: MarkerStore, hooks: HookRunner) -> SessionTracker {
        SessionTracker { marker, hooks }
    }

    /// The session currently being tracked, if any.
    pub fn active(&self) -> Result<Option<ActiveSession>> {
        self.marker.active()
    }

    /// Begin tracking `key`. Rejected while any issue is active, before any
    /// hook runs or remote state changes.
    ///
    /// Hooks that already ran are not rolled back if a later step fails;
    /// they are fire-and-forget side effects, not a transaction.
    pub fn start(&self, key: &str) -> Result<()> {
        if let Some(session) = self.marker.active()? {
            return Err(Error::AlreadyActive { key: session.key });
        }

        self.hooks.run(HookStage::PreStart, key)?;
        self.marker.set_active(key)?;
        self.hooks.run(HookStage::PostStart, key)?;

        Ok(())
    }

    /// Stop the active session.
    ///
    /// `describe` produces the worklog comment when the user answers Yes;
    /// `submit` delivers the worklog to the tracker. Both are injected so
    /// the machine can be exercised without an editor or network.
    ///
    /// An Abort answer returns immediately: the marker keeps its original
    /// activation instant and the `post_stop` hooks are skipped.
    pub fn stop<R, W, D, S>(
        &self,
        input: R,
        mut output: W,
        describe: D,
        submit: S,
    ) -> Result<StopOutcome>
    where
        R: BufRead,
        W: Write,
        D: FnOnce(&str) -> Result<String>,
        S: FnOnce(&str, &WorklogEntry) -> Result<()>,
    {
        let session = self.marker.active()?.ok_or(Error::NotActive)?;

        self.hooks.run(HookStage::PreStop, &session.key)?;

        let now = chrono::Utc::now().timestamp();
        let (hours, minutes) = clock::elapsed(session.started_ts, now);
        let duration = clock::format_duration(hours, minutes);

        writeln!(output, "You have worked {}", duration)
            .map_err(|e| Error::Input(format!("unable to write prompt: {}", e)))?;

        let comment = match read_stop_choice(input, &mut output)? {
            StopChoice::Abort => return Ok(StopOutcome::Aborted),
            StopChoice::Log => Some(describe(&session.key)?),
            StopChoice::Skip => None,
        };

        let logged = comment.is_some();
        let entry = WorklogEntry {
            duration: duration.clone(),
            comment: comment.unwrap_or_default(),
        };
        submit(&session.key, &entry)?;

        self.marker.clear_active()?;
        self.hooks.run(HookStage::PostStop, &session.key)?;

        Ok(if logged {
            StopOutcome::Logged {
                key: session.key,
                duration,
            }
        } else {
            StopOutcome::Skipped {
                key: session.key,
                duration,
            }
        })
    }
}

/// Prompt until one of the three single-character answers arrives,
/// case-insensitively. Anything else re-prompts; there is no retry limit.
/// End of input is an error, so a closed stdin cannot spin forever.
fn read_stop_choice<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<StopChoice> {
    loop {
        writeln!(output, "Do you want to log this time? (Y)es/(N)o/(A)bort")
            .map_err(|e| Error::Input(format!("unable to write prompt: {}", e)))?;

        let mut answer = String::new();
        let read = input
            .read_line(&mut answer)
            .map_err(|e| Error::Input(format!("unable to read answer: {}", e)))?;
        if read == 0 {
            return Err(Error::Input(
                "input ended before the stop prompt was answered".to_string(),
            ));
        }

        match answer.trim().to_ascii_uppercase().as_str() {
            "Y" => return Ok(StopChoice::Log),
            "N" => return Ok(StopChoice::Skip),
            "A" => return Ok(StopChoice::Abort),
            _ => continue,
        }
    }
}
