//! Jobs: opaque shell command lines and their lifecycle.

use serde::Serialize;

/// Position of a job in the queue it was created from, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(pub usize);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle: `Pending -> Running -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A fully interpolated shell command line. The scheduler never parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub command: String,
    pub state: JobState,
}

impl Job {
    pub fn new(id: JobId, command: impl Into<String>) -> Self {
        Self {
            id,
            command: command.into(),
            state: JobState::Pending,
        }
    }

    /// Classifies a finished job by its exit code.
    ///
    /// `None` means the process was terminated by a signal and counts as a
    /// failure.
    pub(crate) fn finish(mut self, exit_code: Option<i32>) -> JobOutcome {
        self.state = if exit_code == Some(0) {
            JobState::Succeeded
        } else {
            JobState::Failed
        };
        JobOutcome {
            id: self.id,
            command: self.command,
            state: self.state,
            exit_code,
        }
    }
}

/// Terminal record of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub id: JobId,
    pub command: String,
    pub state: JobState,
    pub exit_code: Option<i32>,
}

impl JobOutcome {
    pub const fn succeeded(&self) -> bool {
        matches!(self.state, JobState::Succeeded)
    }
}
