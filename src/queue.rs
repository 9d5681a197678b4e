//! The ordered queue of jobs waiting to be launched.
//!
//! # Example
//!
//! ```rust
//! use cookiecutter::queue::{JobQueue, QueueOrder};
//!
//! let mut queue = JobQueue::from_commands(["first", "second"], QueueOrder::Fifo);
//! assert_eq!(queue.pop().map(|job| job.command), Some("first".to_string()));
//!
//! let mut queue = JobQueue::from_commands(["first", "second"], QueueOrder::Lifo);
//! assert_eq!(queue.pop().map(|job| job.command), Some("second".to_string()));
//! ```

use std::collections::VecDeque;

use clap::ValueEnum;
use serde::Serialize;

use crate::job::{Job, JobId};

/// The end of the queue that jobs are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueOrder {
    /// First in, first out: jobs launch in the order they were added.
    #[default]
    Fifo,
    /// Last in, first out: the most recently added job launches first.
    Lifo,
}

impl std::fmt::Display for QueueOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fifo => write!(f, "fifo"),
            Self::Lifo => write!(f, "lifo"),
        }
    }
}

/// Jobs waiting to be launched.
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
    order: QueueOrder,
    next_id: usize,
}

impl JobQueue {
    pub fn new(order: QueueOrder) -> Self {
        Self {
            jobs: VecDeque::new(),
            order,
            next_id: 0,
        }
    }

    pub fn from_commands<I, S>(commands: I, order: QueueOrder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue = Self::new(order);
        queue.extend(commands);
        queue
    }

    /// Appends a command and returns the id of its job.
    pub fn push(&mut self, command: impl Into<String>) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        self.jobs.push_back(Job::new(id, command));
        id
    }

    /// Removes the next job according to the queue order.
    pub fn pop(&mut self) -> Option<Job> {
        match self.order {
            QueueOrder::Fifo => self.jobs.pop_front(),
            QueueOrder::Lifo => self.jobs.pop_back(),
        }
    }

    pub const fn order(&self) -> QueueOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Pending jobs in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }
}

impl<S: Into<String>> Extend<S> for JobQueue {
    fn extend<I: IntoIterator<Item = S>>(&mut self, commands: I) {
        for command in commands {
            self.push(command);
        }
    }
}
