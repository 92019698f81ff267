//! Conversion lifecycle.
//!
//! `Submitted -> Polling -> {Succeeded, Failed}`. The machine only decides
//! transitions; issuing requests and sleeping is left to the driver in
//! `client`, so the whole lifecycle can be stepped without a network or clock.

use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::api::{PollResult, SubmitReply, TaskHandle};
use crate::error::ConversionError;

/// Progress reported to the caller on every still-pending check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Converting,
    Queued { ahead: u64 },
}

impl ConversionStatus {
    /// `position` is 1-based; the caller's own job occupies one slot.
    pub fn from_position(position: u64) -> Self {
        if position <= 1 {
            ConversionStatus::Converting
        } else {
            ConversionStatus::Queued { ahead: position - 1 }
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStatus::Converting => f.write_str("Converting"),
            ConversionStatus::Queued { ahead } => write!(f, "{} Ahead", ahead),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionState {
    Submitted,
    Polling { task: TaskHandle, checks: u64 },
    Succeeded { file_id: String },
    Failed(ConversionError),
}

impl ConversionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionState::Succeeded { .. } | ConversionState::Failed(_))
    }
}

#[derive(Debug)]
pub struct PollMachine {
    state: ConversionState,
    interval: Duration,
}

impl PollMachine {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: ConversionState::Submitted,
            interval,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Delay the driver waits after a pending check before the next one.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Task being polled, if the machine is waiting on one.
    pub fn pending_task(&self) -> Option<&TaskHandle> {
        match &self.state {
            ConversionState::Polling { task, .. } => Some(task),
            _ => None,
        }
    }

    /// Applies the submission reply. Ignored unless the machine is `Submitted`.
    pub fn on_submit(&mut self, reply: Result<SubmitReply, ConversionError>) {
        if !matches!(self.state, ConversionState::Submitted) {
            return;
        }

        self.state = match reply {
            Ok(SubmitReply::Accepted(task)) => {
                debug!("conversion accepted as task {}", task);
                ConversionState::Polling { task, checks: 0 }
            }
            Ok(SubmitReply::Rejected(detail)) => {
                ConversionState::Failed(ConversionError::ServerError(detail))
            }
            Err(e) => ConversionState::Failed(e),
        };
    }

    /// Applies one check result. Returns the status to report when the job is
    /// still pending; terminal results and non-polling states return `None`.
    pub fn on_check(&mut self, result: Result<PollResult, ConversionError>) -> Option<ConversionStatus> {
        let checks = match &mut self.state {
            ConversionState::Polling { checks, .. } => {
                *checks += 1;
                *checks
            }
            _ => return None,
        };

        match result {
            Ok(PollResult::Pending { position }) => {
                let status = ConversionStatus::from_position(position);
                debug!("check #{}: position {} ({})", checks, position, status);
                Some(status)
            }
            Ok(PollResult::Complete { file_id }) => {
                debug!("check #{}: complete, file {}", checks, file_id);
                self.state = ConversionState::Succeeded { file_id };
                None
            }
            Ok(PollResult::Failed { detail }) => {
                self.state = ConversionState::Failed(ConversionError::ServerError(detail));
                None
            }
            Err(e) => {
                self.state = ConversionState::Failed(e);
                None
            }
        }
    }

    /// Final result, once the machine has reached a terminal state.
    pub fn outcome(&self) -> Option<Result<String, ConversionError>> {
        match &self.state {
            ConversionState::Succeeded { file_id } => Some(Ok(file_id.clone())),
            ConversionState::Failed(e) => Some(Err(e.clone())),
            _ => None,
        }
    }
}
