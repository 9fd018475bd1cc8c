// src/outcome.rs

//! Result envelopes returned by the manager's operations.
//!
//! Operations never fail with an error for domain-level conditions; they
//! always return an envelope carrying an [`Outcome`] and a human-readable
//! message. Only supervisor shutdown breaks out of this scheme, via the
//! `try_*` flavors.

use std::fmt;

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation did what was asked.
    Success,
    /// The operation ran but could not do what was asked.
    Failure,
    /// The operation's time budget ran out before it could finish.
    Timeout,
    /// Supervisor shutdown fired while the operation was in flight.
    Interrupted,
    /// The given task id does not (or, for a submission clash, already does)
    /// identify a task.
    InvalidId,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Timeout => "timeout",
            Outcome::Interrupted => "interrupted",
            Outcome::InvalidId => "invalid-id",
        };
        f.write_str(label)
    }
}

/// Envelope for operations that carry no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub message: String,
}

impl Report {
    pub fn success() -> Self {
        Self {
            outcome: Outcome::Success,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Timeout,
            message: message.into(),
        }
    }

    pub fn interrupted(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Interrupted,
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::InvalidId,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Envelope for operations that produce a value on success.
///
/// `value` is `Some` exactly when `outcome` is [`Outcome::Success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueReport<T> {
    pub value: Option<T>,
    pub outcome: Outcome,
    pub message: String,
}

impl<T> ValueReport<T> {
    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            outcome: Outcome::Success,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            value: None,
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            value: None,
            outcome: Outcome::Timeout,
            message: message.into(),
        }
    }

    pub fn interrupted(message: impl Into<String>) -> Self {
        Self {
            value: None,
            outcome: Outcome::Interrupted,
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self {
            value: None,
            outcome: Outcome::InvalidId,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_report_has_empty_message() {
        let report = Report::success();
        assert!(report.is_success());
        assert!(report.message.is_empty());
    }

    #[test]
    fn value_is_present_only_on_success() {
        let ok = ValueReport::success("task-1".to_string());
        assert_eq!(ok.value.as_deref(), Some("task-1"));

        let bad: ValueReport<String> = ValueReport::invalid_id("no such task");
        assert!(bad.value.is_none());
        assert_eq!(bad.outcome, Outcome::InvalidId);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Success.to_string(), "success");
        assert_eq!(Outcome::InvalidId.to_string(), "invalid-id");
        assert_eq!(Outcome::Timeout.to_string(), "timeout");
    }
}
