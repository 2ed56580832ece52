//! Common status types.

use serde::{Deserialize, Serialize};

/// State of an asynchronous backend job (sample generation or training).
///
/// The backend reports status as a free-form string; [`JobStatus::parse`]
/// maps everything it does not recognize to [`JobStatus::Unknown`] so a new
/// backend state cannot crash a poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued but not yet started.
    Pending,
    /// Work in progress.
    Processing,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Error,
    /// Status string the client does not recognize.
    Unknown,
}

impl JobStatus {
    /// Parse the backend's status string.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "processing" | "training" | "running" => Self::Processing,
            "completed" | "complete" | "done" => Self::Completed,
            "error" | "failed" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Has the job reached a state where polling should stop?
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("processing", JobStatus::Processing)]
    #[test_case("training", JobStatus::Processing)]
    #[test_case("completed", JobStatus::Completed)]
    #[test_case("failed", JobStatus::Error)]
    #[test_case("something-new", JobStatus::Unknown)]
    fn test_parse(raw: &str, expected: JobStatus) {
        assert_eq!(JobStatus::parse(raw), expected);
    }

    #[test]
    fn test_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Unknown.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
    }

    #[test]
    fn test_serialization() {
        let status = JobStatus::Processing;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"processing\"");

        let parsed: JobStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, JobStatus::Completed);
    }
}
