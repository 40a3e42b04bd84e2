//! Snapshot and command types shared across the workspace.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a job by the backend. Stable for the job's
/// lifetime; a refresh that omits a previously-seen id means the job is gone.
pub type JobId = String;

/// Full snapshot of the tracked job set, keyed by job id.
///
/// A `BTreeMap` keeps iteration deterministic, so jobs with equal status
/// priority always render in id order with no secondary sort key.
pub type JobSet = BTreeMap<JobId, Job>;

/// Lifecycle state reported by the backend for a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued but not yet transferring.
    Pending,
    /// Actively transferring.
    Downloading,
    /// Paused by the operator.
    Paused,
    /// Finished successfully.
    Completed,
    /// Failed; `Job::error_message` carries the backend detail.
    Error,
    /// Stopped by the operator before completion.
    Cancelled,
    /// Any status this client does not recognise; sorts last.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Display-order priority; lower sorts first, unknown statuses last.
    #[must_use]
    pub const fn priority(self) -> u16 {
        match self {
            Self::Downloading => 1,
            Self::Paused => 2,
            Self::Pending => 3,
            Self::Completed => 4,
            Self::Error => 5,
            Self::Cancelled => 6,
            Self::Unknown => 999,
        }
    }

    /// Wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One tracked download as reported by the backend.
///
/// Jobs are never mutated in place; each refresh replaces the containing
/// [`JobSet`] wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Backend-assigned identifier.
    pub id: JobId,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Completion percentage in `[0, 100]`.
    #[serde(default)]
    pub progress: f64,
    /// Connected peers with a complete copy.
    #[serde(default)]
    pub seeders: u32,
    /// Connected peers still downloading.
    #[serde(default)]
    pub leechers: u32,
    /// Current download rate in bytes per second.
    #[serde(default)]
    pub download_speed: u64,
    /// Current upload rate in bytes per second.
    #[serde(default)]
    pub upload_speed: u64,
    /// Estimated seconds remaining; zero or negative means unknown.
    #[serde(default)]
    pub eta: i64,
    /// Total payload size in bytes when the backend knows it.
    #[serde(default)]
    pub total_size: u64,
    /// Bytes downloaded so far.
    #[serde(default)]
    pub downloaded_size: u64,
    /// Failure detail; meaningful only when `status == error`.
    #[serde(default)]
    pub error_message: String,
}

impl Job {
    /// Failure detail when the job is in the error state and the backend
    /// supplied one.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        if self.status == JobStatus::Error && !self.error_message.is_empty() {
            Some(&self.error_message)
        } else {
            None
        }
    }
}

/// Control command addressed to a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    /// Suspend the transfer.
    Pause,
    /// Continue a paused transfer.
    Resume,
    /// Stop the transfer without removing the job.
    Stop,
    /// Remove the job. Destructive: callers must confirm with the operator
    /// before dispatching.
    Delete,
}

impl JobAction {
    /// Wire label used in the control endpoint path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Delete => "delete",
        }
    }

    /// Whether the action requires operator confirmation before dispatch.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Backend capability snapshot: which download engines are installed.
///
/// Created by a probe, never mutated; each probe fully replaces the previous
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Whether at least one usable download engine is present.
    pub has_downloader: bool,
    /// Per-tool presence flags.
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
    /// Tool the backend suggests installing, when any.
    #[serde(default)]
    pub recommended: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_priorities_match_display_order() {
        let expected = [
            (JobStatus::Downloading, 1),
            (JobStatus::Paused, 2),
            (JobStatus::Pending, 3),
            (JobStatus::Completed, 4),
            (JobStatus::Error, 5),
            (JobStatus::Cancelled, 6),
            (JobStatus::Unknown, 999),
        ];
        for (status, priority) in expected {
            assert_eq!(status.priority(), priority, "{status}");
        }
    }

    #[test]
    fn unrecognised_status_decodes_as_unknown() {
        let status: JobStatus = serde_json::from_str("\"verifying\"").expect("decode");
        assert_eq!(status, JobStatus::Unknown);
    }

    #[test]
    fn job_decodes_backend_shape() {
        let payload = serde_json::json!({
            "id": "a1b2c3d4",
            "status": "downloading",
            "progress": 42.5,
            "seeders": 8,
            "leechers": 3,
            "download_speed": 819_200,
            "upload_speed": 40_960,
            "eta": 125,
            "total_size": 0,
            "downloaded_size": 0,
            "is_paused": false,
            "error_message": ""
        });
        let job: Job = serde_json::from_value(payload).expect("decode job");
        assert_eq!(job.id, "a1b2c3d4");
        assert_eq!(job.status, JobStatus::Downloading);
        assert!((job.progress - 42.5).abs() < f64::EPSILON);
        assert!(job.failure().is_none());
    }

    #[test]
    fn failure_requires_error_status_and_message() {
        let mut job: Job = serde_json::from_value(serde_json::json!({
            "id": "x",
            "status": "error",
            "error_message": "no downloader installed"
        }))
        .expect("decode job");
        assert_eq!(job.failure(), Some("no downloader installed"));

        job.status = JobStatus::Completed;
        assert!(job.failure().is_none());
    }

    #[test]
    fn delete_is_the_only_destructive_action() {
        assert!(JobAction::Delete.is_destructive());
        for action in [JobAction::Pause, JobAction::Resume, JobAction::Stop] {
            assert!(!action.is_destructive(), "{action}");
        }
    }
}
