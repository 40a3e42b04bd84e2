//! Latest-snapshot store for the tracked job set.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::model::{Job, JobSet};

/// Holds the most recent full job snapshot, replaced atomically on each
/// successful refresh.
///
/// There is deliberately no incremental update API: a job absent from a
/// later snapshot simply disappears, and a failed refresh leaves the last
/// known-good snapshot untouched.
#[derive(Debug, Default)]
pub struct JobStateStore {
    inner: RwLock<Snapshot>,
}

#[derive(Debug, Default)]
struct Snapshot {
    jobs: JobSet,
    refreshed_at: Option<DateTime<Utc>>,
}

impl JobStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a complete snapshot. Readers observe either the previous set
    /// or the new one, never a mixture.
    pub fn replace(&self, jobs: JobSet) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.jobs = jobs;
        inner.refreshed_at = Some(Utc::now());
    }

    /// Jobs in display order: ascending status priority, ties in map
    /// iteration order (job id). Pure with respect to the stored snapshot;
    /// calling it twice between replacements yields identical sequences.
    #[must_use]
    pub fn ordered(&self) -> Vec<Job> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut jobs: Vec<Job> = inner.jobs.values().cloned().collect();
        jobs.sort_by_key(|job| job.status.priority());
        jobs
    }

    /// Look up a single job by id in the current snapshot.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Job> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.jobs.get(id).cloned()
    }

    /// Number of jobs in the current snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.jobs.len()
    }

    /// Whether the current snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instant of the last successful replacement, `None` before the first.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.refreshed_at
    }
}
