//! The agent: refresh, probe, submission and install flows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use seedwatch_client::{Ack, ApiClient, ClientError, ClientResult};
use seedwatch_core::{CapabilityReport, JobStateStore, SyncGate};

use crate::config::AgentConfig;
use crate::notify::{Notifier, Severity};

/// Result of one refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced; carries the new job count.
    Replaced {
        /// Jobs in the new snapshot.
        jobs: usize,
    },
    /// Another refresh was in flight; this request was dropped.
    Skipped,
    /// The request failed; the store keeps its last known-good snapshot.
    Failed,
}

/// Client-side agent maintaining an eventually-consistent view of the
/// backend's job set.
///
/// All methods take `&self`; the agent is designed to live in an [`Arc`] and
/// be shared between the scheduler, command handlers and render loops.
pub struct Agent {
    client: ApiClient,
    store: Arc<JobStateStore>,
    gate: SyncGate,
    capability: CapabilityState,
    notifier: Arc<dyn Notifier>,
    settle_delay: Duration,
}

impl Agent {
    /// Build an agent from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AgentConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let client = ApiClient::new(config.base_url.clone(), config.request_timeout)?;
        Ok(Self::from_parts(client, notifier, config.settle_delay))
    }

    /// Build an agent around an existing client.
    #[must_use]
    pub fn from_parts(client: ApiClient, notifier: Arc<dyn Notifier>, settle_delay: Duration) -> Self {
        Self {
            client,
            store: Arc::new(JobStateStore::new()),
            gate: SyncGate::new(),
            capability: CapabilityState::default(),
            notifier,
            settle_delay,
        }
    }

    /// Handle to the job store for render loops.
    #[must_use]
    pub fn store(&self) -> Arc<JobStateStore> {
        Arc::clone(&self.store)
    }

    /// The refresh gate. Exposed so embedders can observe busy state; only
    /// refreshes acquire it.
    #[must_use]
    pub const fn gate(&self) -> &SyncGate {
        &self.gate
    }

    /// Backend client used by this agent.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Startup sequence: one unconditional capability probe.
    ///
    /// Deliberately does not refresh. The single startup refresh belongs to
    /// whatever drives polling (the scheduler's start fires it), so starting
    /// agent and scheduler together issues exactly one snapshot request.
    pub async fn start(&self) {
        self.probe().await;
    }

    /// Fetch the job snapshot and replace the store wholesale.
    ///
    /// At most one refresh is ever in flight: if the gate is busy the
    /// request is dropped (`Skipped`), not queued. A failed refresh leaves
    /// the store untouched, notifies once, and, if no probe has ever
    /// succeeded, fires one opportunistic probe.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_permit) = self.gate.try_enter() else {
            tracing::trace!("refresh dropped; another refresh is in flight");
            return RefreshOutcome::Skipped;
        };

        match self.client.fetch_jobs().await {
            Ok(jobs) => {
                let count = jobs.len();
                self.store.replace(jobs);
                tracing::debug!(jobs = count, "job snapshot replaced");
                RefreshOutcome::Replaced { jobs: count }
            }
            Err(error) => {
                self.notifier.notify(Severity::Error, &error.describe());
                if !self.capability.has_probed() {
                    self.probe().await;
                }
                RefreshOutcome::Failed
            }
        }
    }

    /// Probe backend capability once and record the report.
    ///
    /// Returns the fresh report, or `None` on failure (which is notified
    /// but never retried here).
    pub async fn probe(&self) -> Option<CapabilityReport> {
        match self.client.probe().await {
            Ok(report) => {
                self.capability.record(report.clone());
                tracing::debug!(
                    has_downloader = report.has_downloader,
                    "capability report updated"
                );
                Some(report)
            }
            Err(error) => {
                self.notifier.notify(Severity::Error, &error.describe());
                None
            }
        }
    }

    /// Latest recorded capability report, if any probe has succeeded.
    #[must_use]
    pub fn capability_report(&self) -> Option<CapabilityReport> {
        self.capability.latest()
    }

    /// Whether the missing-downloader warning should currently be shown.
    ///
    /// The warning appears when the latest report lacks a downloader and is
    /// dismissed implicitly, and permanently, the first time a report shows
    /// one installed.
    #[must_use]
    pub fn warning_visible(&self) -> bool {
        self.capability.warning_visible()
    }

    /// Submit a magnet link, then force one refresh through the gate.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure after notifying once (and re-probing
    /// when the failure indicates a missing downloader).
    pub async fn add_magnet(&self, magnet: &str) -> ClientResult<Ack> {
        match self.client.add_magnet(magnet).await {
            Ok(ack) => {
                self.notifier.notify(Severity::Info, &ack.message);
                self.refresh().await;
                Ok(ack)
            }
            Err(error) => {
                self.report_failure(&error).await;
                Err(error)
            }
        }
    }

    /// Upload a `.torrent` file, then force one refresh through the gate.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure after notifying once (and re-probing
    /// when the failure indicates a missing downloader).
    pub async fn upload_torrent(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<Ack> {
        match self.client.upload_torrent(file_name, bytes).await {
            Ok(ack) => {
                self.notifier.notify(Severity::Info, &ack.message);
                self.refresh().await;
                Ok(ack)
            }
            Err(error) => {
                self.report_failure(&error).await;
                Err(error)
            }
        }
    }

    /// Ask the backend to install a download engine, then re-probe: after
    /// the settling delay on success, immediately on failure.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure after notifying once.
    pub async fn attempt_install(&self) -> ClientResult<Ack> {
        match self.client.install_downloader().await {
            Ok(ack) => {
                self.notifier.notify(Severity::Info, &ack.message);
                tokio::time::sleep(self.settle_delay).await;
                self.probe().await;
                Ok(ack)
            }
            Err(error) => {
                self.notifier.notify(Severity::Error, &error.describe());
                self.probe().await;
                Err(error)
            }
        }
    }

    pub(crate) async fn report_failure(&self, error: &ClientError) {
        self.notifier.notify(Severity::Error, &error.describe());
        if error.is_missing_downloader() {
            self.probe().await;
        }
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

/// Capability tracking: latest report, whether any probe ever succeeded,
/// and the one-way warning dismissal.
#[derive(Debug, Default)]
struct CapabilityState {
    report: Mutex<Option<CapabilityReport>>,
    probed: AtomicBool,
    dismissed: AtomicBool,
}

impl CapabilityState {
    fn record(&self, report: CapabilityReport) {
        if report.has_downloader {
            self.dismissed.store(true, Ordering::Release);
        }
        self.probed.store(true, Ordering::Release);
        let mut slot = self.report.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(report);
    }

    fn has_probed(&self) -> bool {
        self.probed.load(Ordering::Acquire)
    }

    fn latest(&self) -> Option<CapabilityReport> {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn warning_visible(&self) -> bool {
        if self.dismissed.load(Ordering::Acquire) {
            return false;
        }
        self.latest().is_some_and(|report| !report.has_downloader)
    }
}
