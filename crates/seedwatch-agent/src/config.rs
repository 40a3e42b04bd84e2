//! Agent configuration.

use std::time::Duration;

use url::Url;

/// Per-request timeout applied by the HTTP client. Bounds how long a hung
/// request can hold the refresh gate; no retry is attached to it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between a successful install attempt and the follow-up capability
/// probe, giving the backend time to settle.
pub const INSTALL_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for one [`crate::Agent`] instance.
///
/// Poll intervals are fixed by the protocol (see
/// [`seedwatch_core::FOREGROUND_INTERVAL`] and
/// [`seedwatch_core::BACKGROUND_INTERVAL`]) and deliberately not
/// configurable here.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Base URL of the job-control backend.
    pub base_url: Url,
    /// Per-request timeout for every backend call.
    pub request_timeout: Duration,
    /// Settling delay before the post-install re-probe.
    pub settle_delay: Duration,
}

impl AgentConfig {
    /// Configuration with default timeouts for the given backend.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            settle_delay: INSTALL_SETTLE_DELAY,
        }
    }
}
