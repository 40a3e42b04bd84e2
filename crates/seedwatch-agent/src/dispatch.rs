//! Control-command dispatch.

use seedwatch_core::JobAction;

use seedwatch_client::ClientResult;

use crate::agent::{Agent, RefreshOutcome};
use crate::notify::Severity;

/// Outcome of a successfully dispatched command.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Backend acknowledgement message.
    pub message: String,
    /// Whether the forced post-command refresh actually ran. When the gate
    /// was busy the refresh was dropped and the next scheduled tick will
    /// converge the view instead.
    pub refresh_followed: bool,
}

impl Agent {
    /// Send exactly one control command for one job, with no retry.
    ///
    /// On success the agent forces one immediate refresh through the same
    /// gate scheduled refreshes use; if that refresh is dropped the view
    /// converges within one more poll period. On failure nothing is mutated
    /// and the failure is notified once.
    ///
    /// For [`JobAction::Delete`] the caller must have obtained operator
    /// confirmation before invoking this; the agent does not confirm.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure after notifying.
    pub async fn dispatch(&self, id: &str, action: JobAction) -> ClientResult<DispatchOutcome> {
        match self.client().control(id, action).await {
            Ok(ack) => {
                self.notifier().notify(Severity::Info, &ack.message);
                tracing::debug!(job = id, action = %action, "command acknowledged");
                let refresh = self.refresh().await;
                Ok(DispatchOutcome {
                    message: ack.message,
                    refresh_followed: matches!(refresh, RefreshOutcome::Replaced { .. }),
                })
            }
            Err(error) => {
                tracing::debug!(job = id, action = %action, "command failed");
                self.report_failure(&error).await;
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use seedwatch_client::ApiClient;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::notify::Notifier;

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn notify(&self, _severity: Severity, _message: &str) {}
    }

    fn agent(server: &MockServer) -> Result<Agent> {
        let client = ApiClient::new(server.base_url().parse()?, Duration::from_secs(5))?;
        Ok(Agent::from_parts(
            client,
            Arc::new(SilentNotifier),
            Duration::ZERO,
        ))
    }

    #[tokio::test]
    async fn successful_dispatch_forces_one_refresh() -> Result<()> {
        let server = MockServer::start_async().await;
        let control = server.mock(|when, then| {
            when.method(GET).path("/control_download/aa/delete");
            then.status(200).json_body(
                serde_json::json!({"success": true, "message": "Download deleted successfully"}),
            );
        });
        let refresh = server.mock(|when, then| {
            when.method(GET).path("/get_downloads");
            then.status(200).json_body(serde_json::json!({}));
        });

        let agent = agent(&server)?;
        let outcome = agent.dispatch("aa", JobAction::Delete).await?;
        control.assert();
        refresh.assert_calls(1);
        assert!(outcome.refresh_followed);
        Ok(())
    }

    #[tokio::test]
    async fn forced_refresh_is_dropped_when_the_gate_is_busy() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/control_download/aa/pause");
            then.status(200).json_body(
                serde_json::json!({"success": true, "message": "Download paused successfully"}),
            );
        });
        let refresh = server.mock(|when, then| {
            when.method(GET).path("/get_downloads");
            then.status(200).json_body(serde_json::json!({}));
        });

        let agent = agent(&server)?;
        let permit = agent.gate().try_enter().expect("gate starts idle");
        let outcome = agent.dispatch("aa", JobAction::Pause).await?;
        assert!(!outcome.refresh_followed);
        refresh.assert_calls(0);
        drop(permit);
        Ok(())
    }

    #[tokio::test]
    async fn failed_dispatch_mutates_nothing_and_forces_no_refresh() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/control_download/zz/stop");
            then.status(200)
                .json_body(serde_json::json!({"success": false, "message": "Download not found"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(GET).path("/get_downloads");
            then.status(200).json_body(serde_json::json!({}));
        });

        let agent = agent(&server)?;
        let error = agent
            .dispatch("zz", JobAction::Stop)
            .await
            .expect_err("backend refused the command");
        assert_eq!(error.to_string(), "Download not found");
        refresh.assert_calls(0);
        assert!(agent.store().is_empty());
        Ok(())
    }
}
