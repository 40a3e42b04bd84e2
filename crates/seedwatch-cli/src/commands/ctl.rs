//! Per-job control commands.

use std::sync::Arc;

use seedwatch_agent::{Agent, INSTALL_SETTLE_DELAY, LogNotifier};
use seedwatch_core::JobAction;

use crate::cli::CtlArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_jobs;

pub(crate) async fn handle_ctl(ctx: &AppContext, args: CtlArgs) -> CliResult<()> {
    let CtlArgs { id, action, yes } = args;
    let action = JobAction::from(action);
    if action.is_destructive() && !yes {
        return Err(CliError::validation(
            "delete removes the job permanently; pass --yes to confirm",
        ));
    }

    let agent = Agent::from_parts(ctx.api.clone(), Arc::new(LogNotifier), INSTALL_SETTLE_DELAY);
    let outcome = agent
        .dispatch(&id, action)
        .await
        .map_err(CliError::failure)?;

    println!("{}", outcome.message);
    if outcome.refresh_followed {
        render_jobs(&agent.store().ordered(), ctx.output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ActionType, OutputFormat};
    use httpmock::prelude::*;
    use seedwatch_client::ApiClient;
    use std::time::Duration;

    fn context(base_url: &str) -> AppContext {
        let api = ApiClient::new(base_url.parse().expect("url"), Duration::from_secs(5))
            .expect("client");
        AppContext {
            api,
            base_url: base_url.parse().expect("url"),
            timeout: Duration::from_secs(5),
            output: OutputFormat::Table,
        }
    }

    #[tokio::test]
    async fn delete_requires_explicit_confirmation() {
        let server = MockServer::start_async().await;
        let ctx = context(&server.base_url());

        let err = handle_ctl(
            &ctx,
            CtlArgs {
                id: "aa11".into(),
                action: ActionType::Delete,
                yes: false,
            },
        )
        .await
        .expect_err("unconfirmed delete");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn pause_dispatches_and_refreshes_the_table() {
        let server = MockServer::start_async().await;
        let control = server
            .mock_async(|when, then| {
                when.method(GET).path("/control_download/aa11/pause");
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "message": "Download paused successfully"
                }));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(GET).path("/get_downloads");
                then.status(200).json_body(serde_json::json!({
                    "aa11": {"id": "aa11", "status": "paused", "progress": 40.0}
                }));
            })
            .await;

        let ctx = context(&server.base_url());
        handle_ctl(
            &ctx,
            CtlArgs {
                id: "aa11".into(),
                action: ActionType::Pause,
                yes: false,
            },
        )
        .await
        .expect("dispatch succeeds");
        control.assert_async().await;
        refresh.assert_async().await;
    }
}
