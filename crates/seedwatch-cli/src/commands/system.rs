//! Backend capability inspection and repair.

use tokio::time::sleep;

use seedwatch_agent::INSTALL_SETTLE_DELAY;

use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_capability_report;

pub(crate) async fn handle_system_check(ctx: &AppContext) -> CliResult<()> {
    let report = ctx.api.probe().await.map_err(CliError::failure)?;
    render_capability_report(&report, ctx.output)
}

pub(crate) async fn handle_system_install(ctx: &AppContext) -> CliResult<()> {
    let ack = ctx
        .api
        .install_downloader()
        .await
        .map_err(CliError::failure)?;
    println!("{}", ack.message);

    // Give the backend a moment to finish before confirming the result.
    sleep(INSTALL_SETTLE_DELAY).await;
    let report = ctx.api.probe().await.map_err(CliError::failure)?;
    render_capability_report(&report, ctx.output)
}
