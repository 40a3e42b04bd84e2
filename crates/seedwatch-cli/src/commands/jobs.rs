//! One-shot job listing.

use seedwatch_core::store::JobStateStore;

use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_jobs;

pub(crate) async fn handle_jobs(ctx: &AppContext) -> CliResult<()> {
    let jobs = ctx.api.fetch_jobs().await.map_err(CliError::failure)?;
    let store = JobStateStore::new();
    store.replace(jobs);
    render_jobs(&store.ordered(), ctx.output)
}
