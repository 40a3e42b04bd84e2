//! Continuous polling view.

use std::sync::Arc;

use seedwatch_agent::{Agent, AgentConfig, LogNotifier, PollScheduler};
use seedwatch_core::sched::{SchedulerEvent, Visibility};
use seedwatch_core::store::JobStateStore;

use crate::cli::WatchArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_jobs;

pub(crate) async fn handle_watch(ctx: &AppContext, args: WatchArgs) -> CliResult<()> {
    let WatchArgs { background } = args;
    let mut config = AgentConfig::new(ctx.base_url.clone());
    config.request_timeout = ctx.timeout;

    let agent = Arc::new(Agent::new(&config, Arc::new(LogNotifier)).map_err(CliError::failure)?);
    agent.start().await;

    let mut scheduler = PollScheduler::new(Arc::clone(&agent));
    if background {
        scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Hidden));
    }
    scheduler.start();

    let store = agent.store();
    let render_interval = scheduler.state().visibility().interval();
    let mut ticker = tokio::time::interval(render_interval);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    tracing::warn!(error = %err, "signal handler failed; stopping watch");
                }
                break;
            }
            _ = ticker.tick() => {
                render_snapshot(&agent, &store, ctx)?;
            }
        }
    }

    scheduler.suspend();
    println!("stopped");
    Ok(())
}

fn render_snapshot(agent: &Agent, store: &JobStateStore, ctx: &AppContext) -> CliResult<()> {
    if agent.warning_visible() {
        let recommended = agent
            .capability_report()
            .and_then(|report| report.recommended)
            .unwrap_or_else(|| "a download engine".to_string());
        println!("warning: no download engine available; install {recommended}");
    }
    match store.last_refreshed() {
        Some(at) => println!("jobs: {} (refreshed {at})", store.len()),
        None => println!("jobs: waiting for first refresh"),
    }
    render_jobs(&store.ordered(), ctx.output)
}
