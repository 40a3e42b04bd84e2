#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Runtime for the seedwatch polling agent.
//!
//! Glues the pure pieces from `seedwatch-core` to real I/O: the [`Agent`]
//! refreshes the job store through the single-flight gate, dispatches
//! control commands, and tracks backend capability; the [`PollScheduler`]
//! owns the one repeating timer and applies the pure transition function's
//! effects. Failures are reported through the [`Notifier`] seam, once each,
//! and never stop the loop.

mod agent;
mod config;
mod dispatch;
mod notify;
mod scheduler;

pub use agent::{Agent, RefreshOutcome};
pub use config::{AgentConfig, DEFAULT_REQUEST_TIMEOUT, INSTALL_SETTLE_DELAY};
pub use dispatch::DispatchOutcome;
pub use notify::{LogNotifier, Notifier, Severity};
pub use scheduler::{PollScheduler, PollTarget};
