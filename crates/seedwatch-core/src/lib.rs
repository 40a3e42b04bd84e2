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

//! Domain model and scheduling primitives for the seedwatch agent.
//!
//! Everything in this crate is side-effect free: snapshot types and their
//! display ordering, human-readable formatters, the single-flight refresh
//! gate, and the pure scheduler state machine. Network I/O lives in
//! `seedwatch-client`; timers live in `seedwatch-agent`.

pub mod format;
pub mod gate;
pub mod model;
pub mod sched;
pub mod store;

pub use gate::{RefreshPermit, SyncGate};
pub use model::{CapabilityReport, Job, JobAction, JobId, JobSet, JobStatus};
pub use sched::{
    BACKGROUND_INTERVAL, Effect, FOREGROUND_INTERVAL, SchedulerEvent, SchedulerState, Transition,
    Visibility, apply_event,
};
pub use store::JobStateStore;
