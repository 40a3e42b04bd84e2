//! Command handlers grouped by concern.

mod add;
mod ctl;
mod jobs;
mod system;
mod watch;

pub(crate) use add::handle_add;
pub(crate) use ctl::handle_ctl;
pub(crate) use jobs::handle_jobs;
pub(crate) use system::{handle_system_check, handle_system_install};
pub(crate) use watch::handle_watch;
