//! Pure scheduler state machine for the adaptive polling loop.
//!
//! Environment notifications (page visibility, connectivity, explicit
//! suspend/resume) arrive as [`SchedulerEvent`]s; [`apply_event`] maps the
//! current [`SchedulerState`] and an event to the next state plus the
//! effects the timer owner must perform. Keeping the transition function
//! free of timers makes every rule unit-testable.

use std::time::Duration;

/// Polling period while the presentation surface is visible.
pub const FOREGROUND_INTERVAL: Duration = Duration::from_millis(3000);

/// Polling period while the presentation surface is hidden.
pub const BACKGROUND_INTERVAL: Duration = Duration::from_millis(15_000);

/// Visibility of the presentation surface driving the poll cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Surface is visible; poll at the foreground interval.
    Visible,
    /// Surface is hidden; poll at the background interval.
    Hidden,
}

impl Visibility {
    /// Poll interval implied by this visibility state.
    #[must_use]
    pub const fn interval(self) -> Duration {
        match self {
            Self::Visible => FOREGROUND_INTERVAL,
            Self::Hidden => BACKGROUND_INTERVAL,
        }
    }
}

/// Scheduler lifecycle state. Exactly one repeating timer exists while
/// `Active`; none while `Suspended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Polling is running at the interval implied by the visibility.
    Active {
        /// Visibility the current timer was started under.
        visibility: Visibility,
    },
    /// Polling is stopped; visibility is still tracked so `Resume` restarts
    /// at the right interval.
    Suspended {
        /// Visibility observed while suspended.
        visibility: Visibility,
    },
}

impl SchedulerState {
    /// Visibility recorded in either state.
    #[must_use]
    pub const fn visibility(self) -> Visibility {
        match self {
            Self::Active { visibility } | Self::Suspended { visibility } => visibility,
        }
    }

    /// Whether a repeating timer should currently exist.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Environment notification fed into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The presentation surface became visible or hidden.
    VisibilityChanged(Visibility),
    /// Network connectivity returned.
    WentOnline,
    /// Network connectivity was lost.
    WentOffline,
    /// Stop polling entirely.
    Suspend,
    /// Restart polling at the interval implied by current visibility.
    Resume,
}

/// Side effect the timer owner must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel any existing repeating timer and start one at this period.
    /// Never stack: the old timer must be gone before the new one starts.
    RestartTimer(Duration),
    /// Cancel the repeating timer without starting a replacement.
    CancelTimer,
    /// Fire one refresh immediately, outside the timer cadence.
    RefreshNow,
    /// Fire one capability probe immediately.
    ProbeNow,
}

/// Result of applying one event: the next state and the effects to run, in
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub next: SchedulerState,
    /// Effects to perform, in order.
    pub effects: Vec<Effect>,
}

/// Apply one event to the scheduler state.
///
/// Rules:
/// - A visibility change while active restarts the timer at the new
///   interval; becoming visible additionally fires an immediate refresh.
///   A redundant notification (same visibility) does nothing.
/// - A visibility change while suspended only records the visibility.
/// - `WentOnline` fires one immediate refresh and one probe, independent of
///   the timer. `WentOffline` changes nothing; ticks keep firing and fail at
///   the transport layer.
/// - `Suspend` cancels the timer; `Resume` restarts it at the interval
///   implied by the tracked visibility.
#[must_use]
pub fn apply_event(state: SchedulerState, event: SchedulerEvent) -> Transition {
    match event {
        SchedulerEvent::VisibilityChanged(visibility) => {
            if visibility == state.visibility() {
                return Transition {
                    next: state,
                    effects: Vec::new(),
                };
            }
            match state {
                SchedulerState::Active { .. } => {
                    let mut effects = vec![Effect::RestartTimer(visibility.interval())];
                    if visibility == Visibility::Visible {
                        effects.push(Effect::RefreshNow);
                    }
                    Transition {
                        next: SchedulerState::Active { visibility },
                        effects,
                    }
                }
                SchedulerState::Suspended { .. } => Transition {
                    next: SchedulerState::Suspended { visibility },
                    effects: Vec::new(),
                },
            }
        }
        SchedulerEvent::WentOnline => Transition {
            next: state,
            effects: vec![Effect::RefreshNow, Effect::ProbeNow],
        },
        SchedulerEvent::WentOffline => Transition {
            next: state,
            effects: Vec::new(),
        },
        SchedulerEvent::Suspend => match state {
            SchedulerState::Active { visibility } => Transition {
                next: SchedulerState::Suspended { visibility },
                effects: vec![Effect::CancelTimer],
            },
            SchedulerState::Suspended { .. } => Transition {
                next: state,
                effects: Vec::new(),
            },
        },
        SchedulerEvent::Resume => match state {
            SchedulerState::Suspended { visibility } => Transition {
                next: SchedulerState::Active { visibility },
                effects: vec![Effect::RestartTimer(visibility.interval())],
            },
            SchedulerState::Active { .. } => Transition {
                next: state,
                effects: Vec::new(),
            },
        },
    }
}
