//! Timer-owning poll scheduler.
//!
//! Owns at most one repeating tokio timer at any instant and applies the
//! effects produced by the pure transition function in
//! [`seedwatch_core::sched`]. Ticks call the target's refresh, which is
//! internally gated; a refused tick is a no-op.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use seedwatch_core::sched::{
    Effect, SchedulerEvent, SchedulerState, Transition, Visibility, apply_event,
};

use crate::agent::Agent;

/// Operations the scheduler drives. Implemented by [`Agent`]; tests provide
/// counting stand-ins.
#[async_trait]
pub trait PollTarget: Send + Sync {
    /// One refresh attempt (gated by the implementation).
    async fn refresh_tick(&self);
    /// One capability probe.
    async fn reprobe(&self);
}

#[async_trait]
impl PollTarget for Agent {
    async fn refresh_tick(&self) {
        self.refresh().await;
    }

    async fn reprobe(&self) {
        self.probe().await;
    }
}

/// Repeating-timer owner for the polling loop.
///
/// Exactly one timer task exists while the scheduler is active; every timer
/// change aborts the previous task before spawning the replacement.
pub struct PollScheduler<T: PollTarget + 'static> {
    target: Arc<T>,
    state: SchedulerState,
    timer: Option<JoinHandle<()>>,
}

impl<T: PollTarget + 'static> PollScheduler<T> {
    /// Create a scheduler in the suspended state. Call [`Self::start`] to
    /// begin polling.
    #[must_use]
    pub const fn new(target: Arc<T>) -> Self {
        Self {
            target,
            state: SchedulerState::Suspended {
                visibility: Visibility::Visible,
            },
            timer: None,
        }
    }

    /// Begin polling at the foreground interval, firing one immediate
    /// refresh before the first timer tick.
    pub fn start(&mut self) {
        let visibility = self.state.visibility();
        self.state = SchedulerState::Active { visibility };
        self.run_effects(&[
            Effect::RefreshNow,
            Effect::RestartTimer(visibility.interval()),
        ]);
    }

    /// Feed one environment event through the transition function and apply
    /// its effects.
    pub fn handle_event(&mut self, event: SchedulerEvent) {
        let Transition { next, effects } = apply_event(self.state, event);
        tracing::debug!(?event, ?next, "scheduler transition");
        self.state = next;
        self.run_effects(&effects);
    }

    /// Cancel the repeating timer.
    pub fn suspend(&mut self) {
        self.handle_event(SchedulerEvent::Suspend);
    }

    /// Restart the timer at the interval implied by current visibility.
    pub fn resume(&mut self) {
        self.handle_event(SchedulerEvent::Resume);
    }

    /// Current state of the transition machine.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether a repeating timer task is currently alive.
    #[must_use]
    pub fn timer_alive(&self) -> bool {
        self.timer.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Run the event pump: start polling, then apply events from `events`
    /// until the channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<SchedulerEvent>) {
        self.start();
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
    }

    fn run_effects(&mut self, effects: &[Effect]) {
        for &effect in effects {
            match effect {
                Effect::RestartTimer(period) => self.restart_timer(period),
                Effect::CancelTimer => self.cancel_timer(),
                Effect::RefreshNow => {
                    let target = Arc::clone(&self.target);
                    drop(tokio::spawn(async move {
                        target.refresh_tick().await;
                    }));
                }
                Effect::ProbeNow => {
                    let target = Arc::clone(&self.target);
                    drop(tokio::spawn(async move {
                        target.reprobe().await;
                    }));
                }
            }
        }
    }

    fn restart_timer(&mut self, period: Duration) {
        self.cancel_timer();
        let target = Arc::clone(&self.target);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick completes immediately; the cadence
            // starts one period out.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                target.refresh_tick().await;
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(task) = self.timer.take() {
            task.abort();
        }
    }
}

impl<T: PollTarget + 'static> Drop for PollScheduler<T> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use seedwatch_core::sched::{BACKGROUND_INTERVAL, FOREGROUND_INTERVAL};

    #[derive(Default)]
    struct CountingTarget {
        refreshes: AtomicUsize,
        probes: AtomicUsize,
    }

    impl CountingTarget {
        fn refreshes(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }

        fn probes(&self) -> usize {
            self.probes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PollTarget for CountingTarget {
        async fn refresh_tick(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }

        async fn reprobe(&self) {
            self.probes.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        for _ in 0..25 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance(duration: Duration) {
        tokio::time::advance(duration).await;
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_fires_immediate_refresh_then_ticks() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;
        assert_eq!(target.refreshes(), 1, "immediate refresh before first tick");

        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 2);
        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hiding_switches_to_the_background_cadence() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;

        scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Hidden));
        settle().await;
        assert_eq!(target.refreshes(), 1, "no refresh on hiding");

        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 1, "old cadence is gone");
        advance(BACKGROUND_INTERVAL - FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn becoming_visible_refreshes_immediately_and_restarts() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;

        scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Hidden));
        scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Visible));
        settle().await;
        assert_eq!(target.refreshes(), 2, "visible transition refreshes now");

        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_flips_leave_exactly_one_timer() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;

        for _ in 0..3 {
            scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Hidden));
            scheduler.handle_event(SchedulerEvent::VisibilityChanged(Visibility::Visible));
        }
        settle().await;
        assert!(scheduler.timer_alive());
        // start + 3 visible transitions
        assert_eq!(target.refreshes(), 4);

        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 5, "a single timer ticks once per period");
    }

    #[tokio::test(start_paused = true)]
    async fn online_fires_refresh_and_probe() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;

        scheduler.handle_event(SchedulerEvent::WentOnline);
        settle().await;
        assert_eq!(target.refreshes(), 2);
        assert_eq!(target.probes(), 1);

        scheduler.handle_event(SchedulerEvent::WentOffline);
        settle().await;
        assert_eq!(target.refreshes(), 2, "offline changes nothing");
    }

    #[tokio::test(start_paused = true)]
    async fn suspend_stops_ticks_and_resume_restores_them() {
        let target = Arc::new(CountingTarget::default());
        let mut scheduler = PollScheduler::new(Arc::clone(&target));
        scheduler.start();
        settle().await;

        scheduler.suspend();
        assert!(!scheduler.timer_alive());
        advance(BACKGROUND_INTERVAL * 3).await;
        assert_eq!(target.refreshes(), 1, "no ticks while suspended");

        scheduler.resume();
        settle().await;
        assert!(scheduler.timer_alive());
        advance(FOREGROUND_INTERVAL).await;
        assert_eq!(target.refreshes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn event_pump_applies_events_until_closed() {
        let target = Arc::new(CountingTarget::default());
        let scheduler = PollScheduler::new(Arc::clone(&target));
        let (sender, receiver) = mpsc::channel(8);

        let pump = tokio::spawn(scheduler.run(receiver));
        settle().await;
        assert_eq!(target.refreshes(), 1, "pump starts the scheduler");

        sender
            .send(SchedulerEvent::WentOnline)
            .await
            .expect("pump is listening");
        settle().await;
        assert_eq!(target.refreshes(), 2);
        assert_eq!(target.probes(), 1);

        drop(sender);
        settle().await;
        assert!(pump.is_finished(), "pump exits when the channel closes");
    }
}
