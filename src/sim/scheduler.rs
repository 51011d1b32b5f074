//! One-shot timers on simulation time
//!
//! Delayed game effects (brick recounts, scene transitions, speed reverts,
//! brick flashes) are queued here and handed back to the caller from
//! [`Scheduler::advance`] once their delay has elapsed. Nothing blocks; the
//! owner of the scheduler executes the returned actions.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending<A> {
    id: u64,
    due: f64,
    action: A,
}

/// Deterministic one-shot timer queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<A> {
    now: f64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `action` once `delay` seconds have elapsed
    ///
    /// A non-positive delay fires on the next [`advance`](Self::advance).
    pub fn schedule_once(&mut self, delay: f32, action: A) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            action,
        });
        TimerHandle(id)
    }

    /// Run `action` on the next scheduling step
    pub fn next_step(&mut self, action: A) -> TimerHandle {
        self.schedule_once(0.0, action)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != handle.0);
        self.pending.len() != before
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterate pending actions in scheduling order
    pub fn pending_actions(&self) -> impl Iterator<Item = &A> {
        self.pending.iter().map(|p| &p.action)
    }

    /// Advance time by `dt` and take every timer that is now due
    ///
    /// Returned actions are ordered by due time, ties broken by scheduling
    /// order. Timers scheduled after this call returns wait for the next step.
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.action).collect()
    }
}
