//! Poisson-timed processes on a virtual clock.
//!
//! A [`TimerQueue`] holds pending fires in due-time order and owns the clock.
//! Each [`IntervalProcess`] schedules at most one pending entry at a time and
//! draws every delay from an exponential distribution, which makes the sequence
//! of fires a Poisson arrival process.
//!
//! Dispatch is cooperative: the owner pops one due entry, runs the tick for its
//! target, then calls [`IntervalProcess::rearm`]. Nothing fires while a tick is
//! running.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rand::Rng as RngCore;

use crate::sampling::rand01_f64;

/// Identifies one scheduled fire. Tokens are never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    due_ms: f64,
    token: TimerToken,
    target: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Ties on due time fall back to scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_ms
            .total_cmp(&other.due_ms)
            .then_with(|| self.token.cmp(&other.token))
    }
}

/// Min-heap of pending fires plus the virtual clock they are measured against.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now_ms: f64,
    next_token: u64,
    heap: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_token: 0,
            heap: BinaryHeap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Due time of the earliest pending entry.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(e)| e.due_ms)
    }

    /// Schedules `target` to fire `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: f64, target: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let delay_ms = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            f64::MAX
        };
        self.heap.push(Reverse(Entry {
            due_ms: self.now_ms + delay_ms,
            token,
            target,
        }));
        token
    }

    /// Removes the pending entry for `token`. Returns whether one was found.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.heap.len();
        self.heap.retain(|Reverse(e)| e.token != token);
        self.heap.len() != before
    }

    /// Pops the earliest entry due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerToken, T)> {
        match self.heap.peek() {
            Some(Reverse(e)) if e.due_ms <= until_ms => {}
            _ => return None,
        }
        let Reverse(entry) = self.heap.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some((entry.token, entry.target))
    }

    /// Moves the clock forward to `ms`. The clock never runs backwards.
    pub fn advance_to(&mut self, ms: f64) {
        if ms > self.now_ms {
            self.now_ms = ms;
        }
    }
}

/// Draws an exponentially distributed delay with the given mean.
pub fn sample_delay(mean_delay_ms: f64, rng: &mut dyn RngCore) -> f64 {
    if !mean_delay_ms.is_finite() || mean_delay_ms <= 0.0 {
        return 0.0;
    }
    -mean_delay_ms * (1.0 - rand01_f64(rng)).ln()
}

/// A restartable timer that fires its target after exponentially distributed
/// delays.
#[derive(Debug, Clone)]
pub struct IntervalProcess<T> {
    target: T,
    mean_delay_ms: f64,
    pending: Option<TimerToken>,
    running: bool,
}

impl<T: Copy> IntervalProcess<T> {
    pub fn new(target: T, mean_delay_ms: f64) -> Self {
        Self {
            target,
            mean_delay_ms,
            pending: None,
            running: false,
        }
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn mean_delay_ms(&self) -> f64 {
        self.mean_delay_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Starts firing. Restarting a running process replaces its pending entry.
    pub fn start(&mut self, queue: &mut TimerQueue<T>, rng: &mut dyn RngCore) {
        if let Some(token) = self.pending.take() {
            queue.cancel(token);
        }
        self.running = true;
        self.schedule_next(queue, rng);
    }

    /// Cancels future fires. Safe to call repeatedly.
    pub fn stop(&mut self, queue: &mut TimerQueue<T>) {
        if let Some(token) = self.pending.take() {
            queue.cancel(token);
        }
        self.running = false;
    }

    /// Changes the mean used for the next drawn delay. An already pending fire
    /// keeps its due time.
    pub fn update_rate(&mut self, mean_delay_ms: f64) {
        self.mean_delay_ms = mean_delay_ms;
    }

    /// Claims a popped entry. Returns `false` for tokens this process no longer
    /// owns, which the caller must then drop without dispatching.
    pub fn accept(&mut self, token: TimerToken) -> bool {
        if self.running && self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Schedules the next fire after a dispatched tick, using the current mean.
    pub fn rearm(&mut self, queue: &mut TimerQueue<T>, rng: &mut dyn RngCore) {
        if self.running && self.pending.is_none() {
            self.schedule_next(queue, rng);
        }
    }

    fn schedule_next(&mut self, queue: &mut TimerQueue<T>, rng: &mut dyn RngCore) {
        let delay = sample_delay(self.mean_delay_ms, rng);
        self.pending = Some(queue.schedule(delay, self.target));
    }
}
