//! Single-shot delay timers and per-frame callbacks
//!
//! Both schedulers are cooperative: nothing fires on its own. The host loop
//! asks the queue which handles are due and hands them to their owners, so a
//! cancelled handle simply never comes back out.

use super::Clock;
use std::time::Duration;

/// Opaque handle to a scheduled delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Opaque handle to a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Schedules single-shot delayed callbacks
pub trait DelayScheduler {
    /// Schedule a callback `delay_ms` from now
    fn schedule(&mut self, delay_ms: f64) -> TimerHandle;

    /// Cancel a scheduled callback. Unknown, fired or already cancelled
    /// handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Requests recurring per-frame callbacks, one request per frame
pub trait FrameScheduler {
    /// Request a callback on the next rendered frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a frame request. Unknown or delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline_ms: f64,
}

/// Deadline queue polled by the host loop
#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Remove and return every handle whose deadline has passed, earliest first
    pub fn poll_due(&mut self) -> Vec<TimerHandle> {
        let now = self.clock.now_ms();
        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|timer| {
            if timer.deadline_ms <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.deadline_ms.total_cmp(&b.deadline_ms));
        due.into_iter().map(|timer| timer.handle).collect()
    }

    /// Time remaining until the earliest deadline, if any timer is pending
    pub fn next_deadline_in(&self) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.pending
            .iter()
            .map(|timer| timer.deadline_ms)
            .min_by(|a, b| a.total_cmp(b))
            .map(|deadline| Duration::from_secs_f64((deadline - now).max(0.0) / 1000.0))
    }

    /// Number of timers still waiting
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }
}

impl<C: Clock> DelayScheduler for TimerQueue<C> {
    fn schedule(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            deadline_ms: self.clock.now_ms() + delay_ms.max(0.0),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|timer| timer.handle != handle);
    }
}

/// Frame request list drained once per rendered frame
#[derive(Debug, Default)]
pub struct FrameLoop {
    requested: Vec<FrameHandle>,
    next_id: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every request made before this frame.
    ///
    /// Requests made while the returned handles are being delivered land on
    /// the following frame.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.requested)
    }

    pub fn has_pending(&self) -> bool {
        !self.requested.is_empty()
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requested.retain(|h| *h != handle);
    }
}
