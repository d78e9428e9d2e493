//! Virtual timer queue
//!
//! Timers are advanced by the frame delta of the main loop rather than by a
//! wall clock, so spins behave identically in tests and in the terminal.

use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

/// Ordered set of pending timers owned by a single component
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    /// Virtual time elapsed since creation
    now: Duration,
    /// Monotonic id source, doubles as the tie-breaker for equal due times
    next_id: u64,
    /// Pending timers sorted by (due, id)
    pending: Vec<Timer<E>>,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `event` to fire `delay` after the current virtual time
    pub fn schedule_in(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;

        // Insert after every timer due at or before this one
        let index = self.pending.partition_point(|t| t.due <= due);
        self.pending.insert(index, Timer { id, due, event });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|t| t.id == id) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Move virtual time forward. Due timers are collected with `pop_due`.
    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Take the earliest timer whose due time has been reached
    pub fn pop_due(&mut self) -> Option<E> {
        if self.pending.first().is_some_and(|t| t.due <= self.now) {
            Some(self.pending.remove(0).event)
        } else {
            None
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still pending
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<E>(queue: &mut TimerQueue<E>) -> Vec<E> {
        std::iter::from_fn(|| queue.pop_due()).collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_in(Duration::from_millis(30), "c");
        queue.schedule_in(Duration::from_millis(10), "a");
        queue.schedule_in(Duration::from_millis(20), "b");

        queue.advance(Duration::from_millis(25));
        assert_eq!(drain(&mut queue), vec!["a", "b"]);

        queue.advance(Duration::from_millis(5));
        assert_eq!(drain(&mut queue), vec!["c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_due_times_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_in(Duration::from_millis(10), 1);
        queue.schedule_in(Duration::from_millis(10), 2);
        queue.schedule_in(Duration::from_millis(10), 3);

        queue.advance(Duration::from_millis(10));
        assert_eq!(drain(&mut queue), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule_in(Duration::from_millis(10), "keep");
        let drop = queue.schedule_in(Duration::from_millis(10), "drop");

        assert!(queue.cancel(drop));
        assert!(!queue.cancel(drop));

        queue.advance(Duration::from_millis(50));
        assert_eq!(drain(&mut queue), vec!["keep"]);
        assert!(!queue.cancel(keep));
    }

    #[test]
    fn test_cancel_all() {
        let mut queue = TimerQueue::new();
        for i in 0..5 {
            queue.schedule_in(Duration::from_millis(i * 10), i);
        }
        queue.cancel_all();
        queue.advance(Duration::from_secs(1));
        assert!(queue.pop_due().is_none());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance(Duration::from_millis(100));
        queue.schedule_in(Duration::from_millis(50), ());
        assert_eq!(queue.pending(), 1);

        queue.advance(Duration::from_millis(49));
        assert!(queue.pop_due().is_none());
        queue.advance(Duration::from_millis(1));
        assert!(queue.pop_due().is_some());
    }
}
