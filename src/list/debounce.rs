//! Trailing-edge debouncer driven by an external clock.
//!
//! The debouncer never owns a timer. The caller passes the current time to
//! [`Debouncer::schedule`] and [`Debouncer::poll`] and arranges for `poll` to be
//! called again after the reported remaining delay (in the plugin, via a Zellij
//! timer). Scheduling a new value cancels the pending one.

use std::time::Duration;

/// Default quiet period before a search term is applied, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default quiet period before a search term is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Result of polling a [`Debouncer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll<T> {
    /// The quiet period elapsed; the pending value is released.
    Ready(T),
    /// A value is pending but its deadline is `remaining_ms` away.
    Pending { remaining_ms: u64 },
    /// Nothing is pending.
    Idle,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            pending: None,
        }
    }

    /// Delay in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Returns `true` when the delay is zero and values should be applied at once.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.delay_ms == 0
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedules `value`, replacing (and thereby cancelling) any pending value.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        if self.pending.is_some() {
            tracing::trace!(now_ms, "superseding pending debounce");
        }

        self.pending = Some(Pending {
            value,
            deadline_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Releases the pending value if its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Poll<T> {
        let Some(deadline_ms) = self.pending.as_ref().map(|p| p.deadline_ms) else {
            return Poll::Idle;
        };

        if now_ms < deadline_ms {
            return Poll::Pending {
                remaining_ms: deadline_ms - now_ms,
            };
        }

        self.pending
            .take()
            .map_or(Poll::Idle, |pending| Poll::Ready(pending.value))
    }

    /// Drops the pending value, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule("i", 0);
        debouncer.schedule("iv", 100);
        debouncer.schedule("iva", 200);

        assert_eq!(debouncer.poll(600), Poll::Pending { remaining_ms: 100 });
        assert_eq!(debouncer.poll(700), Poll::Ready("iva"));
        assert_eq!(debouncer.poll(800), Poll::Idle);
    }

    #[test]
    fn reschedule_restarts_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(1, 0);
        debouncer.schedule(2, 400);

        // The first deadline (500) has passed, but the superseding value waits for its own.
        assert_eq!(debouncer.poll(500), Poll::Pending { remaining_ms: 400 });
        assert_eq!(debouncer.poll(900), Poll::Ready(2));
        assert_eq!(debouncer.poll(900), Poll::Idle);
    }

    #[test]
    fn cancel_clears_pending_value() {
        let mut debouncer = Debouncer::<&str>::default();
        assert_eq!(debouncer.delay_ms(), 500);

        debouncer.schedule("anna", 0);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.cancel(), Some("anna"));
        assert_eq!(debouncer.poll(10_000), Poll::Idle);
    }

    #[test]
    fn zero_delay_is_immediate() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.is_immediate());

        debouncer.schedule("x", 42);
        assert_eq!(debouncer.poll(42), Poll::Ready("x"));
    }
}
