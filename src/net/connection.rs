//! In-flight accounting so the converter can drain on shutdown.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Per-tracker sequence number, logged as `conn-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Counters {
    next_id: AtomicU64,
    in_flight: AtomicU64,
    drained: Notify,
}

/// Cloneable handle shared by the accept loop and its connection tasks.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    counters: Arc<Counters>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a connection as in flight until the returned guard drops.
    pub fn track(&self) -> ConnectionGuard {
        let id = self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.counters.in_flight.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            counters: Arc::clone(&self.counters),
            id: ConnectionId(id),
        }
    }

    pub fn active_count(&self) -> u64 {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Resolve once nothing is in flight. Returns `false` if `limit` ran out first.
    pub async fn wait_for_idle(&self, limit: Duration) -> bool {
        let idle = async {
            loop {
                // Register before checking so a drop in between is not missed.
                let woken = self.counters.drained.notified();
                if self.active_count() == 0 {
                    break;
                }
                woken.await;
            }
        };
        tokio::time::timeout(limit, idle).await.is_ok()
    }
}

#[derive(Debug)]
pub struct ConnectionGuard {
    counters: Arc<Counters>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let before = self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        if before == 1 {
            self.counters.drained.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_per_tracker() {
        let tracker = ConnectionTracker::new();
        let a = tracker.track();
        let b = tracker.track();

        assert_eq!(a.id().to_string(), "conn-1");
        assert_eq!(b.id().to_string(), "conn-2");
    }

    #[test]
    fn guards_count_in_flight() {
        let tracker = ConnectionTracker::new();
        let first = tracker.track();
        let second = tracker.clone().track();
        assert_eq!(tracker.active_count(), 2);

        drop(first);
        assert_eq!(tracker.active_count(), 1);
        drop(second);
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test]
    async fn idle_wait_ends_with_last_guard() {
        let tracker = ConnectionTracker::new();
        let guard = tracker.track();

        let waiter = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.wait_for_idle(Duration::from_secs(2)).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn idle_wait_times_out_while_busy() {
        let tracker = ConnectionTracker::new();
        let _guard = tracker.track();
        assert!(!tracker.wait_for_idle(Duration::from_millis(20)).await);
    }

    #[tokio::test]
    async fn idle_wait_is_immediate_without_connections() {
        let tracker = ConnectionTracker::new();
        assert!(tracker.wait_for_idle(Duration::from_millis(1)).await);
    }
}
