// src/services/request_tracker.rs
// DOCUMENTATION: Per-session request generations
// PURPOSE: Let a newer discovery supersede one that is still in flight

use crate::models::SessionContext;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
struct SessionGeneration {
    current: u64,
    last_seen: Instant,
}

/// Handle for one in-flight discovery
#[derive(Debug, Clone)]
pub struct RequestTicket {
    session_key: String,
    pub generation: u64,
}

/// Tracks the latest discovery generation of every session
/// DOCUMENTATION: Generations only ever grow for a session, so a ticket
/// taken before another `begin` can never look current again.
#[derive(Default)]
pub struct RequestTracker {
    sessions: Mutex<HashMap<String, SessionGeneration>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a discovery, superseding any earlier one for this session
    pub async fn begin(&self, session: &SessionContext) -> RequestTicket {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .entry(session.token().to_string())
            .or_insert(SessionGeneration {
                current: 0,
                last_seen: Instant::now(),
            });
        entry.current += 1;
        entry.last_seen = Instant::now();

        RequestTicket {
            session_key: session.token().to_string(),
            generation: entry.current,
        }
    }

    /// Whether no newer discovery has started for the ticket's session
    pub async fn is_current(&self, ticket: &RequestTicket) -> bool {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&ticket.session_key)
            .map(|s| s.current == ticket.generation)
            .unwrap_or(false)
    }

    /// Drop sessions idle for longer than `max_idle`
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= max_idle);
        before - sessions.len()
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Start background prune task
/// DOCUMENTATION: Forgets sessions that have not discovered anything recently
pub fn start_prune_task(tracker: Arc<RequestTracker>, interval_seconds: u64, max_idle: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            let removed = tracker.prune_idle(max_idle).await;
            if removed > 0 {
                log::info!("Request tracker: pruned {} idle sessions", removed);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> SessionContext {
        SessionContext::new(token).unwrap()
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let tracker = RequestTracker::new();
        let alice = session("alice");

        let first = tracker.begin(&alice).await;
        assert!(tracker.is_current(&first).await);

        let second = tracker.begin(&alice).await;
        assert!(!tracker.is_current(&first).await);
        assert!(tracker.is_current(&second).await);
        assert_eq!(second.generation, first.generation + 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let tracker = RequestTracker::new();

        let a = tracker.begin(&session("alice")).await;
        let b = tracker.begin(&session("bob")).await;

        assert!(tracker.is_current(&a).await);
        assert!(tracker.is_current(&b).await);
    }

    #[tokio::test]
    async fn test_prune_idle() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin(&session("alice")).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(tracker.prune_idle(Duration::from_millis(10)).await, 1);
        assert_eq!(tracker.session_count().await, 0);

        // A pruned session's old ticket is no longer current
        assert!(!tracker.is_current(&ticket).await);
    }
}
