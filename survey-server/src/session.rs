//! Server-side state of page loads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use survey::SurveyPage;
use tracing::debug;
use uuid::Uuid;

/// A page shared between the requests of one session.
pub type SharedPage = Arc<tokio::sync::Mutex<SurveyPage>>;

struct Entry {
    page: SharedPage,
    last_seen: Instant,
}

/// Pages of live sessions, keyed by session id.
///
/// The table lock is only held for lookups; each page has its own lock.
pub struct Sessions {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, Entry>>,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Start a session for a freshly loaded page.
    ///
    /// Sessions idle for longer than the TTL are dropped first.
    pub fn insert(&self, page: SurveyPage) -> (Uuid, SharedPage) {
        self.insert_at(page, Instant::now())
    }

    fn insert_at(&self, page: SurveyPage, now: Instant) -> (Uuid, SharedPage) {
        let id = Uuid::new_v4();
        let mut entries = self.lock();

        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.ttl);
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "dropped idle sessions");
        }

        let page = Arc::new(tokio::sync::Mutex::new(page));
        entries.insert(
            id,
            Entry {
                page: page.clone(),
                last_seen: now,
            },
        );
        (id, page)
    }

    /// Look up a live session and mark it as used.
    pub fn get(&self, id: &Uuid) -> Option<SharedPage> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: &Uuid, now: Instant) -> Option<SharedPage> {
        let mut entries = self.lock();
        let entry = entries.get_mut(id)?;
        if now.saturating_duration_since(entry.last_seen) > self.ttl {
            entries.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.page.clone())
    }

    /// End a session.
    pub fn remove(&self, id: &Uuid) {
        if self.lock().remove(id).is_some() {
            debug!(session = %id, "session closed");
        }
    }

    /// Number of sessions held, including idle ones not swept yet.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
