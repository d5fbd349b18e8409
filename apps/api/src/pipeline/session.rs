//! Per-session analysis cache.
//!
//! Re-running the pipeline for the same domain within one session reuses the
//! last analysis. The cache is owned by the caller and handed to the pipeline
//! by `&mut`, so two sessions never see each other's entries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::schema::DomainAnalysis;

#[derive(Debug, Clone)]
struct CachedAnalysis {
    domain: String,
    analysis: DomainAnalysis,
    cached_at: DateTime<Utc>,
}

/// Single slot: the last successfully analysed domain and its analysis.
#[derive(Debug, Clone)]
pub struct AnalysisCache {
    slot: Option<CachedAnalysis>,
    ttl: Duration,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    pub fn get(&self, domain: &str) -> Option<&DomainAnalysis> {
        self.get_at(domain, Utc::now())
    }

    /// Cached analysis for exactly `domain`, if stored less than `ttl` before `now`.
    pub fn get_at(&self, domain: &str, now: DateTime<Utc>) -> Option<&DomainAnalysis> {
        self.slot
            .as_ref()
            .filter(|entry| entry.domain == domain && now - entry.cached_at < self.ttl)
            .map(|entry| &entry.analysis)
    }

    pub fn store(&mut self, domain: &str, analysis: DomainAnalysis) {
        self.store_at(domain, analysis, Utc::now());
    }

    pub fn store_at(&mut self, domain: &str, analysis: DomainAnalysis, now: DateTime<Utc>) {
        self.slot = Some(CachedAnalysis {
            domain: domain.to_string(),
            analysis,
            cached_at: now,
        });
    }

    /// When the cached analysis was produced.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.slot.as_ref().map(|entry| entry.cached_at)
    }

    fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|entry| now - entry.cached_at < self.ttl)
    }
}

/// Session id → that session's `AnalysisCache`.
///
/// Handlers check a cache out, run the pipeline without holding the lock,
/// then save it back.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, AnalysisCache>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// A copy of the session's cache, or an empty one for unknown ids.
    pub async fn checkout(&self, session_id: Uuid) -> AnalysisCache {
        self.sessions
            .lock()
            .await
            .get(&session_id)
            .cloned()
            .unwrap_or_else(|| AnalysisCache::new(self.ttl))
    }

    /// Stores the session's cache and drops sessions whose entry has expired.
    pub async fn save(&self, session_id: Uuid, cache: AnalysisCache) {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, entry| entry.is_live_at(now));
        sessions.insert(session_id, cache);
    }

}

#[cfg(test)]
impl SessionStore {
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
