use crate::timeline::ResolvedTimeline;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

struct Entry {
    timeline: Arc<ResolvedTimeline>,
    written_at: Instant,
}

/// Resolved timelines keyed by handle (exact, case-sensitive), each valid
/// for a fixed TTL from the moment it was written.
///
/// Reads never extend an entry's life. Only successful resolutions are
/// stored.
pub struct TimelineCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl TimelineCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, handle: &str) -> Option<Arc<ResolvedTimeline>> {
        self.get_at(handle, Instant::now())
    }

    pub fn put(&self, handle: &str, timeline: Arc<ResolvedTimeline>) {
        self.put_at(handle, timeline, Instant::now())
    }

    /// Number of stored entries, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, handle: &str, now: Instant) -> Option<Arc<ResolvedTimeline>> {
        let entries = self.lock();
        let entry = entries.get(handle)?;
        if self.is_fresh(entry, now) {
            Some(Arc::clone(&entry.timeline))
        } else {
            None
        }
    }

    fn put_at(&self, handle: &str, timeline: Arc<ResolvedTimeline>, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            handle.to_string(),
            Entry {
                timeline,
                written_at: now,
            },
        );
    }

    fn is_fresh(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.written_at) < self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are inserted and removed whole, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TimelineCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ResolvedPost;
    use crate::twitter::fake::post;

    fn timeline(id: &str) -> Arc<ResolvedTimeline> {
        Arc::new(vec![ResolvedPost {
            post: post(id, "jack", "hello"),
            preceding: None,
        }])
    }

    #[test]
    fn test_miss_when_empty() {
        let cache = TimelineCache::default();
        assert!(cache.get("jack").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_before_expiry_and_miss_after() {
        let cache = TimelineCache::default();
        let t0 = Instant::now();
        cache.put_at("jack", timeline("1"), t0);

        let hit = cache.get_at("jack", t0 + Duration::from_secs(14 * 60 + 59));
        assert_eq!(hit, Some(timeline("1")));
        assert!(cache
            .get_at("jack", t0 + Duration::from_secs(15 * 60 + 1))
            .is_none());
    }

    #[test]
    fn test_exact_ttl_is_a_miss() {
        let cache = TimelineCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put_at("jack", timeline("1"), t0);
        assert!(cache.get_at("jack", t0 + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_read_does_not_extend_life() {
        let cache = TimelineCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put_at("jack", timeline("1"), t0);

        assert!(cache.get_at("jack", t0 + Duration::from_secs(59)).is_some());
        assert!(cache.get_at("jack", t0 + Duration::from_secs(61)).is_none());
    }

    #[test]
    fn test_put_overwrites_and_restarts_clock() {
        let cache = TimelineCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put_at("jack", timeline("1"), t0);
        cache.put_at("jack", timeline("2"), t0 + Duration::from_secs(50));

        assert_eq!(cache.len(), 1);
        let hit = cache.get_at("jack", t0 + Duration::from_secs(100));
        assert_eq!(hit, Some(timeline("2")));
    }

    #[test]
    fn test_handles_are_case_sensitive() {
        let cache = TimelineCache::default();
        cache.put("Jack", timeline("1"));
        assert!(cache.get("jack").is_none());
        assert!(cache.get("Jack").is_some());
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let cache = TimelineCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.put_at("old", timeline("1"), t0);
        cache.put_at("new", timeline("2"), t0 + Duration::from_secs(61));

        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("new", t0 + Duration::from_secs(62)).is_some());
    }
}
