//! Bounded LRU memoization of analysis results.
//!
//! The same chord shapes recur constantly during interactive play, so
//! results are cached by (sorted pitch tuple, selected index, force-root
//! flag, spelling flag). The cap bounds memory where the legacy system
//! grew without limit; 256 entries comfortably covers an interactive
//! session's working set.
//!
//! Thread-safe via Mutex. Lookups and inserts are cheap enough that
//! contention is not a concern here; concurrent identical misses both
//! compute and last-write-wins, which is safe because results are
//! deterministic and value-equal.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::envelope::{AnalysisRequest, AnalysisResponse};

/// Default cache capacity in entries.
pub const DEFAULT_CAPACITY: usize = 256;

/// Memoization key: every request field that affects the response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pitches: Vec<i32>,
    selected_index: usize,
    force_bass_as_root: bool,
    prefer_simple_spelling: bool,
}

impl From<&AnalysisRequest> for CacheKey {
    fn from(request: &AnalysisRequest) -> Self {
        let mut pitches = request.active_pitches.clone();
        pitches.sort_unstable();
        Self {
            pitches,
            selected_index: request.selected_option_index,
            force_bass_as_root: request.force_bass_as_root,
            prefer_simple_spelling: request.prefer_simple_spelling,
        }
    }
}

struct CacheEntry {
    response: AnalysisResponse,
    last_access: u64,
}

struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    access_counter: u64,
}

impl CacheInner {
    fn evict_lru(&mut self) {
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&oldest);
        }
    }
}

/// Bounded, process-wide cache of analysis responses.
pub struct AnalysisCache {
    inner: Mutex<CacheInner>,
}

impl AnalysisCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(capacity),
                capacity,
                access_counter: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // A poisoned lock only means some thread panicked mid-operation;
        // the map holds plain values and stays usable.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<AnalysisResponse> {
        let mut inner = self.lock();
        inner.access_counter += 1;
        let access = inner.access_counter;
        inner.entries.get_mut(key).map(|entry| {
            entry.last_access = access;
            entry.response.clone()
        })
    }

    pub fn insert(&self, key: CacheKey, response: AnalysisResponse) {
        let mut inner = self.lock();
        while inner.entries.len() >= inner.capacity && !inner.entries.contains_key(&key) {
            inner.evict_lru();
        }
        inner.access_counter += 1;
        let access = inner.access_counter;
        inner.entries.insert(
            key,
            CacheEntry {
                response,
                last_access: access,
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            capacity: inner.capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pitches: Vec<i32>) -> CacheKey {
        CacheKey::from(&AnalysisRequest::new(pitches))
    }

    #[test]
    fn miss_then_hit() {
        let cache = AnalysisCache::new(4);
        let k = key(vec![60, 64, 67]);
        assert!(cache.get(&k).is_none());
        cache.insert(k.clone(), AnalysisResponse::empty());
        assert!(cache.get(&k).is_some());
    }

    #[test]
    fn key_normalizes_pitch_order() {
        assert_eq!(key(vec![67, 60, 64]), key(vec![60, 64, 67]));
    }

    #[test]
    fn key_distinguishes_flags() {
        let base = AnalysisRequest::new(vec![60, 64, 67]);
        let mut forced = base.clone();
        forced.force_bass_as_root = true;
        assert_ne!(CacheKey::from(&base), CacheKey::from(&forced));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = AnalysisCache::new(2);
        let a = key(vec![1]);
        let b = key(vec![2]);
        let c = key(vec![3]);
        cache.insert(a.clone(), AnalysisResponse::empty());
        cache.insert(b.clone(), AnalysisResponse::empty());
        // Touch `a` so `b` is the eviction victim.
        cache.get(&a);
        cache.insert(c.clone(), AnalysisResponse::empty());

        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn reinserting_existing_key_does_not_evict() {
        let cache = AnalysisCache::new(2);
        let a = key(vec![1]);
        let b = key(vec![2]);
        cache.insert(a.clone(), AnalysisResponse::empty());
        cache.insert(b.clone(), AnalysisResponse::empty());
        cache.insert(a.clone(), AnalysisResponse::empty());
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_some());
    }
}
