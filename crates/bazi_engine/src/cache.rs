//! Bounded, time-limited memo of chart results.
//!
//! A chart is a pure function of its input and options, so results are
//! shared across calls by key. Entries expire after the TTL and the oldest
//! insertion is evicted once the cache is full.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::input::BirthInput;
use crate::options::BaziOptions;
use crate::result::BaziResult;

pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.max_entries == 0 {
            return Err("cache max_entries must be greater than zero");
        }
        if self.ttl_secs == 0 {
            return Err("cache ttl_secs must be greater than zero");
        }
        if i64::try_from(self.ttl_secs).is_err() {
            return Err("cache ttl_secs is too large");
        }
        Ok(())
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX))
    }
}

/// Hit, miss and eviction counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

/// Cache key: the canonical JSON of input, options and evaluation year.
///
/// The year fixes the current period and the fleeting-year window, so a
/// chart computed in one year is never served in another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(input: &BirthInput, options: &BaziOptions, year: i32) -> Option<Self> {
        serde_json::to_string(&(input, options, year)).ok().map(Self)
    }
}

struct Entry {
    result: Arc<BaziResult>,
    inserted_at: DateTime<Utc>,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<CacheKey, Entry>,
    order: VecDeque<CacheKey>,
}

impl Slots {
    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

pub struct ChartCache {
    config: CacheConfig,
    slots: Mutex<Slots>,
    stats: CacheStats,
}

impl std::fmt::Debug for ChartCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartCache")
            .field("config", &self.config)
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl ChartCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            slots: Mutex::new(Slots::default()),
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Look up a live entry. Expired entries are dropped on access.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<BaziResult>> {
        let Ok(mut slots) = self.slots.lock() else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        let expired = match slots.entries.get(key) {
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => now - entry.inserted_at >= self.config.ttl(),
        };
        if expired {
            slots.remove(key);
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        slots.entries.get(key).map(|e| Arc::clone(&e.result))
    }

    /// Store a result, evicting the oldest insertions while full.
    pub fn put(&self, key: CacheKey, result: Arc<BaziResult>, now: DateTime<Utc>) {
        let Ok(mut slots) = self.slots.lock() else {
            return;
        };
        if slots.entries.contains_key(&key) {
            slots.remove(&key);
        }
        while slots.entries.len() >= self.config.max_entries {
            let Some(oldest) = slots.order.pop_front() else {
                break;
            };
            slots.entries.remove(&oldest);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
        slots.order.push_back(key.clone());
        slots.entries.insert(
            key,
            Entry {
                result,
                inserted_at: now,
            },
        );
    }

    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.entries.clear();
            slots.order.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_base::{GanZhi, Gender};

    use crate::calendar::FixedCalendar;
    use crate::engine::{BaziEngine, EngineConfig};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample(year: i32) -> (CacheKey, Arc<BaziResult>) {
        let pillars = ["庚午", "壬午", "辛亥", "乙未"].map(|s| GanZhi::parse(s).unwrap());
        let engine =
            BaziEngine::with_adapter(FixedCalendar::new(pillars), EngineConfig::default()).unwrap();
        let input = BirthInput::solar(year, 6, 15, 14, Gender::Male);
        let options = BaziOptions::default();
        let result = engine.calculate(&input, &options, now()).unwrap();
        (CacheKey::new(&input, &options, 2026).unwrap(), result)
    }

    #[test]
    fn key_depends_on_options_and_year() {
        let input = BirthInput::solar(1990, 6, 15, 14, Gender::Male);
        let a = CacheKey::new(&input, &BaziOptions::default(), 2026).unwrap();
        let b = CacheKey::new(
            &input,
            &BaziOptions {
                include_shensha: true,
                ..BaziOptions::default()
            },
            2026,
        )
        .unwrap();
        assert_ne!(a, b);
        assert_eq!(a, CacheKey::new(&input, &BaziOptions::default(), 2026).unwrap());
        assert_ne!(a, CacheKey::new(&input, &BaziOptions::default(), 2020).unwrap());
    }

    #[test]
    fn hit_then_expire() {
        let cache = ChartCache::new(CacheConfig {
            max_entries: 4,
            ttl_secs: 60,
        });
        let (key, result) = sample(1990);
        assert!(cache.get(&key, now()).is_none());
        cache.put(key.clone(), result, now());
        assert!(cache.get(&key, now() + Duration::seconds(59)).is_some());
        assert!(cache.get(&key, now() + Duration::seconds(60)).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 2);
    }

    #[test]
    fn oldest_insertion_is_evicted() {
        let cache = ChartCache::new(CacheConfig {
            max_entries: 2,
            ttl_secs: 600,
        });
        let (k1, r1) = sample(1990);
        let (k2, r2) = sample(1991);
        let (k3, r3) = sample(1992);
        cache.put(k1.clone(), r1, now());
        cache.put(k2.clone(), r2, now());
        cache.put(k3.clone(), r3, now());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&k1, now()).is_none());
        assert!(cache.get(&k2, now()).is_some());
        assert!(cache.get(&k3, now()).is_some());
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn reinsert_does_not_grow() {
        let cache = ChartCache::new(CacheConfig::default());
        let (key, result) = sample(1990);
        cache.put(key.clone(), Arc::clone(&result), now());
        cache.put(key, result, now());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_sized_config_rejected() {
        let bad = CacheConfig {
            max_entries: 0,
            ..CacheConfig::default()
        };
        assert!(bad.validate().is_err());
        assert!(CacheConfig::default().validate().is_ok());
    }
}
