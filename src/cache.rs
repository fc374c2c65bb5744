use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::card::Card;

/// Injected cache seam for card lookups, so fetch logic stays testable and no
/// global state is involved.
pub trait CardCache {
    fn get(&self, key: &str) -> Option<Card>;
    fn set(&self, key: &str, card: Card);
    fn expire(&self, key: &str);
}

pub fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Card)>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        MemoryCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl CardCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Card> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((stored_at, card)) if stored_at.elapsed() < self.ttl => Some(card.clone()),
            Some(_) => {
                // Stale entries are dropped on read.
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, card: Card) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), (Instant::now(), card));
    }

    fn expire(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> Card {
        Card {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn set_then_get_returns_the_card() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("lightning bolt", card("Lightning Bolt"));
        let hit = cache.get("lightning bolt");
        assert_eq!(hit.map(|c| c.name), Some("Lightning Bolt".to_string()));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert!(cache.get("nothing here").is_none());
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let cache = MemoryCache::new(Duration::ZERO);
        cache.set("bolt", card("Lightning Bolt"));
        assert!(cache.get("bolt").is_none());
    }

    #[test]
    fn expire_removes_an_entry_early() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("bolt", card("Lightning Bolt"));
        cache.expire("bolt");
        assert!(cache.get("bolt").is_none());
    }

    #[test]
    fn cache_keys_are_normalized() {
        assert_eq!(cache_key("  Lightning Bolt "), "lightning bolt");
    }
}
