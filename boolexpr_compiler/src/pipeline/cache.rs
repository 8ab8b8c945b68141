//! Parsed-tree cache keyed by normalized expression text and lexical dialect
//!
//! Entries are immutable and never evicted. Once the cache holds
//! `MAX_CACHED_EXPRESSIONS` trees, further trees are returned to the caller
//! without being stored.

use crate::config::compile_time::cache::MAX_CACHED_EXPRESSIONS;
use crate::grammar::Expr;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
pub struct AstCache {
    entries: RwLock<HashMap<String, Arc<Expr>>>,
    capacity: usize,
}

impl AstCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHED_EXPRESSIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.min(MAX_CACHED_EXPRESSIONS),
        }
    }

    pub fn get(&self, normalized: &str) -> Option<Arc<Expr>> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(normalized).cloned()
    }

    /// Store `expr` unless the cache is full; returns the shared tree either way
    pub fn insert(&self, normalized: &str, expr: Expr) -> Arc<Expr> {
        let expr = Arc::new(expr);
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = entries.get(normalized) {
            return existing.clone();
        }
        if entries.len() < self.capacity {
            entries.insert(normalized.to_string(), expr.clone());
        }
        expr
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AstCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_read_through() {
        let cache = AstCache::new();
        assert!(cache.get("a OR b").is_none());

        let stored = cache.insert("a OR b", Expr::or(Expr::variable("a"), Expr::variable("b")));
        let fetched = cache.get("a OR b").unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = AstCache::new();
        let first = cache.insert("k", Expr::Literal(true));
        let second = cache.insert("k", Expr::Literal(false));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*cache.get("k").unwrap(), Expr::Literal(true));
    }

    #[test]
    fn test_full_cache_stops_storing() {
        let cache = AstCache::with_capacity(2);
        cache.insert("a", Expr::variable("a"));
        cache.insert("b", Expr::variable("b"));
        let overflow = cache.insert("c", Expr::variable("c"));

        assert_eq!(*overflow, Expr::variable("c"));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("c").is_none());
    }

    #[test]
    fn test_concurrent_lookups() {
        let cache = Arc::new(AstCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let key = format!("v{}", i % 2);
                    cache.insert(&key, Expr::variable(key.as_str()));
                    cache.get(&key).is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cache.len(), 2);
    }
}
