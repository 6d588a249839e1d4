//! Single-slot cache of the last resolved type.
//!
//! The hover path consults this before issuing a query so that hovering over
//! an unchanged selection does not round-trip to the language server. The
//! cache is advisory: concurrent resolutions race and the last writer wins.

use std::sync::Mutex;

use crate::range::SourceRange;
use crate::resolver::TypeCandidate;

/// The most recently resolved `(range, type)` pair.
///
/// Range and type are stored together under one lock so they are never
/// observed out of step.
#[derive(Debug, Default)]
pub struct LastResultCache {
    entry: Mutex<CacheEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CacheEntry {
    range: SourceRange,
    type_string: String,
}

impl LastResultCache {
    /// Create a cache holding the blank range and an empty type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached entry.
    pub fn write(&self, range: SourceRange, type_string: impl Into<String>) {
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        *entry = CacheEntry {
            range,
            type_string: type_string.into(),
        };
    }

    /// Read the cached entry.
    pub fn read(&self) -> (SourceRange, String) {
        let entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        (entry.range, entry.type_string.clone())
    }

    /// The cached pair if it was resolved for exactly `range` and carries a type.
    pub fn lookup(&self, range: &SourceRange) -> Option<TypeCandidate> {
        let entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        (!entry.type_string.is_empty() && entry.range == *range)
            .then(|| TypeCandidate::new(entry.range, entry.type_string.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_blank() {
        let cache = LastResultCache::new();
        assert_eq!(cache.read(), (SourceRange::default(), String::new()));
    }

    #[test]
    fn write_overwrites_both_fields() {
        let cache = LastResultCache::new();
        cache.write(SourceRange::new(2, 4, 2, 10), "Int");
        cache.write(SourceRange::new(3, 0, 3, 1), "Bool");
        assert_eq!(
            cache.read(),
            (SourceRange::new(3, 0, 3, 1), "Bool".to_string())
        );
    }

    #[test]
    fn lookup_requires_equal_range() {
        let cache = LastResultCache::new();
        cache.write(SourceRange::new(2, 4, 2, 10), "Int");

        assert_eq!(
            cache.lookup(&SourceRange::new(2, 4, 2, 10)),
            Some(TypeCandidate::new(SourceRange::new(2, 4, 2, 10), "Int"))
        );
        // Contained but not equal
        assert_eq!(cache.lookup(&SourceRange::new(2, 5, 2, 9)), None);
    }

    #[test]
    fn blank_entry_never_hits() {
        let cache = LastResultCache::new();
        assert_eq!(cache.lookup(&SourceRange::default()), None);
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let cache = std::sync::Arc::new(LastResultCache::new());
        let poisoner = cache.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entry.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        cache.write(SourceRange::new(0, 0, 0, 1), "a");
        assert_eq!(cache.read().1, "a");
    }
}
