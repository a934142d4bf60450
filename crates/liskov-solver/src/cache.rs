//! Append-only resolution memo.
//!
//! Two logical stores keyed by the (actual, expected) descriptor pair: a
//! set of keys proven not convertible, and a map of keys to their resolved
//! result type. A key is resolved at most once, to exactly one outcome;
//! once recorded it is never revised. Concurrent resolutions of the same
//! key compute equal outcomes, so a lost write race is benign — the loser
//! reads back the winner's value on demand.

use dashmap::{DashMap, DashSet};
use liskov_model::TypeId;

/// Ordered (actual, expected) descriptor pair.
pub type ResolutionKey = (TypeId, TypeId);

/// Outcome of a variance resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No expected-compatible view of the actual type exists.
    NotConvertible,
    /// The most specific expected-compatible type the actual type can be
    /// viewed as.
    Convertible(TypeId),
}

impl Outcome {
    /// Whether the resolution succeeded.
    #[inline]
    pub fn is_convertible(self) -> bool {
        matches!(self, Outcome::Convertible(_))
    }

    /// The resolved result type, if convertible.
    #[inline]
    pub fn result_type(self) -> Option<TypeId> {
        match self {
            Outcome::Convertible(result) => Some(result),
            Outcome::NotConvertible => None,
        }
    }
}

/// Cache population counts, for tests and diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionCacheStats {
    /// Keys proven not convertible.
    pub negative: usize,
    /// Keys with a recorded result type.
    pub positive: usize,
}

/// Process-wide memo of resolved outcomes.
///
/// Injectable service: construct once, share across resolver and converter
/// components; tests isolate themselves with a fresh instance. Entries are
/// published atomically once fully resolved and never evicted.
pub struct ResolutionCache {
    negative: DashSet<ResolutionKey>,
    positive: DashMap<ResolutionKey, TypeId>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            negative: DashSet::new(),
            positive: DashMap::new(),
        }
    }

    /// Recorded negative outcome for `key`, if any.
    pub fn is_negative(&self, key: ResolutionKey) -> bool {
        self.negative.contains(&key)
    }

    /// Recorded positive result for `key`, if any.
    pub fn positive(&self, key: ResolutionKey) -> Option<TypeId> {
        self.positive.get(&key).map(|r| *r)
    }

    /// Record that `key` is not convertible. Idempotent.
    pub fn record_negative(&self, key: ResolutionKey) {
        debug_assert!(
            self.positive(key).is_none(),
            "key already recorded as convertible"
        );
        self.negative.insert(key);
    }

    /// Record the resolved result for `key` and return the authoritative
    /// value (first write wins under contention; all writers compute equal
    /// results).
    pub fn record_positive(&self, key: ResolutionKey, result: TypeId) -> TypeId {
        debug_assert!(
            !self.is_negative(key),
            "key already recorded as not convertible"
        );
        *self.positive.entry(key).or_insert(result)
    }

    /// Population counts.
    pub fn stats(&self) -> ResolutionCacheStats {
        ResolutionCacheStats {
            negative: self.negative.len(),
            positive: self.positive.len(),
        }
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
