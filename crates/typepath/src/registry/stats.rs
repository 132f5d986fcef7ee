//! Registry counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, shared by clones of a registry.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) registrations: AtomicU64,
    pub(crate) paths_added: AtomicU64,
    pub(crate) paths_replaced: AtomicU64,
    pub(crate) lookups: AtomicU64,
    pub(crate) direct_hits: AtomicU64,
    pub(crate) null_fallbacks: AtomicU64,
    pub(crate) ancestor_walks: AtomicU64,
    pub(crate) memoized: AtomicU64,
    pub(crate) misses: AtomicU64,
}

pub(crate) fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl Counters {
    pub(crate) fn snapshot(&self) -> RegistryStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        RegistryStats {
            registrations: load(&self.registrations),
            paths_added: load(&self.paths_added),
            paths_replaced: load(&self.paths_replaced),
            lookups: load(&self.lookups),
            direct_hits: load(&self.direct_hits),
            null_fallbacks: load(&self.null_fallbacks),
            ancestor_walks: load(&self.ancestor_walks),
            memoized: load(&self.memoized),
            misses: load(&self.misses),
        }
    }
}

/// Point-in-time view of a registry's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Calls to `register`, including built-ins
    pub registrations: u64,

    /// Keys added to the path table
    pub paths_added: u64,

    /// Stored converters displaced by a strictly shorter one
    pub paths_replaced: u64,

    /// Calls to `get`
    pub lookups: u64,

    /// Lookups answered straight from the path table
    pub direct_hits: u64,

    /// Lookups from `Void` answered with the null converter
    pub null_fallbacks: u64,

    /// Lookups that had to walk the source type's supertypes
    pub ancestor_walks: u64,

    /// Converters found through supertypes and stored under the requested key
    pub memoized: u64,

    /// Lookups that found nothing
    pub misses: u64,
}
