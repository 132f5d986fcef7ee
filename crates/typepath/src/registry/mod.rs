//! Converter registry: shortest-path resolution between types.
//!
//! The registry keeps a [`PathTable`] holding, for every (from, to) pair it
//! knows a route for, the converter with the fewest hops. Registering a
//! converter stores it under its own key and every supertype of its target,
//! then extends existing routes through it in both directions. Lookups that
//! miss fall back to the supertypes of the source type and remember what they
//! find.
//!
//! # Examples
//!
//! ```rust
//! use typepath::Registry;
//! use typepath::types::Number;
//!
//! let registry = Registry::new();
//! registry.register_fn(|n: i64| Ok(n.to_string()));
//!
//! // i32 -> i64 -> String, chained on registration
//! registry.register_fn(|n: i32| Ok(i64::from(n)));
//! let converter = registry.get_typed::<i32, String>().unwrap();
//! assert_eq!(converter.links(), 2);
//!
//! // Built-in upcasts
//! assert!(registry.get_typed::<u8, Number>().is_some());
//! ```

mod builtins;
mod path_table;
mod stats;

pub use path_table::TypeKey;
pub use stats::RegistryStats;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::config::{BuiltinSet, RegistryConfig};
use crate::converter::{self, SharedConverter, chain, null_converter};
use crate::error::Result;
use crate::types::{Reflect, TypeToken};
use path_table::{Offer, PathTable};
use stats::{Counters, bump};

/// Thread-safe converter registry.
///
/// Cloning is cheap and clones share the same path table and counters.
#[derive(Clone)]
pub struct Registry {
    table: Arc<RwLock<PathTable>>,
    config: RegistryConfig,
    stats: Arc<Counters>,
}

impl Registry {
    /// Registry with the default configuration and built-in converters.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(RegistryConfig::default())
    }

    /// Registry with no converters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_config(RegistryConfig::default().with_builtins(BuiltinSet::none()))
    }

    /// Registry built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidConfig` if the configuration is invalid.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Create a new builder for configuring the registry
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub(crate) fn from_config(config: RegistryConfig) -> Self {
        let builtins = config.builtins;
        let registry = Self {
            table: Arc::new(RwLock::new(PathTable::default())),
            config,
            stats: Arc::new(Counters::default()),
        };
        builtins::install(&registry, builtins);
        registry
    }

    /// Register a converter.
    ///
    /// The converter is stored under its own key, under every supertype of
    /// its target except `Object`, and under the primitive counterpart of any
    /// boxed target. Its own key, and every other key it wins, is then
    /// extended into longer routes through existing converters. Registering a
    /// converter that is already stored changes nothing.
    pub fn register(&self, converter: SharedConverter) {
        bump(&self.stats.registrations);
        debug!(
            from = converter.from_type().name(),
            to = converter.to_type().name(),
            hops = converter.hops(),
            "registering converter"
        );

        let direct = TypeKey::new(converter.from_type(), converter.to_type());
        let mut table = self.write();
        for key in expanded_keys(converter.as_ref()) {
            // A kept direct key still gets routes through the new converter.
            if self.offer(&mut table, key, Arc::clone(&converter)) || key == direct {
                self.build_paths(&mut table, key, Arc::clone(&converter));
            }
        }
    }

    /// Register a typed closure as an `A -> B` converter.
    pub fn register_fn<A, B, F>(&self, f: F)
    where
        A: Reflect,
        B: Reflect,
        F: Fn(A) -> Result<B> + Send + Sync + 'static,
    {
        self.register(converter::from_fn(f));
    }

    /// Find the converter for `from -> to`.
    ///
    /// Returns the null converter for absent sources without an explicit
    /// default, and `None` when no route exists. Converters stored for a
    /// supertype of `from` are only used when they accept `from` (see
    /// [`Converter::accepts`](crate::Converter::accepts)).
    pub fn get(&self, from: TypeToken, to: TypeToken) -> Option<SharedConverter> {
        bump(&self.stats.lookups);
        let key = TypeKey::new(from, to);

        if let Some(found) = self.read().get(&key) {
            bump(&self.stats.direct_hits);
            return Some(Arc::clone(found));
        }

        if from.is_void() {
            bump(&self.stats.null_fallbacks);
            return Some(null_converter());
        }

        let mut table = self.write();
        if let Some(found) = table.get(&key) {
            bump(&self.stats.direct_hits);
            return Some(Arc::clone(found));
        }

        bump(&self.stats.ancestor_walks);
        let Some(found) = from
            .ancestors()
            .into_iter()
            .find_map(|ancestor| {
                table
                    .get(&TypeKey::new(ancestor, to))
                    .filter(|stored| stored.accepts(from))
                    .cloned()
            })
        else {
            bump(&self.stats.misses);
            trace!(%key, "no converter");
            return None;
        };

        if self.config.memoize_lookups && self.offer(&mut table, key, Arc::clone(&found)) {
            bump(&self.stats.memoized);
            debug!(%key, via = found.from_type().name(), "memoized supertype lookup");
            self.build_paths(&mut table, key, Arc::clone(&found));
        }
        Some(found)
    }

    /// Find the converter for `A -> B`.
    pub fn get_typed<A: Reflect, B: Reflect>(&self) -> Option<SharedConverter> {
        self.get(TypeToken::of::<A>(), TypeToken::of::<B>())
    }

    /// Whether the path table holds an entry for `key`.
    ///
    /// Unlike [`get`](Self::get) this neither walks supertypes nor records
    /// anything.
    #[must_use]
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.read().contains(key)
    }

    /// Number of keys in the path table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the path table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the path table, in first-insertion order of the keys.
    #[must_use]
    pub fn paths(&self) -> Vec<(TypeKey, SharedConverter)> {
        self.read()
            .iter()
            .map(|(key, converter)| (key, Arc::clone(converter)))
            .collect()
    }

    /// Snapshot of the activity counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.stats.snapshot()
    }

    /// Configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Extend routes through the converter just stored under `key`.
    ///
    /// Upstream: any stored `X -> Y` with `Y` usable as `key.from` yields
    /// `X -> key.to`. Downstream: any stored `Y -> Z` accepting `key.to`
    /// yields `key.from -> Z`. A converter is placed directly under a
    /// subtype's key only when it accepts that subtype's values, and two are
    /// chained only when the second accepts what the first produces. Every
    /// key a candidate wins is extended in turn, until nothing changes.
    fn build_paths(&self, table: &mut PathTable, key: TypeKey, converter: SharedConverter) {
        let mut pending = VecDeque::from([(key, converter)]);

        while let Some((key, converter)) = pending.pop_front() {
            let (from, to) = (key.from_type(), key.to_type());
            if from.is_void() {
                continue;
            }

            let entries: Vec<(TypeKey, SharedConverter)> = table
                .iter()
                .filter(|(existing, _)| !existing.from_type().is_void())
                .map(|(existing, stored)| (existing, Arc::clone(stored)))
                .collect();

            for (existing, stored) in entries {
                let (their_from, their_to) = (existing.from_type(), existing.to_type());

                if their_from != to
                    && from.is_assignable_from(their_to)
                    && converter.accepts(stored.to_type())
                {
                    let candidate = if from.is_assignable_from(their_from)
                        && converter.accepts(their_from)
                    {
                        Arc::clone(&converter)
                    } else {
                        chain(Arc::clone(&stored), Arc::clone(&converter))
                    };
                    let extended = TypeKey::new(their_from, to);
                    if self.extend(table, extended, &candidate) {
                        pending.push_back((extended, candidate));
                    }
                }

                if their_to != from
                    && their_from.is_assignable_from(to)
                    && stored.accepts(converter.to_type())
                {
                    let candidate = if their_from.is_assignable_from(from) && stored.accepts(from)
                    {
                        Arc::clone(&stored)
                    } else {
                        chain(Arc::clone(&converter), Arc::clone(&stored))
                    };
                    let extended = TypeKey::new(from, their_to);
                    if self.extend(table, extended, &candidate) {
                        pending.push_back((extended, candidate));
                    }
                }
            }
        }
    }

    fn extend(&self, table: &mut PathTable, key: TypeKey, candidate: &SharedConverter) -> bool {
        if candidate.links() > self.config.max_chain_length {
            trace!(
                %key,
                links = candidate.links(),
                max = self.config.max_chain_length,
                "chain too long"
            );
            return false;
        }
        self.offer(table, key, Arc::clone(candidate))
    }

    fn offer(&self, table: &mut PathTable, key: TypeKey, candidate: SharedConverter) -> bool {
        let hops = candidate.hops();
        let outcome = table.offer(key, candidate);
        match outcome {
            Offer::Added => {
                bump(&self.stats.paths_added);
                trace!(%key, hops, "path added");
            }
            Offer::Replaced { previous_hops } => {
                bump(&self.stats.paths_replaced);
                trace!(%key, hops, previous_hops, "path replaced");
            }
            Offer::Kept => {}
        }
        outcome.changed()
    }

    // The table is consistent after every single offer, so a panic while a
    // guard was held leaves nothing to repair.
    fn read(&self) -> RwLockReadGuard<'_, PathTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PathTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keys a converter is stored under: its own, one per supertype of its
/// target except `Object`, and the primitive counterpart of each boxed target.
fn expanded_keys(converter: &dyn converter::Converter) -> Vec<TypeKey> {
    let from = converter.from_type();
    let to = converter.to_type();

    let mut targets = vec![to];
    targets.extend(to.ancestors().into_iter().filter(|t| !t.is_top()));

    let mut keys: Vec<TypeKey> = Vec::with_capacity(targets.len() * 2);
    for target in targets {
        for target in std::iter::once(target).chain(target.unboxed()) {
            let key = TypeKey::new(from, target);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("paths", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a `Registry`
#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    converters: Vec<SharedConverter>,
}

impl RegistryBuilder {
    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Longest chain, in direct converters, path building may create
    #[must_use]
    pub fn max_chain_length(mut self, max_chain_length: usize) -> Self {
        self.config.max_chain_length = max_chain_length;
        self
    }

    /// Store converters found through supertypes under the requested key
    #[must_use]
    pub fn memoize_lookups(mut self, memoize_lookups: bool) -> Self {
        self.config.memoize_lookups = memoize_lookups;
        self
    }

    /// Install numeric upcasts to `Number` (default: on)
    #[must_use]
    pub fn numeric_upcasts(mut self, enabled: bool) -> Self {
        self.config.builtins.numeric_upcasts = enabled;
        self
    }

    /// Install `Void` defaults for primitives (default: on)
    #[must_use]
    pub fn null_defaults(mut self, enabled: bool) -> Self {
        self.config.builtins.null_defaults = enabled;
        self
    }

    /// Install `String` parsers for primitives (default: off)
    #[must_use]
    pub fn string_parsing(mut self, enabled: bool) -> Self {
        self.config.builtins.string_parsing = enabled;
        self
    }

    /// Register a converter after the built-ins
    #[must_use]
    pub fn converter(mut self, converter: SharedConverter) -> Self {
        self.converters.push(converter);
        self
    }

    /// Build the registry
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidConfig` if the configuration is invalid.
    pub fn build(self) -> Result<Registry> {
        let registry = Registry::with_config(self.config)?;
        for converter in self.converters {
            registry.register(converter);
        }
        Ok(registry)
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field("converters", &self.converters)
            .finish()
    }
}
