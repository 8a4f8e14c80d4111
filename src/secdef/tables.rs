//! Aggregate Tables
//!
//! The three stores filled by a pass: two seeded count tables and the
//! name-to-expiration table. All keep a deterministic presentation order.

use super::config::{SecdefConfig, UnknownKeyPolicy};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Result of incrementing a count table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    /// Key was already present
    Counted,
    /// Key was unknown and has been added with a count of 1
    Extended,
    /// Key was unknown and the table was left untouched
    Skipped,
}

impl Increment {
    pub fn applied(&self) -> bool {
        !matches!(self, Increment::Skipped)
    }
}

/// Counts per code, seeded with a known key set
///
/// Iteration yields seeded keys in seed order, then extended keys in the
/// order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    order: Vec<String>,
    counts: AHashMap<String, u64>,
}

impl CountTable {
    pub fn seeded<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut table = CountTable {
            order: Vec::with_capacity(keys.len()),
            counts: AHashMap::with_capacity(keys.len()),
        };
        for key in keys {
            let key = key.as_ref();
            if !table.counts.contains_key(key) {
                table.order.push(key.to_string());
                table.counts.insert(key.to_string(), 0);
            }
        }
        table
    }

    pub fn increment(&mut self, key: &str, policy: UnknownKeyPolicy) -> Increment {
        if let Some(count) = self.counts.get_mut(key) {
            *count += 1;
            return Increment::Counted;
        }
        match policy {
            UnknownKeyPolicy::Extend => {
                self.order.push(key.to_string());
                self.counts.insert(key.to_string(), 1);
                Increment::Extended
            }
            UnknownKeyPolicy::Skip => Increment::Skipped,
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(move |key| (key.as_str(), self.counts[key.as_str()]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Key-ordered copy, independent of the order keys were added in
    pub fn to_sorted_map(&self) -> BTreeMap<String, u64> {
        self.counts
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect()
    }
}

/// Instrument name to expiration token, last write wins
///
/// A name keeps the position of its first insertion when overwritten.
#[derive(Debug, Clone, Default)]
pub struct ExpirationTable {
    entries: Vec<(String, String)>,
    index: AHashMap<String, usize>,
}

impl ExpirationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expiration of `name`, returning the previous one if any
    pub fn insert(&mut self, name: &str, expiration: &str) -> Option<String> {
        if let Some(&slot) = self.index.get(name) {
            let previous = std::mem::replace(&mut self.entries[slot].1, expiration.to_string());
            return Some(previous);
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), expiration.to_string()));
        None
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, expiration)| (name.as_str(), expiration.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` entries with the lexically smallest expiration tokens
    ///
    /// The sort is stable: equal tokens keep first-insertion order.
    pub fn earliest(&self, limit: usize) -> Vec<(&str, &str)> {
        let mut sorted: Vec<(&str, &str)> = self.iter().collect();
        sorted.sort_by(|a, b| a.1.cmp(b.1));
        sorted.truncate(limit);
        sorted
    }
}

/// The three stores of one pass
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub security_types: CountTable,
    pub product_complexes: CountTable,
    pub expirations: ExpirationTable,
}

impl Aggregates {
    pub fn new(config: &SecdefConfig) -> Self {
        Aggregates {
            security_types: CountTable::seeded(config.security_types.as_slice()),
            product_complexes: CountTable::seeded(config.product_complexes.as_slice()),
            expirations: ExpirationTable::new(),
        }
    }
}
