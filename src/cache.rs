// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Reader/writer-locked cache shared by the session and proxy stores.
//!
//! Both gateway caches follow the same discipline: concurrent readers when an
//! entry is present and valid, an exclusive lock for population, and lazy
//! eviction by overwrite. This module isolates that discipline so the two
//! callers only differ in how they populate:
//!
//! - [`create`](SharedCache::create) constructs under the exclusive lock
//!   without re-checking the entry. Two concurrent misses may both construct;
//!   the later write wins. Used by the session cache, where every validly
//!   constructed value is usable and the race only wastes one construction.
//! - [`get_or_create`](SharedCache::get_or_create) re-checks under the
//!   exclusive lock before constructing. Used by the proxy cache, where
//!   construction costs an administrative API round trip.
//!
//! The factory future runs while the exclusive lock is held, so a factory
//! that touches another `SharedCache` nests that cache's locks inside this
//! one's write lock. Callers must keep a consistent acquisition order.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tokio::sync::RwLock;

pub struct SharedCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached entry for `key` if it satisfies `valid`.
    ///
    /// An invalid entry is treated as a miss and left in place; the next
    /// populating write overwrites it.
    pub async fn get_if<P>(&self, key: &K, valid: P) -> Option<V>
    where
        P: Fn(&V) -> bool,
    {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) if valid(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Constructs a new entry under the exclusive lock and stores it,
    /// overwriting any existing entry. Last writer wins.
    pub async fn create<F, Fut, E>(&self, key: K, factory: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut entries = self.entries.write().await;
        let value = factory().await?;
        entries.insert(key, value.clone());
        Ok(value)
    }

    /// Re-checks `key` under the exclusive lock, then constructs and stores
    /// an entry if none valid is present.
    pub async fn get_or_create<P, F, Fut, E>(&self, key: K, valid: P, factory: F) -> Result<V, E>
    where
        P: Fn(&V) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut entries = self.entries.write().await;
        if let Some(value) = entries.get(&key)
            && valid(value)
        {
            return Ok(value.clone());
        }
        let value = factory().await?;
        entries.insert(key, value.clone());
        Ok(value)
    }

    /// Removes the entry for `key`, returning it if present.
    pub async fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().await;
        entries.remove(key)
    }
}
