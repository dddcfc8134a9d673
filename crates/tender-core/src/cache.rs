//! Process-wide cache of loaded reference data.
//!
//! Entries are keyed by a [`SourceId`] derived from the source bytes and are
//! inserted at most once. Callers only ever receive shared `Arc` handles, so a
//! cached [`ReferenceData`] is never mutated or replaced.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::reference::ReferenceData;

/// Identity of one or more source files: hex SHA-256 over their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Identity of several sources taken together, in order.
    ///
    /// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ,
    /// and a missing part differs from an empty one.
    pub fn from_parts<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            match part {
                Some(bytes) => {
                    hasher.update([1u8]);
                    hasher.update((bytes.len() as u64).to_le_bytes());
                    hasher.update(bytes);
                }
                None => hasher.update([0u8]),
            }
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insert-once map from [`SourceId`] to shared reference data.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: Mutex<HashMap<SourceId, Arc<ReferenceData>>>,
}

static GLOBAL_CACHE: OnceLock<ReferenceCache> = OnceLock::new();

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static ReferenceCache {
        GLOBAL_CACHE.get_or_init(ReferenceCache::new)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SourceId, Arc<ReferenceData>>> {
        // Entries are never modified in place, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &SourceId) -> Option<Arc<ReferenceData>> {
        self.lock().get(id).cloned()
    }

    /// Returns the cached entry for `id`, loading and inserting it on first use.
    ///
    /// A failed load inserts nothing. The lock is held while loading, so
    /// concurrent callers for the same id never load twice.
    pub fn get_or_try_insert_with<E, F>(
        &self,
        id: SourceId,
        load: F,
    ) -> Result<Arc<ReferenceData>, E>
    where
        F: FnOnce() -> Result<ReferenceData, E>,
    {
        let mut entries = self.lock();
        if let Some(existing) = entries.get(&id) {
            debug!(source = %id, "reference cache hit");
            return Ok(Arc::clone(existing));
        }
        let data = Arc::new(load()?);
        debug!(source = %id, "reference cache insert");
        entries.insert(id, Arc::clone(&data));
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_is_hex_sha256() {
        let id = SourceId::from_bytes(b"abc");
        assert_eq!(
            id.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn parts_are_unambiguous() {
        let a = SourceId::from_parts([Some(&b"ab"[..]), Some(&b"c"[..])]);
        let b = SourceId::from_parts([Some(&b"a"[..]), Some(&b"bc"[..])]);
        let c = SourceId::from_parts([Some(&b"abc"[..]), None]);
        let d = SourceId::from_parts([Some(&b"abc"[..]), Some(&b""[..])]);
        assert_ne!(a, b);
        assert_ne!(c, d);
    }

    #[test]
    fn entries_are_inserted_once() {
        let cache = ReferenceCache::new();
        let id = SourceId::from_bytes(b"catalog");

        let first = cache
            .get_or_try_insert_with(id.clone(), || Ok::<_, ()>(ReferenceData::default()))
            .unwrap();
        let second = cache
            .get_or_try_insert_with(id.clone(), || -> Result<ReferenceData, ()> {
                panic!("loader must not run for a cached id")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_caches_nothing() {
        let cache = ReferenceCache::new();
        let id = SourceId::from_bytes(b"broken");
        let result = cache.get_or_try_insert_with(id.clone(), || Err("bad header"));
        assert_eq!(result.unwrap_err(), "bad header");
        assert!(cache.get(&id).is_none());
        assert!(cache.is_empty());
    }
}
