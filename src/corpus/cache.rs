/*!
 * Clean-entry cache.
 *
 * A plain text file of `<entry> <hash>` lines recording pairs that last
 * checked clean. The hash covers the checker settings, both documents and
 * the plain-text translation when there is one, so editing any of them or
 * changing the configuration re-checks the pair.
 * Later lines for the same entry win.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use sha2::{Digest, Sha256};

use crate::file_utils::FileManager;

/// Hex digits kept from the SHA-256 digest
const HASH_LEN: usize = 8;

/// Short hash of a pair under a given settings fingerprint
pub fn pair_hash(fingerprint: &str, source: &[u8], target: &[u8]) -> String {
    entry_hash(fingerprint, source, target, None)
}

/// Short hash of a pair and its plain-text translation
pub fn entry_hash(fingerprint: &str, source: &[u8], target: &[u8], text: Option<&[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint.as_bytes());
    hasher.update(source);
    hasher.update(target);
    if let Some(text) = text {
        hasher.update(b"\0text\0");
        hasher.update(text);
    }
    let digest = hex::encode(hasher.finalize());
    digest[..HASH_LEN].to_string()
}

/// Record of pairs known to be clean
#[derive(Debug, Clone, Default)]
pub struct CleanCache {
    /// Backing file, none for an in-memory cache
    path: Option<PathBuf>,
    entries: HashMap<String, String>,
    fingerprint: String,
}

impl CleanCache {
    /// Cache that remembers nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Load the cache file; a missing file starts an empty cache
    pub fn load<P: AsRef<Path>>(path: P, fingerprint: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut entries = HashMap::new();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            for line in content.lines() {
                let mut parts = line.split_whitespace();
                if let (Some(entry), Some(hash)) = (parts.next(), parts.next()) {
                    entries.insert(entry.to_string(), hash.to_string());
                }
            }
        }

        debug!("Loaded {} clean cache entries from {:?}", entries.len(), path);
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
            fingerprint: fingerprint.to_string(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of a pair under this cache's fingerprint
    pub fn hash(&self, source: &[u8], target: &[u8], text: Option<&[u8]>) -> String {
        entry_hash(&self.fingerprint, source, target, text)
    }

    pub fn is_clean(&self, entry: &str, hash: &str) -> bool {
        self.is_enabled() && self.entries.get(entry).is_some_and(|h| h == hash)
    }

    /// Remember a clean pair, appending it to the cache file
    pub fn record_clean(&mut self, entry: &str, hash: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if self.entries.get(entry).is_some_and(|h| h == hash) {
            return Ok(());
        }

        FileManager::append_line(path, &format!("{} {}", entry, hash))?;
        self.entries.insert(entry.to_string(), hash.to_string());
        Ok(())
    }
}
