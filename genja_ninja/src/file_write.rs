/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Write-if-changed persistence.
//!
//! Fragments are buffered fully in memory, compared against what is on
//! disk, and written (atomically, via a temp file and rename) only on
//! mismatch. Downstream incremental tools then see stable timestamps for
//! unchanged manifests. A process-wide content-hash cache skips the disk
//! read for paths written earlier in the same run.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;

#[derive(Debug, Default)]
pub struct FileWriteCache {
    hashes: Mutex<HashMap<PathBuf, u64>>,
}

impl FileWriteCache {
    pub fn new() -> Self {
        FileWriteCache::default()
    }

    fn known_hash(&self, path: &Path) -> Option<u64> {
        self.hashes.lock().ok()?.get(path).copied()
    }

    fn record(&self, path: &Path, hash: u64) {
        if let Ok(mut hashes) = self.hashes.lock() {
            hashes.insert(path.to_path_buf(), hash);
        }
    }
}

fn content_hash(contents: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    contents.hash(&mut hasher);
    hasher.finish()
}

/// Writes `contents` to `path` unless the file already holds exactly those
/// bytes. Returns whether a write happened.
pub fn write_if_changed(
    path: &Path,
    contents: &[u8],
    cache: &FileWriteCache,
) -> anyhow::Result<bool> {
    let hash = content_hash(contents);
    if cache.known_hash(path) == Some(hash) {
        return Ok(false);
    }
    if let Ok(existing) = fs::read(path) {
        if existing == contents {
            cache.record(path, hash);
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory `{}`", parent.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).with_context(|| format!("writing `{}`", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming `{}` into place", tmp.display()))?;
    cache.record(path, hash);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_once_and_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sub/build.ninja");
        let cache = FileWriteCache::new();

        assert!(write_if_changed(&path, b"rule one\n", &cache)?);
        assert_eq!(fs::read(&path)?, b"rule one\n");

        // Same contents: no write, with or without the cache warm.
        assert!(!write_if_changed(&path, b"rule one\n", &cache)?);
        assert!(!write_if_changed(&path, b"rule one\n", &FileWriteCache::new())?);

        // Changed contents write again.
        assert!(write_if_changed(&path, b"rule two\n", &cache)?);
        assert_eq!(fs::read(&path)?, b"rule two\n");
        Ok(())
    }
}
