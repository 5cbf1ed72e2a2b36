/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use derive_more::Display;

use crate::paths::SourceDir;

/// A file in source space: `//foo/main.rs` or system-absolute `/usr/x.h`.
#[derive(Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SourceFile(String);

impl SourceFile {
    pub fn new<S: Into<String>>(s: S) -> Self {
        SourceFile(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_source_absolute(&self) -> bool {
        self.0.starts_with("//")
    }

    /// The containing directory, e.g. `//foo/` for `//foo/main.rs`.
    pub fn dir(&self) -> SourceDir {
        match self.0.rfind('/') {
            Some(idx) => SourceDir::new(&self.0[..=idx]),
            None => SourceDir::new("//"),
        }
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }
}
