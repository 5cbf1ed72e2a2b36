/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use derive_more::Display;

use crate::paths::SourceFile;

/// A directory in source space.
///
/// Source-absolute dirs are written `//foo/bar/`, system-absolute dirs
/// `/usr/lib/`. The stored string always ends in a slash; `new` normalizes.
#[derive(Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SourceDir(String);

impl SourceDir {
    pub fn new<S: Into<String>>(s: S) -> Self {
        let mut value = s.into();
        if !value.ends_with('/') {
            value.push('/');
        }
        SourceDir(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_source_absolute(&self) -> bool {
        self.0.starts_with("//")
    }

    /// The path without the leading `//` and without the trailing slash,
    /// e.g. `foo/bar` for `//foo/bar/`. Used to build `obj/foo/bar` style
    /// output dirs.
    pub fn stripped(&self) -> &str {
        let s = self.0.trim_start_matches('/');
        s.strip_suffix('/').unwrap_or(s)
    }

    /// Resolves a possibly-relative path string against this directory,
    /// producing a source file. Absolute inputs (`//...` or `/...`) pass
    /// through unchanged; `.` and `..` components are normalized away.
    pub fn resolve_relative(&self, path: &str) -> SourceFile {
        if path.starts_with("//") || path.starts_with('/') {
            return SourceFile::new(path);
        }
        let prefix = if self.is_source_absolute() { "//" } else { "/" };
        let mut components: Vec<&str> = self
            .0
            .trim_start_matches('/')
            .split('/')
            .filter(|c| !c.is_empty())
            .collect();
        for component in path.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    components.pop();
                }
                c => components.push(c),
            }
        }
        SourceFile::new(format!("{}{}", prefix, components.join("/")))
    }
}
