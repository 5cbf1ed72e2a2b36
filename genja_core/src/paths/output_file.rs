/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use derive_more::Display;

/// A path relative to the build output directory.
///
/// A thin wrapper around a string; the wrapper exists so that output paths
/// cannot be confused with source paths at the type level.
#[derive(Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OutputFile(String);

impl OutputFile {
    pub fn new<S: Into<String>>(s: S) -> Self {
        OutputFile(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The containing directory: `obj/foo` for `obj/foo/libx.rlib`, `.` for
    /// `./libx.so`, and `.` for a bare file name. This is the form rustc
    /// search-path arguments want.
    pub fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) | None => ".",
            Some(idx) => &self.0[..idx],
        }
    }

    /// Appends a suffix to the path, e.g. turning a shared library into its
    /// table-of-contents file.
    pub fn with_suffix(&self, suffix: &str) -> OutputFile {
        OutputFile(format!("{}{}", self.0, suffix))
    }
}
