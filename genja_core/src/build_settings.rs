/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Root paths of a build and the conversions between path spaces.

use std::path::PathBuf;

use crate::paths::OutputFile;
use crate::paths::SourceDir;
use crate::paths::SourceFile;

/// The per-build settings every emitter needs: where the source tree lives
/// on disk and which source directory holds the build output.
///
/// The conversions here are total and deterministic; all manifest text that
/// mentions a path goes through them.
#[derive(Clone, Debug)]
pub struct BuildSettings {
    root_path: PathBuf,
    build_dir: SourceDir,
    /// `../../` repeated once per build-dir component; prepended to source
    /// paths to make them build-relative.
    to_source_prefix: String,
}

impl BuildSettings {
    pub fn new(root_path: PathBuf, build_dir: SourceDir) -> Self {
        let depth = build_dir
            .stripped()
            .split('/')
            .filter(|c| !c.is_empty())
            .count();
        BuildSettings {
            root_path,
            build_dir,
            to_source_prefix: "../".repeat(depth),
        }
    }

    pub fn root_path(&self) -> &PathBuf {
        &self.root_path
    }

    pub fn build_dir(&self) -> &SourceDir {
        &self.build_dir
    }

    /// Renders a source file the way a manifest in the build directory
    /// refers to it: `//foo/main.rs` becomes `../../foo/main.rs` (for a
    /// two-component build dir), files already under the build dir become
    /// plain build-relative paths, and system-absolute files stay absolute.
    pub fn build_relative(&self, file: &SourceFile) -> String {
        if let Some(rest) = file.as_str().strip_prefix(self.build_dir.as_str()) {
            return rest.to_owned();
        }
        match file.as_str().strip_prefix("//") {
            Some(rest) => format!("{}{}", self.to_source_prefix, rest),
            None => file.as_str().to_owned(),
        }
    }

    /// Same rendering for a directory, without a trailing slash:
    /// `//baz/` becomes `../../baz`.
    pub fn build_relative_dir(&self, dir: &SourceDir) -> String {
        if let Some(rest) = dir.as_str().strip_prefix(self.build_dir.as_str()) {
            return rest.strip_suffix('/').unwrap_or(rest).to_owned();
        }
        match dir.as_str().strip_prefix("//") {
            Some(rest) => {
                let rest = rest.strip_suffix('/').unwrap_or(rest);
                format!("{}{}", self.to_source_prefix, rest)
            }
            None => dir.as_str().strip_suffix('/').unwrap_or(dir.as_str()).to_owned(),
        }
    }

    /// A source file as an output-relative path.
    pub fn output_file(&self, file: &SourceFile) -> OutputFile {
        OutputFile::new(self.build_relative(file))
    }

    /// The on-disk location of a source file.
    pub fn full_path(&self, file: &SourceFile) -> PathBuf {
        match file.as_str().strip_prefix("//") {
            Some(rest) => self.root_path.join(rest),
            None => PathBuf::from(file.as_str()),
        }
    }

    /// The on-disk location of a file in the build directory.
    pub fn full_output_path(&self, file: &OutputFile) -> PathBuf {
        let build = self
            .build_dir
            .as_str()
            .trim_start_matches('/')
            .trim_end_matches('/');
        self.root_path
            .join(build)
            .join(file.as_str().trim_start_matches("./"))
    }
}
