/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Renders paths into Ninja text.
//!
//! Source files become build-relative (`../../foo/main.rs`), output files
//! are written as-is, and every token goes through Ninja escaping.

use std::borrow::Cow;

use genja_core::build_settings::BuildSettings;
use genja_core::paths::OutputFile;
use genja_core::paths::SourceFile;

/// Escapes a token for a Ninja build line: space, `$`, and `:` are the
/// significant characters.
pub fn ninja_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(|c| matches!(c, ' ' | '$' | ':')) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            ' ' => escaped.push_str("$ "),
            '$' => escaped.push_str("$$"),
            ':' => escaped.push_str("$:"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

pub struct PathOutput<'a> {
    settings: &'a BuildSettings,
}

impl<'a> PathOutput<'a> {
    pub fn new(settings: &'a BuildSettings) -> Self {
        PathOutput { settings }
    }

    pub fn write_source_file(&self, out: &mut String, file: &SourceFile) {
        out.push_str(&ninja_escape(&self.settings.build_relative(file)));
    }

    pub fn write_output_file(&self, out: &mut String, file: &OutputFile) {
        out.push_str(&ninja_escape(file.as_str()));
    }

    /// Writes each file preceded by a space, the form build lines want.
    pub fn write_output_files(&self, out: &mut String, files: &[OutputFile]) {
        for file in files {
            out.push(' ');
            self.write_output_file(out, file);
        }
    }
}
