/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Target labels.
//!
//! A label identifies a target by the directory of its build file plus a
//! short name, optionally qualified by the toolchain the target is built
//! with: `//foo/bar:baz` or `//foo/bar:baz(//toolchain:msvc)`.
//!
//! Labels order lexicographically over `(dir, name, toolchain)` and are
//! immutable once constructed.

use std::fmt;

use thiserror::Error;

use crate::paths::SourceDir;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("empty label")]
    Empty,
    #[error("label `{0}` has an empty name")]
    EmptyName(String),
    #[error("label `{0}` has mismatched parentheses")]
    BadToolchain(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Label {
    dir: SourceDir,
    name: String,
    toolchain: Option<Box<Label>>,
}

impl Label {
    pub fn new<S: Into<String>>(dir: SourceDir, name: S) -> Self {
        Label {
            dir,
            name: name.into(),
            toolchain: None,
        }
    }

    pub fn with_toolchain<S: Into<String>>(dir: SourceDir, name: S, toolchain: Label) -> Self {
        Label {
            dir,
            name: name.into(),
            toolchain: Some(Box::new(toolchain)),
        }
    }

    pub fn dir(&self) -> &SourceDir {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toolchain(&self) -> Option<&Label> {
        self.toolchain.as_deref()
    }

    /// `//foo:bar`, or `//foo:bar(//tc:default)` when `include_toolchain`
    /// is set and the label carries one.
    pub fn user_visible_name(&self, include_toolchain: bool) -> String {
        let dir = self.dir.as_str().strip_suffix('/').unwrap_or(self.dir.as_str());
        match (&self.toolchain, include_toolchain) {
            (Some(tc), true) => format!("{}:{}({})", dir, self.name, tc.user_visible_name(false)),
            _ => format!("{}:{}", dir, self.name),
        }
    }

    /// Resolves a label string the way it appears in build files, relative
    /// to `current_dir`. Accepted forms: `//abs/dir:name`, `//abs/dir`
    /// (name defaults to the last dir component), `:name` (same dir),
    /// `rel/dir:name`, `rel/dir`, and any of those followed by
    /// `(//toolchain:label)`. A label without an explicit toolchain inherits
    /// `default_toolchain`.
    pub fn resolve(
        input: &str,
        current_dir: &SourceDir,
        default_toolchain: Option<&Label>,
    ) -> Result<Label, LabelError> {
        if input.is_empty() {
            return Err(LabelError::Empty);
        }

        let (body, toolchain) = match input.strip_suffix(')') {
            Some(rest) => match rest.find('(') {
                Some(idx) => {
                    let tc = Label::resolve(&rest[idx + 1..], current_dir, None)?;
                    (&rest[..idx], Some(Box::new(tc)))
                }
                None => return Err(LabelError::BadToolchain(input.to_owned())),
            },
            None => (
                input,
                default_toolchain.map(|tc| Box::new(tc.clone())),
            ),
        };

        if body.contains(|c| c == '(' || c == ')') {
            return Err(LabelError::BadToolchain(input.to_owned()));
        }

        let (dir_part, name_part) = match body.find(':') {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };

        let dir = if dir_part.is_empty() {
            current_dir.clone()
        } else if dir_part.starts_with("//") || dir_part.starts_with('/') {
            SourceDir::new(dir_part)
        } else {
            SourceDir::new(current_dir.resolve_relative(dir_part).as_str())
        };

        let name = match name_part {
            Some("") => return Err(LabelError::EmptyName(input.to_owned())),
            Some(name) => name.to_owned(),
            None => {
                // `//foo/bar` names the target `bar` inside `//foo/bar/`.
                let last = dir.stripped().rsplit('/').next().unwrap_or("");
                if last.is_empty() {
                    return Err(LabelError::EmptyName(input.to_owned()));
                }
                last.to_owned()
            }
        };

        Ok(Label { dir, name, toolchain })
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_visible_name(true))
    }
}
