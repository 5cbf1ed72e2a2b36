/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use genja_core::label::Label;
use genja_core::paths::SourceDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("`{0}` is not visible to `{1}` (check the visibility list of `{0}`)")]
    NotVisibleTo(Label, Label),
}

/// One entry in a visibility list: an exact label or a directory subtree
/// wildcard (`//foo/*`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VisibilityPattern {
    Label(Label),
    DirPrefix(SourceDir),
}

impl VisibilityPattern {
    pub fn matches(&self, label: &Label) -> bool {
        match self {
            VisibilityPattern::Label(pattern) => {
                pattern.dir() == label.dir() && pattern.name() == label.name()
            }
            VisibilityPattern::DirPrefix(prefix) => label.dir().as_str().starts_with(prefix.as_str()),
        }
    }
}

/// The visibility spec of a target. Targets in the same directory always
/// see each other regardless of the spec.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Visibility {
    Public,
    /// A target that doesn't specify any visibility: visible to its own
    /// directory only.
    #[default]
    Default,
    VisibleTo(Vec<VisibilityPattern>),
}

impl Visibility {
    pub fn is_visible_to(&self, owner: &Label, consumer: &Label) -> bool {
        if owner.dir() == consumer.dir() {
            return true;
        }
        match self {
            Visibility::Public => true,
            Visibility::Default => false,
            Visibility::VisibleTo(patterns) => {
                patterns.iter().any(|pattern| pattern.matches(consumer))
            }
        }
    }
}
