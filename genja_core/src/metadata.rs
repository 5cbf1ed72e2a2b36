/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Metadata about a particular target.
//!
//! Metadata is a collection of keys and values relating to a particular
//! target. The keys generally fall into three categories: ordinary strings,
//! file names intended to be rebased against the directory the metadata was
//! declared in, and target labels acting as barriers during a metadata
//! walk. Which category a value belongs to is only known at walk time, so
//! verification happens there, not at creation.
//!
//! Every value must be a list: the walk concatenates values across targets.

use indexmap::IndexMap;

use crate::paths::SourceDir;
use crate::value::Value;
use crate::value::ValueKind;
use crate::value::ValueTypeMismatch;

#[derive(Debug, Default)]
pub struct Metadata {
    contents: IndexMap<String, Value>,
    source_dir: Option<SourceDir>,
}

/// The per-target result of one walk step: the values collected for the
/// data keys and the walk-key entries naming where to go next (`""` means
/// "continue through all deps").
#[derive(Debug, Default)]
pub struct WalkStep {
    pub values: Vec<Value>,
    pub next_walk_keys: Vec<String>,
}

impl Metadata {
    pub fn contents(&self) -> &IndexMap<String, Value> {
        &self.contents
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.contents.insert(key.into(), value);
    }

    pub fn source_dir(&self) -> Option<&SourceDir> {
        self.source_dir.as_ref()
    }

    pub fn set_source_dir(&mut self, dir: SourceDir) {
        self.source_dir = Some(dir);
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Collects the requested metadata from this instance.
    ///
    /// When `walk_keys` is empty the step asks to continue through all deps
    /// of the owning target; otherwise only the labels named under the walk
    /// keys are followed.
    pub fn walk_step(
        &self,
        data_keys: &[String],
        walk_keys: &[String],
        rebase_files: bool,
    ) -> Result<WalkStep, ValueTypeMismatch> {
        let mut step = WalkStep::default();

        for key in data_keys {
            let value = match self.contents.get(key) {
                Some(value) => value,
                None => continue,
            };
            for item in value.verify_list()? {
                if rebase_files {
                    if let (ValueKind::String(s), Some(dir)) = (item.kind(), &self.source_dir) {
                        let rebased = dir.resolve_relative(s);
                        let mut value = Value::string(rebased.as_str());
                        if let Some(origin) = item.origin() {
                            value = value.with_origin(origin.clone());
                        }
                        step.values.push(value);
                        continue;
                    }
                }
                step.values.push(item.clone());
            }
        }

        for key in walk_keys {
            match self.contents.get(key) {
                Some(value) => {
                    for item in value.verify_list()? {
                        step.next_walk_keys.push(item.verify_string()?.to_owned());
                    }
                }
                // A target that doesn't declare the walk key doesn't act as
                // a barrier; the walk continues through all of its deps.
                None => step.next_walk_keys.push(String::new()),
            }
        }

        if walk_keys.is_empty() {
            step.next_walk_keys.push(String::new());
        }

        Ok(step)
    }
}
