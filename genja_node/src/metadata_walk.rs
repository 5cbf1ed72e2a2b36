/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Collects metadata values across the dependency graph.
//!
//! The walk starts from a seed set, gathers the values under `data_keys`
//! at every visited target, and recurses according to `walk_keys`: a walk
//! key whose value names dependency labels restricts the walk to exactly
//! those deps (a barrier), the empty string continues through all deps,
//! and an empty `walk_keys` list walks everything. Each target is visited
//! once, in depth-first first-visit order.

use genja_core::label::Label;
use genja_core::label::LabelError;
use genja_core::value::Value;
use genja_core::value::ValueTypeMismatch;
use indexmap::IndexSet;
use thiserror::Error;

use crate::graph::TargetGraph;
use crate::graph::TargetId;

#[derive(Debug, Error)]
pub enum MetadataWalkError {
    #[error("I was expecting {walk_target} to be a dependency of {from}. Make sure it's included in the deps or data_deps.")]
    NotADependency { walk_target: String, from: String },
    #[error(transparent)]
    Type(#[from] ValueTypeMismatch),
    #[error(transparent)]
    Label(#[from] LabelError),
}

#[derive(Debug, Default)]
pub struct MetadataWalk {
    pub values: Vec<Value>,
    /// Every target the walk reached, in first-visit order.
    pub visited: Vec<TargetId>,
}

pub fn walk_metadata(
    graph: &TargetGraph,
    seeds: &[TargetId],
    data_keys: &[String],
    walk_keys: &[String],
    rebase_files: bool,
) -> Result<MetadataWalk, MetadataWalkError> {
    let mut visited: IndexSet<TargetId> = IndexSet::new();
    let mut values = Vec::new();
    for &seed in seeds {
        walk_one(
            graph,
            seed,
            data_keys,
            walk_keys,
            rebase_files,
            &mut visited,
            &mut values,
        )?;
    }
    Ok(MetadataWalk {
        values,
        visited: visited.into_iter().collect(),
    })
}

fn walk_one(
    graph: &TargetGraph,
    id: TargetId,
    data_keys: &[String],
    walk_keys: &[String],
    rebase_files: bool,
    visited: &mut IndexSet<TargetId>,
    values: &mut Vec<Value>,
) -> Result<(), MetadataWalkError> {
    if !visited.insert(id) {
        return Ok(());
    }
    let target = graph.target(id);
    let step = target
        .metadata
        .walk_step(data_keys, walk_keys, rebase_files)?;
    values.extend(step.values);

    for next in step.next_walk_keys {
        if next.is_empty() {
            for pair in target.all_deps() {
                walk_one(
                    graph,
                    pair.target,
                    data_keys,
                    walk_keys,
                    rebase_files,
                    visited,
                    values,
                )?;
            }
            continue;
        }
        let label = Label::resolve(&next, target.label.dir(), target.label.toolchain())?;
        match target.all_deps().find(|pair| pair.label == label) {
            Some(pair) => walk_one(
                graph,
                pair.target,
                data_keys,
                walk_keys,
                rebase_files,
                visited,
                values,
            )?,
            None => {
                return Err(MetadataWalkError::NotADependency {
                    walk_target: next,
                    from: target.label.user_visible_name(false),
                })
            }
        }
    }
    Ok(())
}
