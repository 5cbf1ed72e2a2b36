/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Arena storage for the target graph.
//!
//! Targets live in a single owning arena and refer to each other by
//! [`TargetId`]; the label index is a functional mapping (one label, one
//! target). Ids are only ever minted by [`TargetGraph::add_target`], so
//! indexing with them cannot fail.

use std::collections::HashMap;

use gazebo::dupe::Dupe;
use genja_core::label::Label;
use thiserror::Error;

use crate::target::Target;
use crate::toolchain::Toolchain;
use crate::toolchain::ToolchainId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate target label `{0}`")]
    DuplicateLabel(Label),
    #[error("unresolved label `{0}`")]
    UnresolvedLabel(Label),
}

#[derive(Clone, Copy, Debug, Dupe, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TargetId(u32);

impl TargetId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct TargetGraph {
    targets: Vec<Target>,
    by_label: HashMap<Label, TargetId>,
    toolchains: Vec<Toolchain>,
    default_toolchain: Option<ToolchainId>,
}

impl TargetGraph {
    pub fn new() -> Self {
        TargetGraph::default()
    }

    pub fn add_target(&mut self, target: Target) -> Result<TargetId, GraphError> {
        if self.by_label.contains_key(&target.label) {
            return Err(GraphError::DuplicateLabel(target.label.clone()));
        }
        let id = TargetId(self.targets.len() as u32);
        self.by_label.insert(target.label.clone(), id);
        self.targets.push(target);
        Ok(id)
    }

    pub fn target(&self, id: TargetId) -> &Target {
        &self.targets[id.0 as usize]
    }

    /// Mutable access for graph construction. Derived state is only ever
    /// written through `resolve_all`.
    pub fn target_mut(&mut self, id: TargetId) -> &mut Target {
        &mut self.targets[id.0 as usize]
    }

    pub fn lookup(&self, label: &Label) -> Option<TargetId> {
        self.by_label.get(label).copied()
    }

    pub fn lookup_required(&self, label: &Label) -> Result<TargetId, GraphError> {
        self.lookup(label)
            .ok_or_else(|| GraphError::UnresolvedLabel(label.clone()))
    }

    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(idx, target)| (TargetId(idx as u32), target))
    }

    /// All target ids sorted by label; the deterministic iteration order
    /// for error reporting and manifest concatenation.
    pub fn ids_by_label(&self) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = self.targets().map(|(id, _)| id).collect();
        ids.sort_by(|a, b| self.target(*a).label.cmp(&self.target(*b).label));
        ids
    }

    pub fn add_toolchain(&mut self, toolchain: Toolchain) -> ToolchainId {
        let id = ToolchainId(self.toolchains.len() as u32);
        self.toolchains.push(toolchain);
        id
    }

    pub fn toolchain(&self, id: ToolchainId) -> &Toolchain {
        &self.toolchains[id.0 as usize]
    }

    pub fn toolchains(&self) -> impl Iterator<Item = (ToolchainId, &Toolchain)> {
        self.toolchains
            .iter()
            .enumerate()
            .map(|(idx, toolchain)| (ToolchainId(idx as u32), toolchain))
    }

    pub fn set_default_toolchain(&mut self, id: ToolchainId) {
        self.default_toolchain = Some(id);
    }

    pub fn default_toolchain(&self) -> Option<ToolchainId> {
        self.default_toolchain
    }
}
