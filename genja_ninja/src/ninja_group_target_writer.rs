/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use genja_core::build_settings::BuildSettings;
use genja_core::paths::OutputFile;
use genja_node::graph::TargetGraph;
use genja_node::graph::TargetId;

use crate::ninja_target_writer::NinjaTargetWriter;

/// A group has no primary output; it contributes a stamp gathering the
/// outputs of its deps, with data deps attached order-only.
pub struct NinjaGroupTargetWriter<'a> {
    base: NinjaTargetWriter<'a>,
}

impl<'a> NinjaGroupTargetWriter<'a> {
    pub fn new(graph: &'a TargetGraph, settings: &'a BuildSettings, target_id: TargetId) -> Self {
        NinjaGroupTargetWriter {
            base: NinjaTargetWriter::new(graph, settings, target_id),
        }
    }

    pub fn run(mut self) -> String {
        let graph = self.base.graph;
        let target = self.base.target;

        let files: Vec<OutputFile> = target
            .linked_deps()
            .filter_map(|pair| graph.target(pair.target).resolved().dependency_output.clone())
            .collect();
        let order_only: Vec<OutputFile> = target
            .data_deps
            .iter()
            .filter_map(|pair| graph.target(pair.target).resolved().dependency_output.clone())
            .collect();

        self.base.write_stamp_for_target(&files, &order_only);
        self.base.out
    }
}
