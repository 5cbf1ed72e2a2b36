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
use genja_node::target::OutputType;

use crate::ninja_target_writer::NinjaTargetWriter;

/// Emits the dependency-preserving stamp for the action/copy/bundle family
/// and for non-Rust source sets: the declared outputs (or object files)
/// gated on the target's collected input deps. The tool command lines for
/// these kinds come from the front end's substitution machinery and are not
/// part of this writer family.
pub struct NinjaStampTargetWriter<'a> {
    base: NinjaTargetWriter<'a>,
}

impl<'a> NinjaStampTargetWriter<'a> {
    pub fn new(graph: &'a TargetGraph, settings: &'a BuildSettings, target_id: TargetId) -> Self {
        NinjaStampTargetWriter {
            base: NinjaTargetWriter::new(graph, settings, target_id),
        }
    }

    pub fn run(mut self) -> String {
        let mut order_only = self.base.write_input_deps_phony_and_get_dep(&[], 1);

        let graph = self.base.graph;
        let target = self.base.target;
        let settings = self.base.settings;

        let files: Vec<OutputFile> = match target.output_type {
            OutputType::SourceSet => target.object_files(),
            OutputType::Action | OutputType::ActionForeach | OutputType::CopyFiles => target
                .action_values
                .outputs
                .iter()
                .map(|output| settings.output_file(output))
                .collect(),
            _ => target
                .sources
                .iter()
                .map(|source| settings.output_file(source))
                .collect(),
        };

        order_only.extend(
            target
                .data_deps
                .iter()
                .filter_map(|pair| graph.target(pair.target).resolved().dependency_output.clone()),
        );

        self.base.write_stamp_for_target(&files, &order_only);
        self.base.out
    }
}
