/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The base target writer: machinery shared by every per-output-kind
//! writer, and the dispatch that picks the right one.
//!
//! Binary targets are written to separate `.ninja` files so their shared
//! variables stay scoped to the file, and the dispatch returns a
//! `subninja` line for them; other target kinds return their rules inline.

use genja_core::build_settings::BuildSettings;
use genja_core::paths::OutputFile;
use genja_core::paths::SourceFile;
use genja_node::graph::TargetGraph;
use genja_node::graph::TargetId;
use genja_node::target::OutputType;
use genja_node::target::Target;
use thiserror::Error;

use crate::file_write::write_if_changed;
use crate::file_write::FileWriteCache;
use crate::ninja_generated_file_target_writer::NinjaGeneratedFileTargetWriter;
use crate::ninja_group_target_writer::NinjaGroupTargetWriter;
use crate::ninja_rust_binary_target_writer::NinjaRustBinaryTargetWriter;
use crate::ninja_stamp_target_writer::NinjaStampTargetWriter;
use crate::path_output::ninja_escape;
use crate::path_output::PathOutput;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("don't know how to write a manifest for `{label}` ({output_type:?} without Rust sources)")]
    UnsupportedTargetType {
        label: String,
        output_type: OutputType,
    },
}

/// Which shared substitution variables a target body references. Only the
/// referenced ones are written.
#[derive(Debug, Default)]
pub struct SubstitutionBits {
    pub label: bool,
    pub label_name: bool,
    pub label_no_toolchain: bool,
    pub root_gen_dir: bool,
    pub root_out_dir: bool,
    pub target_gen_dir: bool,
    pub target_out_dir: bool,
    pub target_output_name: bool,
}

pub struct NinjaTargetWriter<'a> {
    pub(crate) graph: &'a TargetGraph,
    pub(crate) settings: &'a BuildSettings,
    pub(crate) target_id: TargetId,
    pub(crate) target: &'a Target,
    pub(crate) path_output: PathOutput<'a>,
    pub(crate) out: String,
}

impl<'a> NinjaTargetWriter<'a> {
    pub fn new(graph: &'a TargetGraph, settings: &'a BuildSettings, target_id: TargetId) -> Self {
        NinjaTargetWriter {
            graph,
            settings,
            target_id,
            target: graph.target(target_id),
            path_output: PathOutput::new(settings),
            out: String::new(),
        }
    }

    /// Runs the writer matching the target's output kind. Binary targets
    /// land in their own `.ninja` file (written if changed) and the
    /// returned string is the `subninja` statement loading it; everything
    /// else returns its rules directly.
    pub fn run_and_write(
        graph: &TargetGraph,
        settings: &BuildSettings,
        target_id: TargetId,
        cache: &FileWriteCache,
    ) -> anyhow::Result<String> {
        let target = graph.target(target_id);
        tracing::debug!("Computing {}", target.label);

        match target.output_type {
            OutputType::Group => {
                Ok(NinjaGroupTargetWriter::new(graph, settings, target_id).run())
            }
            OutputType::GeneratedFile => {
                NinjaGeneratedFileTargetWriter::new(graph, settings, target_id).run(cache)
            }
            OutputType::CopyFiles
            | OutputType::Action
            | OutputType::ActionForeach
            | OutputType::BundleData
            | OutputType::CreateBundle => {
                Ok(NinjaStampTargetWriter::new(graph, settings, target_id).run())
            }
            OutputType::SourceSet if !target.rust_source_used() => {
                Ok(NinjaStampTargetWriter::new(graph, settings, target_id).run())
            }
            _ if target.is_rust_binary() => {
                let rules = NinjaRustBinaryTargetWriter::new(graph, settings, target_id).run();
                let ninja_file = OutputFile::new(format!(
                    "{}/{}.ninja",
                    target.target_out_dir(),
                    target.label.name()
                ));
                write_if_changed(
                    &settings.full_output_path(&ninja_file),
                    rules.as_bytes(),
                    cache,
                )?;
                Ok(format!("subninja {}\n", ninja_escape(ninja_file.as_str())))
            }
            output_type => Err(EmitError::UnsupportedTargetType {
                label: target.label.user_visible_name(true),
                output_type,
            }
            .into()),
        }
    }

    pub(crate) fn write_var(&mut self, name: &str, value: &str) {
        self.out.push_str(name);
        self.out.push_str(" = ");
        self.out.push_str(value);
        self.out.push('\n');
    }

    /// `name =` followed by one space-prefixed item each; the form list
    /// variables like rustflags take.
    pub(crate) fn write_list_var(&mut self, name: &str, items: &[String]) {
        self.out.push_str(name);
        self.out.push_str(" =");
        for item in items {
            self.out.push(' ');
            self.out.push_str(&ninja_escape(item));
        }
        self.out.push('\n');
    }

    /// Writes the referenced shared substitution variables. Returns whether
    /// anything was written; callers follow up with a blank line so the
    /// vars stay separate from the rules below.
    pub fn write_shared_vars(&mut self, bits: &SubstitutionBits) -> bool {
        let mut written_anything = false;
        let target = self.target;

        if bits.label {
            self.write_var("label", &target.label.user_visible_name(false));
            written_anything = true;
        }
        if bits.label_name {
            let name = target.label.name().to_owned();
            self.write_var("label_name", &name);
            written_anything = true;
        }
        if bits.label_no_toolchain {
            self.write_var("label_no_toolchain", &target.label.user_visible_name(false));
            written_anything = true;
        }
        if bits.root_gen_dir {
            self.write_var("root_gen_dir", "gen");
            written_anything = true;
        }
        if bits.root_out_dir {
            self.write_var("root_out_dir", ".");
            written_anything = true;
        }
        if bits.target_gen_dir {
            let dir = format!("gen/{}", target.label.dir().stripped());
            self.write_var("target_gen_dir", &dir);
            written_anything = true;
        }
        if bits.target_out_dir {
            let dir = target.target_out_dir();
            self.write_var("target_out_dir", &dir);
            written_anything = true;
        }
        if bits.target_output_name {
            let name = target.target_output_name();
            self.write_var("target_output_name", &name);
            written_anything = true;
        }

        written_anything
    }

    /// Collects the implicit input dependencies of the target and returns
    /// what build edges should depend on: nothing, a single input
    /// directly, the full list (when it would be referenced exactly once),
    /// or a `<name>.inputdeps` phony standing for all of them.
    pub fn write_input_deps_phony_and_get_dep(
        &mut self,
        additional_hard_deps: &[TargetId],
        num_output_uses: usize,
    ) -> Vec<OutputFile> {
        let target = self.target;

        let mut input_deps_sources: Vec<&SourceFile> = Vec::new();

        // Actions depend implicitly on their script.
        if matches!(
            target.output_type,
            OutputType::Action | OutputType::ActionForeach
        ) {
            if let Some(script) = &target.action_values.script {
                input_deps_sources.push(script);
            }
        }

        // Input files count only for non-binary targets; binary writers
        // depend on them through their own stamp.
        if !target.is_binary() {
            for input in &target.config_values.inputs {
                input_deps_sources.push(input);
            }
        }

        // An action runs its script once over all sources, so the sources
        // are inputs too. action_foreach handles sources per edge instead.
        if target.output_type == OutputType::Action {
            for source in &target.sources {
                input_deps_sources.push(source);
            }
        }

        let mut input_deps_targets: Vec<TargetId> = Vec::new();
        let hard_deps = &target.resolved().recursive_hard_deps;
        for &dep in hard_deps {
            // BUNDLE_DATA is data-only for everything except the
            // CREATE_BUNDLE that consumes it.
            if self.graph.target(dep).output_type != OutputType::BundleData
                || target.output_type == OutputType::CreateBundle
            {
                input_deps_targets.push(dep);
            }
        }
        for &dep in additional_hard_deps {
            if !hard_deps.contains(&dep) {
                input_deps_targets.push(dep);
            }
        }
        if let Some(toolchain) = target.toolchain {
            for pair in &self.graph.toolchain(toolchain).deps {
                input_deps_targets.push(pair.target);
            }
        }

        if input_deps_sources.is_empty() && input_deps_targets.is_empty() {
            return Vec::new();
        }

        // A single input is cheaper to depend on directly than through a
        // phony.
        if input_deps_sources.len() == 1 && input_deps_targets.is_empty() {
            return vec![self.settings.output_file(input_deps_sources[0])];
        }
        if input_deps_sources.is_empty() && input_deps_targets.len() == 1 {
            return match &self
                .graph
                .target(input_deps_targets[0])
                .resolved()
                .dependency_output
            {
                Some(dep) => vec![dep.clone()],
                None => Vec::new(),
            };
        }

        let mut outs: Vec<OutputFile> = Vec::new();
        for source in &input_deps_sources {
            outs.push(self.settings.output_file(source));
        }
        // Target inputs sort by label so the phony is deterministic.
        input_deps_targets
            .sort_by(|a, b| self.graph.target(*a).label.cmp(&self.graph.target(*b).label));
        for dep in input_deps_targets {
            if let Some(out) = &self.graph.target(dep).resolved().dependency_output {
                outs.push(out.clone());
            }
        }

        // Referenced once: depend on the inputs directly, skip the phony.
        if num_output_uses == 1 {
            return outs;
        }

        let phony = OutputFile::new(format!(
            "{}/{}.inputdeps",
            target.target_out_dir(),
            target.label.name()
        ));
        self.out.push_str("build ");
        self.path_output.write_output_file(&mut self.out, &phony);
        self.out.push_str(": phony");
        self.path_output.write_output_files(&mut self.out, &outs);
        self.out.push('\n');
        vec![phony]
    }

    /// Writes the stamp edge dependents of this target wait on; the stamp
    /// plays the grouping role of a phony.
    pub fn write_stamp_for_target(&mut self, files: &[OutputFile], order_only: &[OutputFile]) {
        let stamp = self.target.stamp_output();
        self.out.push_str("build ");
        self.path_output.write_output_file(&mut self.out, &stamp);
        self.out.push_str(": stamp");
        self.path_output.write_output_files(&mut self.out, files);
        if !order_only.is_empty() {
            self.out.push_str(" ||");
            self.path_output.write_output_files(&mut self.out, order_only);
        }
        self.out.push('\n');
    }
}
