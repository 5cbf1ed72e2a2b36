/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The writer orchestrator.
//!
//! Emission runs per toolchain: every resolved target becomes one fragment
//! (emitted through the pool, since fragments are independent), fragments
//! concatenate in label order into one manifest per toolchain, and a
//! top-level `build.ninja` loads them via `subninja`. A `build.ninja.d`
//! depfile names every source-tree file the generation read, so the
//! downstream executor knows when to regenerate. All files persist
//! write-if-changed.

use std::sync::Arc;

use anyhow::Context;
use genja_core::build_settings::BuildSettings;
use genja_core::label::Label;
use genja_core::paths::OutputFile;
use genja_core::paths::SourceFile;
use genja_node::graph::TargetGraph;
use genja_node::graph::TargetId;
use genja_node::toolchain::ToolchainId;
use indexmap::IndexMap;

use crate::emit_pool::EmitPool;
use crate::file_write::write_if_changed;
use crate::file_write::FileWriteCache;
use crate::ninja_target_writer::NinjaTargetWriter;
use crate::path_output::ninja_escape;

/// A target and the computed build rules for it.
pub type TargetRulePair = (TargetId, String);

/// The build rules of each toolchain's targets.
pub type PerToolchainRules = IndexMap<ToolchainId, Vec<TargetRulePair>>;

pub struct NinjaWriter;

impl NinjaWriter {
    /// Emits every resolved target and writes the per-toolchain manifests,
    /// `build.ninja`, and `build.ninja.d`.
    pub async fn run_and_write_files(
        graph: Arc<TargetGraph>,
        settings: Arc<BuildSettings>,
        pool: &EmitPool,
        input_files: &[SourceFile],
        cache: Arc<FileWriteCache>,
    ) -> anyhow::Result<()> {
        let per_toolchain = Self::emit_all(graph.clone(), settings.clone(), pool, cache.clone())
            .await
            .context("emitting target manifests")?;
        Self::write_files(&graph, &settings, &per_toolchain, input_files, &cache)
    }

    /// Runs every target through the pool, grouped by toolchain. Fragment
    /// order within a toolchain is label order, so the output is invariant
    /// under task completion order.
    pub async fn emit_all(
        graph: Arc<TargetGraph>,
        settings: Arc<BuildSettings>,
        pool: &EmitPool,
        cache: Arc<FileWriteCache>,
    ) -> anyhow::Result<PerToolchainRules> {
        let mut grouped: IndexMap<ToolchainId, Vec<(TargetId, Label)>> = IndexMap::new();
        for id in graph.ids_by_label() {
            let target = graph.target(id);
            let toolchain = match target.toolchain.or_else(|| graph.default_toolchain()) {
                Some(toolchain) => toolchain,
                None => {
                    return Err(anyhow::anyhow!(
                        "target `{}` has no toolchain and the graph has no default",
                        target.label
                    ))
                }
            };
            grouped
                .entry(toolchain)
                .or_insert_with(Vec::new)
                .push((id, target.label.clone()));
        }
        grouped.sort_by(|a, _, b, _| graph.toolchain(*a).label.cmp(&graph.toolchain(*b).label));

        let mut per_toolchain: PerToolchainRules = IndexMap::new();
        for (toolchain, targets) in grouped {
            let mut by_label: IndexMap<Label, TargetId> = IndexMap::new();
            let mut units: Vec<(Label, Box<dyn FnOnce() -> anyhow::Result<String> + Send>)> =
                Vec::new();
            for (id, label) in targets {
                by_label.insert(label.clone(), id);
                let graph = graph.clone();
                let settings = settings.clone();
                let cache = cache.clone();
                units.push((
                    label,
                    Box::new(move || {
                        NinjaTargetWriter::run_and_write(&graph, &settings, id, &cache)
                    }),
                ));
            }
            let results = pool.run(units).await?;
            let rules: Vec<TargetRulePair> = results
                .into_iter()
                .filter_map(|(label, fragment)| {
                    by_label.get(&label).map(|id| (*id, fragment))
                })
                .collect();
            per_toolchain.insert(toolchain, rules);
        }
        Ok(per_toolchain)
    }

    /// Writes one manifest per toolchain, the top-level `build.ninja`, and
    /// the regeneration depfile.
    pub fn write_files(
        graph: &TargetGraph,
        settings: &BuildSettings,
        per_toolchain: &PerToolchainRules,
        input_files: &[SourceFile],
        cache: &FileWriteCache,
    ) -> anyhow::Result<()> {
        let mut subninjas: Vec<OutputFile> = Vec::new();

        for (toolchain_id, rules) in per_toolchain {
            let file = Self::toolchain_manifest(graph, *toolchain_id);
            let mut contents = String::new();
            for (_, fragment) in rules {
                contents.push_str(fragment);
            }
            write_if_changed(
                &settings.full_output_path(&file),
                contents.as_bytes(),
                cache,
            )
            .with_context(|| format!("writing `{}`", file))?;
            subninjas.push(file);
        }

        let mut build_ninja = String::from("ninja_required_version = 1.7.2\n\n");
        for file in &subninjas {
            build_ninja.push_str("subninja ");
            build_ninja.push_str(&ninja_escape(file.as_str()));
            build_ninja.push('\n');
        }
        write_if_changed(
            &settings.full_output_path(&OutputFile::new("build.ninja")),
            build_ninja.as_bytes(),
            cache,
        )
        .context("writing `build.ninja`")?;

        let mut depfile = String::from("build.ninja:");
        for input in input_files {
            depfile.push(' ');
            depfile.push_str(&ninja_escape(&settings.build_relative(input)));
        }
        depfile.push('\n');
        write_if_changed(
            &settings.full_output_path(&OutputFile::new("build.ninja.d")),
            depfile.as_bytes(),
            cache,
        )
        .context("writing `build.ninja.d`")?;

        Ok(())
    }

    fn toolchain_manifest(graph: &TargetGraph, toolchain: ToolchainId) -> OutputFile {
        if graph.default_toolchain() == Some(toolchain) {
            OutputFile::new("toolchain.ninja")
        } else {
            OutputFile::new(format!(
                "toolchain_{}.ninja",
                graph.toolchain(toolchain).label.name()
            ))
        }
    }
}
