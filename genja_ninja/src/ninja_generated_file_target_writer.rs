/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Writes a `generated_file` target: runs the metadata walk (or takes the
//! literal contents), converts the collected values to text, persists the
//! file write-if-changed, and emits the stamp edge dependents wait on.

use anyhow::Context;
use genja_core::build_settings::BuildSettings;
use genja_core::paths::OutputFile;
use genja_core::value::Value;
use genja_core::value::ValueKind;
use genja_node::graph::TargetGraph;
use genja_node::graph::TargetId;
use genja_node::metadata_walk::walk_metadata;
use genja_node::target::OutputConversion;

use crate::file_write::write_if_changed;
use crate::file_write::FileWriteCache;
use crate::ninja_target_writer::NinjaTargetWriter;

pub struct NinjaGeneratedFileTargetWriter<'a> {
    base: NinjaTargetWriter<'a>,
}

impl<'a> NinjaGeneratedFileTargetWriter<'a> {
    pub fn new(graph: &'a TargetGraph, settings: &'a BuildSettings, target_id: TargetId) -> Self {
        NinjaGeneratedFileTargetWriter {
            base: NinjaTargetWriter::new(graph, settings, target_id),
        }
    }

    pub fn run(mut self, cache: &FileWriteCache) -> anyhow::Result<String> {
        let graph = self.base.graph;
        let target = self.base.target;
        let settings = self.base.settings;

        let spec = target
            .generated_file
            .as_ref()
            .with_context(|| format!("`{}` has no generated_file spec", target.label))?;

        let values = match &spec.contents {
            Some(contents) => vec![contents.clone()],
            None => {
                walk_metadata(
                    graph,
                    &[self.base.target_id],
                    &spec.data_keys,
                    &spec.walk_keys,
                    spec.rebase,
                )
                .with_context(|| format!("collecting metadata for `{}`", target.label))?
                .values
            }
        };
        let text = convert_output(&values, spec.output_conversion);

        let output = target
            .action_values
            .outputs
            .first()
            .with_context(|| format!("`{}` has no output file", target.label))?;
        write_if_changed(&settings.full_path(output), text.as_bytes(), cache)?;

        let files = vec![settings.output_file(output)];
        let order_only: Vec<OutputFile> = target
            .data_deps
            .iter()
            .filter_map(|pair| graph.target(pair.target).resolved().dependency_output.clone())
            .collect();
        self.base.write_stamp_for_target(&files, &order_only);
        Ok(self.base.out)
    }
}

fn convert_output(values: &[Value], conversion: OutputConversion) -> String {
    let mut text = String::new();
    for value in values {
        match conversion {
            OutputConversion::Value => {
                text.push_str(&value.to_string());
                text.push('\n');
            }
            OutputConversion::ListLines => match value.kind() {
                ValueKind::List(items) => {
                    for item in items {
                        push_unquoted(&mut text, item);
                        text.push('\n');
                    }
                }
                _ => {
                    push_unquoted(&mut text, value);
                    text.push('\n');
                }
            },
            OutputConversion::String => push_unquoted(&mut text, value),
        }
    }
    text
}

fn push_unquoted(text: &mut String, value: &Value) {
    match value.kind() {
        ValueKind::String(s) => text.push_str(s),
        _ => text.push_str(&value.to_string()),
    }
}
