/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Test fixtures: a graph with build settings and a default toolchain, and
//! shorthand constructors for the target shapes tests build over and over.

use std::path::PathBuf;

use genja_core::build_settings::BuildSettings;
use genja_core::label::Label;
use genja_core::paths::SourceDir;
use genja_core::paths::SourceFile;

use crate::graph::TargetGraph;
use crate::graph::TargetId;
use crate::resolve::resolve_all;
use crate::resolve::ResolveError;
use crate::target::DepPair;
use crate::target::OutputType;
use crate::target::SourceType;
use crate::target::Target;
use crate::toolchain::Toolchain;
use crate::toolchain::ToolchainId;
use crate::visibility::Visibility;

pub struct TestSetup {
    pub graph: TargetGraph,
    pub settings: BuildSettings,
    pub toolchain: ToolchainId,
}

impl TestSetup {
    pub fn new() -> Self {
        let mut graph = TargetGraph::new();
        let toolchain = graph.add_toolchain(Toolchain::new(Self::label("//toolchain:default")));
        graph.set_default_toolchain(toolchain);
        let settings =
            BuildSettings::new(PathBuf::from("/src"), SourceDir::new("//out/Debug/"));
        TestSetup {
            graph,
            settings,
            toolchain,
        }
    }

    pub fn label(s: &str) -> Label {
        Label::resolve(s, &SourceDir::new("//"), None).unwrap()
    }

    /// A public target on the default toolchain.
    pub fn target(&self, label: &str, output_type: OutputType) -> Target {
        let mut target = Target::new(Self::label(label), output_type);
        target.visibility = Visibility::Public;
        target.toolchain = Some(self.toolchain);
        target
    }

    /// An rlib with a `lib.rs` crate root and one extra source, the shape
    /// most dependency tests want.
    pub fn rust_library(&self, label: &str, crate_name: &str) -> Target {
        let mut target = self.target(label, OutputType::RustLibrary);
        let dir = target.label.dir().as_str().to_owned();
        let root = SourceFile::new(format!("{}lib.rs", dir));
        target
            .sources
            .push(SourceFile::new(format!("{}{}.rs", dir, target.label.name())));
        target.sources.push(root.clone());
        target.source_types_used.insert(SourceType::Rust);
        target.rust_values.crate_root = Some(root);
        target.rust_values.crate_name = crate_name.to_owned();
        target
    }

    /// An executable with a `main.rs` crate root and one extra source.
    pub fn rust_executable(&self, label: &str, crate_name: &str) -> Target {
        let mut target = self.target(label, OutputType::Executable);
        let dir = target.label.dir().as_str().to_owned();
        let root = SourceFile::new(format!("{}main.rs", dir));
        target
            .sources
            .push(SourceFile::new(format!("{}source.rs", dir)));
        target.sources.push(root.clone());
        target.source_types_used.insert(SourceType::Rust);
        target.rust_values.crate_root = Some(root);
        target.rust_values.crate_name = crate_name.to_owned();
        target
    }

    pub fn add(&mut self, target: Target) -> TargetId {
        self.graph.add_target(target).unwrap()
    }

    pub fn dep(&self, id: TargetId) -> DepPair {
        DepPair {
            label: self.graph.target(id).label.clone(),
            target: id,
        }
    }

    pub fn resolve(&mut self) -> Result<(), ResolveError> {
        resolve_all(&mut self.graph)
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        TestSetup::new()
    }
}
