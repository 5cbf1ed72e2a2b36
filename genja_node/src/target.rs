/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! A target: one node of the build graph.
//!
//! A target is a plain data record filled in by the declarative front end.
//! After [`resolve_all`](crate::resolve::resolve_all) succeeds the record is
//! immutable and carries the derived dependency information emission needs
//! in [`ResolvedDeps`].

use genja_core::label::Label;
use genja_core::metadata::Metadata;
use genja_core::paths::OutputFile;
use genja_core::paths::SourceDir;
use genja_core::paths::SourceFile;
use genja_core::value::Value;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::graph::TargetId;
use crate::toolchain::ToolchainId;
use crate::visibility::Visibility;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OutputType {
    Executable,
    SharedLibrary,
    StaticLibrary,
    SourceSet,
    RustLibrary,
    RustProcMacro,
    Group,
    CopyFiles,
    Action,
    ActionForeach,
    BundleData,
    CreateBundle,
    GeneratedFile,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CrateType {
    Bin,
    Rlib,
    Dylib,
    Cdylib,
    ProcMacro,
    Staticlib,
}

impl CrateType {
    /// The `crate_type` variable value, as rustc spells it.
    pub fn ninja_name(self) -> &'static str {
        match self {
            CrateType::Bin => "bin",
            CrateType::Rlib => "rlib",
            CrateType::Dylib => "dylib",
            CrateType::Cdylib => "cdylib",
            CrateType::ProcMacro => "proc-macro",
            CrateType::Staticlib => "staticlib",
        }
    }

    /// The toolchain rule that builds this crate type.
    pub fn rule_name(self) -> &'static str {
        match self {
            CrateType::Bin => "rust_bin",
            CrateType::Rlib => "rust_rlib",
            CrateType::Dylib => "rust_dylib",
            CrateType::Cdylib => "rust_cdylib",
            CrateType::ProcMacro => "rust_macro",
            CrateType::Staticlib => "rust_staticlib",
        }
    }

    pub fn default_extension(self) -> &'static str {
        match self {
            CrateType::Bin => "",
            CrateType::Rlib => ".rlib",
            CrateType::Dylib | CrateType::Cdylib | CrateType::ProcMacro => ".so",
            CrateType::Staticlib => ".a",
        }
    }

    pub fn has_lib_prefix(self) -> bool {
        !matches!(self, CrateType::Bin)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SourceType {
    Rust,
    Cpp,
    C,
    Asm,
}

/// A dependency edge. The label is kept alongside the resolved id; the two
/// always agree (`graph.target(pair.target).label == pair.label`).
#[derive(Clone, Debug)]
pub struct DepPair {
    pub label: Label,
    pub target: TargetId,
}

/// A library reference from config values: either a file in the source
/// tree or a bare name handed to the linker as `-l<name>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LibFile {
    Source(SourceFile),
    Name(String),
}

/// Flags and files accumulated from the target's configs.
#[derive(Debug, Default)]
pub struct ConfigValues {
    pub rustflags: Vec<String>,
    pub rustenv: Vec<String>,
    pub ldflags: Vec<String>,
    pub libs: Vec<LibFile>,
    pub lib_dirs: Vec<SourceDir>,
    pub inputs: Vec<SourceFile>,
    pub externs: Vec<(String, LibFile)>,
}

/// Rust-specific values of a binary target.
#[derive(Debug, Default)]
pub struct RustValues {
    pub crate_root: Option<SourceFile>,
    pub crate_name: String,
    pub crate_type: Option<CrateType>,
    /// Renames applied when the named dependency is passed to `--extern`.
    pub aliased_deps: IndexMap<Label, String>,
}

/// Script and declared outputs for action-like targets.
#[derive(Debug, Default)]
pub struct ActionValues {
    pub script: Option<SourceFile>,
    pub outputs: Vec<SourceFile>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputConversion {
    /// The declarative-language literal form of each value.
    #[default]
    Value,
    /// One list element per line, strings unquoted.
    ListLines,
    /// The concatenation of the string forms.
    String,
}

/// The metadata-collection spec of a `generated_file` target.
#[derive(Debug, Default)]
pub struct GeneratedFileValues {
    pub contents: Option<Value>,
    pub data_keys: Vec<String>,
    pub walk_keys: Vec<String>,
    pub rebase: bool,
    pub output_conversion: OutputConversion,
}

/// One transitive Rust crate dependency, classified.
#[derive(Clone, Copy, Debug)]
pub struct RustLibEntry {
    pub target: TargetId,
    /// Exposed to this target via `--extern`.
    pub accessible: bool,
    /// A declared dep of this target (or reached by flattening a group);
    /// direct deps contribute their outputs as implicit build inputs.
    pub direct: bool,
    /// Stays accessible for targets that depend on this one.
    pub inheritable_public: bool,
}

/// One inherited non-Rust linkable.
#[derive(Clone, Copy, Debug)]
pub struct NativeEntry {
    pub target: TargetId,
    pub public: bool,
}

/// Derived dependency information, computed once by the resolver.
#[derive(Debug, Default)]
pub struct ResolvedDeps {
    /// Transitive closure of hard deps over linked edges, label-sorted.
    pub recursive_hard_deps: Vec<TargetId>,
    /// Transitive Rust crates in stable first-occurrence order.
    pub rust_libs: Vec<RustLibEntry>,
    /// Transitive non-Rust linkables in stable first-occurrence order.
    pub inherited_natives: Vec<NativeEntry>,
    /// Stamp-bearing deps carried as order-only edges.
    pub order_only_targets: Vec<TargetId>,
    pub dependency_output: Option<OutputFile>,
    pub link_output: Option<OutputFile>,
}

#[derive(Debug)]
pub struct Target {
    pub label: Label,
    pub output_type: OutputType,
    pub sources: Vec<SourceFile>,
    pub source_types_used: IndexSet<SourceType>,
    pub public_deps: Vec<DepPair>,
    pub private_deps: Vec<DepPair>,
    pub data_deps: Vec<DepPair>,
    pub visibility: Visibility,
    pub toolchain: Option<ToolchainId>,
    pub output_name: Option<String>,
    pub output_extension: Option<String>,
    pub output_dir: Option<SourceDir>,
    pub config_values: ConfigValues,
    pub rust_values: RustValues,
    pub action_values: ActionValues,
    pub metadata: Metadata,
    pub generated_file: Option<GeneratedFileValues>,
    resolved: Option<ResolvedDeps>,
}

impl Target {
    pub fn new(label: Label, output_type: OutputType) -> Self {
        Target {
            label,
            output_type,
            sources: Vec::new(),
            source_types_used: IndexSet::new(),
            public_deps: Vec::new(),
            private_deps: Vec::new(),
            data_deps: Vec::new(),
            // Undeclared visibility is directory-private, not public.
            visibility: Visibility::Default,
            toolchain: None,
            output_name: None,
            output_extension: None,
            output_dir: None,
            config_values: ConfigValues::default(),
            rust_values: RustValues::default(),
            action_values: ActionValues::default(),
            metadata: Metadata::default(),
            generated_file: None,
            resolved: None,
        }
    }

    /// Linked deps in traversal order: public first, then private.
    pub fn linked_deps(&self) -> impl Iterator<Item = &DepPair> {
        self.public_deps.iter().chain(self.private_deps.iter())
    }

    /// Every dep class, in traversal order.
    pub fn all_deps(&self) -> impl Iterator<Item = &DepPair> {
        self.linked_deps().chain(self.data_deps.iter())
    }

    pub fn is_binary(&self) -> bool {
        matches!(
            self.output_type,
            OutputType::Executable
                | OutputType::SharedLibrary
                | OutputType::StaticLibrary
                | OutputType::SourceSet
                | OutputType::RustLibrary
                | OutputType::RustProcMacro
        )
    }

    /// Hard deps produce files other targets may consume as inputs; they
    /// must be complete before any dependent compiles.
    pub fn hard_dep(&self) -> bool {
        matches!(
            self.output_type,
            OutputType::Action
                | OutputType::ActionForeach
                | OutputType::CopyFiles
                | OutputType::CreateBundle
                | OutputType::BundleData
                | OutputType::GeneratedFile
        )
    }

    pub fn rust_source_used(&self) -> bool {
        self.source_types_used.contains(&SourceType::Rust)
    }

    pub fn is_rust_binary(&self) -> bool {
        self.is_binary() && self.rust_source_used()
    }

    pub fn crate_type(&self) -> CrateType {
        if let Some(explicit) = self.rust_values.crate_type {
            return explicit;
        }
        match self.output_type {
            OutputType::Executable => CrateType::Bin,
            OutputType::RustProcMacro => CrateType::ProcMacro,
            OutputType::SharedLibrary => CrateType::Dylib,
            OutputType::StaticLibrary => CrateType::Staticlib,
            _ => CrateType::Rlib,
        }
    }

    pub fn crate_name(&self) -> &str {
        if self.rust_values.crate_name.is_empty() {
            self.label.name()
        } else {
            &self.rust_values.crate_name
        }
    }

    /// The base file name of outputs, before any `lib` prefix.
    pub fn computed_output_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or_else(|| self.label.name())
    }

    /// The `target_output_name` substitution: the output name with the
    /// platform library prefix applied when the output kind wants one.
    pub fn target_output_name(&self) -> String {
        let prefixed = if self.is_rust_binary() {
            self.crate_type().has_lib_prefix()
        } else {
            matches!(
                self.output_type,
                OutputType::SharedLibrary | OutputType::StaticLibrary
            )
        };
        if prefixed {
            format!("lib{}", self.computed_output_name())
        } else {
            self.computed_output_name().to_owned()
        }
    }

    /// `obj/<dir>` for this target's directory.
    pub fn target_out_dir(&self) -> String {
        let stripped = self.label.dir().stripped();
        if stripped.is_empty() {
            "obj".to_owned()
        } else {
            format!("obj/{}", stripped)
        }
    }

    /// The `output_extension` substitution, dot included, empty when none.
    pub fn output_extension_str(&self) -> String {
        match &self.output_extension {
            Some(ext) if ext.is_empty() => String::new(),
            Some(ext) => format!(".{}", ext),
            None => {
                if self.is_rust_binary() {
                    self.crate_type().default_extension().to_owned()
                } else {
                    match self.output_type {
                        OutputType::SharedLibrary => ".so".to_owned(),
                        OutputType::StaticLibrary => ".a".to_owned(),
                        _ => String::new(),
                    }
                }
            }
        }
    }

    /// The primary output of a Rust binary target, per crate type:
    /// executables at the root of the build dir under their crate name,
    /// everything else under `obj/<dir>/`.
    pub fn rust_output(&self) -> OutputFile {
        let ext = self.output_extension_str();
        match self.crate_type() {
            CrateType::Bin => OutputFile::new(format!("./{}{}", self.crate_name(), ext)),
            _ => OutputFile::new(format!(
                "{}/{}{}",
                self.target_out_dir(),
                self.target_output_name(),
                ext
            )),
        }
    }

    /// The stamp file of a non-binary target.
    pub fn stamp_output(&self) -> OutputFile {
        OutputFile::new(format!(
            "{}/{}.stamp",
            self.target_out_dir(),
            self.label.name()
        ))
    }

    /// Object files a non-Rust source set contributes to its dependents.
    pub fn object_files(&self) -> Vec<OutputFile> {
        self.sources
            .iter()
            .filter(|source| {
                matches!(source.extension(), Some("c") | Some("cc") | Some("cpp") | Some("S"))
            })
            .map(|source| {
                OutputFile::new(format!(
                    "{}/{}.{}.o",
                    self.target_out_dir(),
                    self.label.name(),
                    source.file_stem()
                ))
            })
            .collect()
    }

    /// The file (or stamp) dependents wait on. `has_toc` is whether the
    /// target's toolchain produces a table-of-contents file for shared
    /// libraries; when it does, dependents rebuild only on interface
    /// changes.
    pub fn compute_dependency_output(&self, has_toc: bool) -> Option<OutputFile> {
        if self.is_rust_binary() {
            return Some(self.rust_output());
        }
        match self.output_type {
            OutputType::Executable => {
                Some(OutputFile::new(format!("./{}", self.computed_output_name())))
            }
            OutputType::SharedLibrary => {
                let link = self.compute_link_output()?;
                Some(if has_toc { link.with_suffix(".TOC") } else { link })
            }
            OutputType::StaticLibrary => self.compute_link_output(),
            OutputType::SourceSet
            | OutputType::Group
            | OutputType::CopyFiles
            | OutputType::Action
            | OutputType::ActionForeach
            | OutputType::BundleData
            | OutputType::CreateBundle
            | OutputType::GeneratedFile => Some(self.stamp_output()),
            _ => None,
        }
    }

    /// The file handed to the linker, which for shared libraries with a TOC
    /// differs from the dependency output.
    pub fn compute_link_output(&self) -> Option<OutputFile> {
        if self.is_rust_binary() {
            return Some(self.rust_output());
        }
        match self.output_type {
            OutputType::SharedLibrary => Some(OutputFile::new(format!(
                "./{}{}",
                self.target_output_name(),
                self.output_extension_str()
            ))),
            OutputType::StaticLibrary => Some(OutputFile::new(format!(
                "{}/{}{}",
                self.target_out_dir(),
                self.target_output_name(),
                self.output_extension_str()
            ))),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn resolved(&self) -> &ResolvedDeps {
        self.resolved
            .as_ref()
            .expect("target must be resolved before its derived deps are read")
    }

    pub(crate) fn set_resolved(&mut self, resolved: ResolvedDeps) {
        assert!(self.resolved.is_none(), "target resolved twice");
        self.resolved = Some(resolved);
    }
}
