/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Writes the build edge for a single Rust binary target: executables,
//! rlibs, dylib/cdylib crates, proc macros, and staticlib crates.
//!
//! Accessible dependencies appear as `--extern` switches so the crate can
//! use them directly; every other transitively reachable crate is pointed
//! at with `-Ldependency` so rustc can load it on behalf of an accessible
//! one. Non-Rust linkables become `-Lnative` searches plus explicit
//! link-args, with source-set object files folded in ahead of the
//! libraries.

use genja_core::build_settings::BuildSettings;
use genja_core::paths::OutputFile;
use genja_node::graph::TargetGraph;
use genja_node::graph::TargetId;
use genja_node::target::LibFile;
use genja_node::target::OutputType;
use indexmap::IndexSet;

use crate::ninja_target_writer::NinjaTargetWriter;
use crate::ninja_target_writer::SubstitutionBits;
use crate::path_output::ninja_escape;

/// The dependency lists a Rust build edge consumes, in emission order.
#[derive(Debug, Default)]
struct ClassifiedDeps {
    /// Crates exposed via `--extern`.
    extern_crates: Vec<(TargetId, OutputFile)>,
    /// Outputs of directly declared Rust deps; implicit build inputs.
    direct_rust_outputs: Vec<OutputFile>,
    /// `-Ldependency=` directories, first-occurrence order.
    search_dirs: IndexSet<String>,
    /// Object files bubbled up from source sets.
    objects: Vec<OutputFile>,
    /// Native libraries as (dependency output, link output) pairs; the two
    /// differ for shared libraries with a TOC.
    native_libs: Vec<(OutputFile, OutputFile)>,
    /// Stamps carried as order-only deps.
    order_only_stamps: Vec<OutputFile>,
}

pub struct NinjaRustBinaryTargetWriter<'a> {
    base: NinjaTargetWriter<'a>,
}

impl<'a> NinjaRustBinaryTargetWriter<'a> {
    pub fn new(graph: &'a TargetGraph, settings: &'a BuildSettings, target_id: TargetId) -> Self {
        NinjaRustBinaryTargetWriter {
            base: NinjaTargetWriter::new(graph, settings, target_id),
        }
    }

    pub fn run(mut self) -> String {
        let input_stamp = self.write_inputs_stamp_and_get_dep();
        self.write_compiler_vars();

        let num_output_uses = self.base.target.sources.len();
        let mut order_only: IndexSet<OutputFile> = self
            .base
            .write_input_deps_phony_and_get_dep(&[], num_output_uses)
            .into_iter()
            .collect();
        order_only.extend(input_stamp);

        let deps = self.classify_deps();
        order_only.extend(deps.order_only_stamps.iter().cloned());

        self.write_build_edge(&deps, &order_only);
        self.write_externs(&deps);
        self.write_rustdeps(&deps);
        self.write_ldflags();
        self.write_sources();

        self.base.out
    }

    /// The config-input stamp: written ahead of everything else so the
    /// build edge can hang an order-only dependency on it.
    fn write_inputs_stamp_and_get_dep(&mut self) -> Vec<OutputFile> {
        let target = self.base.target;
        let inputs = &target.config_values.inputs;
        if inputs.is_empty() {
            return Vec::new();
        }
        if inputs.len() == 1 {
            return vec![self.base.settings.output_file(&inputs[0])];
        }

        let stamp = OutputFile::new(format!(
            "{}/{}.inputs.stamp",
            target.target_out_dir(),
            target.label.name()
        ));
        let files: Vec<OutputFile> = inputs
            .iter()
            .map(|input| self.base.settings.output_file(input))
            .collect();
        self.base.out.push_str("build ");
        self.base
            .path_output
            .write_output_file(&mut self.base.out, &stamp);
        self.base.out.push_str(": stamp");
        self.base
            .path_output
            .write_output_files(&mut self.base.out, &files);
        self.base.out.push('\n');
        vec![stamp]
    }

    fn write_compiler_vars(&mut self) {
        let target = self.base.target;

        let crate_name = target.crate_name().to_owned();
        self.base.write_var("crate_name", &crate_name);
        self.base
            .write_var("crate_type", target.crate_type().ninja_name());
        let extension = target.output_extension_str();
        self.base.write_var("output_extension", &extension);
        let output_dir = match &target.output_dir {
            Some(dir) => self.base.settings.build_relative_dir(dir),
            None => String::new(),
        };
        self.base.write_var("output_dir", &output_dir);
        let rustflags = target.config_values.rustflags.clone();
        self.base.write_list_var("rustflags", &rustflags);
        let rustenv = target.config_values.rustenv.clone();
        self.base.write_list_var("rustenv", &rustenv);

        let bits = SubstitutionBits {
            root_out_dir: true,
            target_out_dir: true,
            target_output_name: true,
            ..SubstitutionBits::default()
        };
        if self.base.write_shared_vars(&bits) {
            self.base.out.push('\n');
        }
    }

    fn classify_deps(&self) -> ClassifiedDeps {
        let graph = self.base.graph;
        let resolved = self.base.target.resolved();
        let mut deps = ClassifiedDeps::default();

        for entry in &resolved.rust_libs {
            let dep = graph.target(entry.target);
            let output = match &dep.resolved().dependency_output {
                Some(output) => output.clone(),
                None => continue,
            };
            if entry.accessible {
                deps.extern_crates.push((entry.target, output.clone()));
            }
            if entry.direct {
                deps.direct_rust_outputs.push(output.clone());
            }
            deps.search_dirs.insert(output.dir().to_owned());
        }

        for native in &resolved.inherited_natives {
            let dep = graph.target(native.target);
            if dep.output_type == OutputType::SourceSet {
                deps.objects.extend(dep.object_files());
                continue;
            }
            let dep_resolved = dep.resolved();
            if let (Some(dep_output), Some(link_output)) = (
                dep_resolved.dependency_output.clone(),
                dep_resolved.link_output.clone(),
            ) {
                deps.native_libs.push((dep_output, link_output));
            }
        }

        for target in &resolved.order_only_targets {
            if let Some(output) = &graph.target(*target).resolved().dependency_output {
                deps.order_only_stamps.push(output.clone());
            }
        }

        deps
    }

    fn write_build_edge(&mut self, deps: &ClassifiedDeps, order_only: &IndexSet<OutputFile>) {
        let target = self.base.target;
        let settings = self.base.settings;

        let mut implicit: Vec<OutputFile> = Vec::new();
        for source in &target.sources {
            implicit.push(settings.output_file(source));
        }
        for input in &target.config_values.inputs {
            implicit.push(settings.output_file(input));
        }
        implicit.extend(deps.objects.iter().cloned());
        implicit.extend(deps.direct_rust_outputs.iter().cloned());
        implicit.extend(deps.native_libs.iter().map(|(dep, _)| dep.clone()));
        for (_, lib) in &target.config_values.externs {
            if let LibFile::Source(file) = lib {
                implicit.push(settings.output_file(file));
            }
        }

        let output = target.rust_output();
        let crate_root = target
            .rust_values
            .crate_root
            .as_ref()
            .expect("rust targets have a crate root once resolved");

        self.base.out.push_str("build ");
        self.base
            .path_output
            .write_output_file(&mut self.base.out, &output);
        self.base.out.push_str(": ");
        self.base.out.push_str(target.crate_type().rule_name());
        self.base.out.push(' ');
        self.base
            .path_output
            .write_source_file(&mut self.base.out, crate_root);
        if !implicit.is_empty() {
            self.base.out.push_str(" |");
            self.base
                .path_output
                .write_output_files(&mut self.base.out, &implicit);
        }
        if !order_only.is_empty() {
            self.base.out.push_str(" ||");
            let order_only: Vec<OutputFile> = order_only.iter().cloned().collect();
            self.base
                .path_output
                .write_output_files(&mut self.base.out, &order_only);
        }
        self.base.out.push('\n');
    }

    fn write_externs(&mut self, deps: &ClassifiedDeps) {
        let graph = self.base.graph;
        let target = self.base.target;

        self.base.out.push_str("  externs =");
        for (dep_id, output) in &deps.extern_crates {
            let dep = graph.target(*dep_id);
            let name = match target.rust_values.aliased_deps.get(&dep.label) {
                Some(alias) => alias.as_str(),
                None => dep.crate_name(),
            };
            self.base.out.push_str(" --extern ");
            self.base.out.push_str(name);
            self.base.out.push('=');
            self.base.out.push_str(&ninja_escape(output.as_str()));
        }
        for (name, lib) in &target.config_values.externs {
            let path = match lib {
                LibFile::Source(file) => self.base.settings.build_relative(file),
                LibFile::Name(name) => name.clone(),
            };
            self.base.out.push_str(" --extern ");
            self.base.out.push_str(name);
            self.base.out.push('=');
            self.base.out.push_str(&ninja_escape(&path));
        }
        self.base.out.push('\n');
    }

    fn write_rustdeps(&mut self, deps: &ClassifiedDeps) {
        let target = self.base.target;
        let settings = self.base.settings;

        self.base.out.push_str("  rustdeps =");
        for dir in &deps.search_dirs {
            self.base.out.push_str(" -Ldependency=");
            self.base.out.push_str(&ninja_escape(dir));
        }

        let mut native_dirs: IndexSet<String> = IndexSet::new();
        for object in &deps.objects {
            native_dirs.insert(object.dir().to_owned());
        }
        for (_, link) in &deps.native_libs {
            native_dirs.insert(link.dir().to_owned());
        }
        for dir in &native_dirs {
            self.base.out.push_str(" -Lnative=");
            self.base.out.push_str(&ninja_escape(dir));
        }

        // Everything the linker must consume gets an explicit link-arg;
        // -Bdynamic first so shared libraries resolve dynamically.
        if !deps.objects.is_empty() || !deps.native_libs.is_empty() {
            self.base.out.push_str(" -Clink-arg=-Bdynamic");
            for object in &deps.objects {
                self.base.out.push_str(" -Clink-arg=");
                self.base.out.push_str(&ninja_escape(object.as_str()));
            }
            for (_, link) in &deps.native_libs {
                self.base.out.push_str(" -Clink-arg=");
                self.base.out.push_str(&ninja_escape(link.as_str()));
            }
        }

        for dir in &target.config_values.lib_dirs {
            self.base.out.push_str(" -Lnative=");
            self.base
                .out
                .push_str(&ninja_escape(&settings.build_relative_dir(dir)));
        }
        for lib in &target.config_values.libs {
            match lib {
                LibFile::Name(name) => {
                    self.base.out.push_str(" -l");
                    self.base.out.push_str(name);
                }
                LibFile::Source(file) => {
                    self.base.out.push_str(" -Clink-arg=");
                    self.base
                        .out
                        .push_str(&ninja_escape(&settings.build_relative(file)));
                }
            }
        }
        self.base.out.push('\n');
    }

    fn write_ldflags(&mut self) {
        let ldflags = self.base.target.config_values.ldflags.clone();
        self.base.out.push_str("  ");
        self.base.write_list_var("ldflags", &ldflags);
    }

    fn write_sources(&mut self) {
        let target = self.base.target;
        let settings = self.base.settings;

        self.base.out.push_str("  sources =");
        for source in &target.sources {
            self.base.out.push(' ');
            self.base
                .path_output
                .write_source_file(&mut self.base.out, source);
        }
        for input in &target.config_values.inputs {
            self.base.out.push(' ');
            self.base
                .path_output
                .write_source_file(&mut self.base.out, input);
        }
        self.base.out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use genja_core::paths::SourceDir;
    use genja_core::paths::SourceFile;
    use genja_node::target::CrateType;
    use genja_node::target::LibFile;
    use genja_node::target::SourceType;
    use genja_node::target::Target;
    use genja_node::testing::TestSetup;
    use genja_node::toolchain::Toolchain;

    use super::*;

    fn rust_target(
        setup: &TestSetup,
        label: &str,
        output_type: OutputType,
        sources: &[&str],
        crate_root: &str,
        crate_name: &str,
    ) -> Target {
        let mut target = setup.target(label, output_type);
        for source in sources {
            target.sources.push(SourceFile::new(*source));
        }
        target.source_types_used.insert(SourceType::Rust);
        target.rust_values.crate_root = Some(SourceFile::new(crate_root));
        target.rust_values.crate_name = crate_name.to_owned();
        target
    }

    fn cpp_target(setup: &TestSetup, label: &str, output_type: OutputType, source: &str) -> Target {
        let mut target = setup.target(label, output_type);
        target.sources.push(SourceFile::new(source));
        target.source_types_used.insert(SourceType::Cpp);
        target
    }

    fn run(setup: &TestSetup, id: genja_node::graph::TargetId) -> String {
        NinjaRustBinaryTargetWriter::new(&setup.graph, &setup.settings, id).run()
    }

    #[test]
    fn rust_executable() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/input3.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.config_values.ldflags.push("-fsanitize=address".to_owned());
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/input3.rs ",
            "../../foo/main.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags = -fsanitize=address\n",
            "  sources = ../../foo/input3.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    // Accessible dependencies appear as --extern switches so the target
    // crate can use them whether transitive or not; transitive deps stay
    // accessible while the chain of public_deps from a direct dep holds.
    // Anything else a dependency crate needs is reachable through
    // -Ldependency but not usable from the target crate.
    #[test]
    fn rlib_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let private_rlib = setup.add(rust_target(
            &setup,
            "//baz:privatelib",
            OutputType::RustLibrary,
            &["//baz/privatelib.rs", "//baz/lib.rs"],
            "//baz/lib.rs",
            "privatecrate",
        ));
        let far_public_rlib = setup.add(rust_target(
            &setup,
            "//far:farlib",
            OutputType::RustLibrary,
            &["//far/farlib.rs", "//far/lib.rs"],
            "//far/lib.rs",
            "farcrate",
        ));
        let mut public_rlib = rust_target(
            &setup,
            "//bar:publiclib",
            OutputType::RustLibrary,
            &["//bar/publiclib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "publiccrate",
        );
        public_rlib.public_deps.push(setup.dep(far_public_rlib));
        let public_rlib = setup.add(public_rlib);

        let mut rlib = rust_target(
            &setup,
            "//foo:direct",
            OutputType::RustLibrary,
            &["//foo/direct.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "direct",
        );
        rlib.public_deps.push(setup.dep(public_rlib));
        rlib.private_deps.push(setup.dep(private_rlib));
        let rlib = setup.add(rlib);

        let mut target = rust_target(
            &setup,
            "//main:main",
            OutputType::Executable,
            &["//main/source.rs", "//main/main.rs"],
            "//main/main.rs",
            "main_crate",
        );
        target.private_deps.push(setup.dep(rlib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = privatecrate\n",
            "crate_type = rlib\n",
            "output_extension = .rlib\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/baz\n",
            "target_output_name = libprivatelib\n",
            "\n",
            "build obj/baz/libprivatelib.rlib: rust_rlib ../../baz/lib.rs | ",
            "../../baz/privatelib.rs ../../baz/lib.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../baz/privatelib.rs ../../baz/lib.rs\n",
        );
        assert_eq!(run(&setup, private_rlib), expected);

        let expected = concat!(
            "crate_name = farcrate\n",
            "crate_type = rlib\n",
            "output_extension = .rlib\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/far\n",
            "target_output_name = libfarlib\n",
            "\n",
            "build obj/far/libfarlib.rlib: rust_rlib ../../far/lib.rs | ",
            "../../far/farlib.rs ../../far/lib.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../far/farlib.rs ../../far/lib.rs\n",
        );
        assert_eq!(run(&setup, far_public_rlib), expected);

        let expected = concat!(
            "crate_name = publiccrate\n",
            "crate_type = rlib\n",
            "output_extension = .rlib\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libpubliclib\n",
            "\n",
            "build obj/bar/libpubliclib.rlib: rust_rlib ../../bar/lib.rs | ",
            "../../bar/publiclib.rs ../../bar/lib.rs obj/far/libfarlib.rlib\n",
            "  externs = --extern farcrate=obj/far/libfarlib.rlib\n",
            "  rustdeps = -Ldependency=obj/far\n",
            "  ldflags =\n",
            "  sources = ../../bar/publiclib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, public_rlib), expected);

        let expected = concat!(
            "crate_name = main_crate\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/main\n",
            "target_output_name = main\n",
            "\n",
            "build ./main_crate: rust_bin ../../main/main.rs | ",
            "../../main/source.rs ../../main/main.rs obj/foo/libdirect.rlib\n",
            "  externs = --extern direct=obj/foo/libdirect.rlib ",
            "--extern publiccrate=obj/bar/libpubliclib.rlib ",
            "--extern farcrate=obj/far/libfarlib.rlib\n",
            "  rustdeps = -Ldependency=obj/foo -Ldependency=obj/bar ",
            "-Ldependency=obj/far -Ldependency=obj/baz\n",
            "  ldflags =\n",
            "  sources = ../../main/source.rs ../../main/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn dylib_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let private_inside = setup.add(rust_target(
            &setup,
            "//faz:private_inside",
            OutputType::RustLibrary,
            &["//faz/private_inside.rs", "//faz/lib.rs"],
            "//faz/lib.rs",
            "private_inside",
        ));
        let inside = setup.add(rust_target(
            &setup,
            "//baz:inside",
            OutputType::RustLibrary,
            &["//baz/inside.rs", "//baz/lib.rs"],
            "//baz/lib.rs",
            "inside",
        ));

        let mut dylib = rust_target(
            &setup,
            "//bar:mylib",
            OutputType::SharedLibrary,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        );
        dylib.rust_values.crate_type = Some(CrateType::Dylib);
        dylib.public_deps.push(setup.dep(inside));
        dylib.private_deps.push(setup.dep(private_inside));
        let dylib = setup.add(dylib);

        let mut another_dylib = rust_target(
            &setup,
            "//foo:direct",
            OutputType::SharedLibrary,
            &["//foo/direct.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "direct",
        );
        another_dylib.rust_values.crate_type = Some(CrateType::Dylib);
        another_dylib.public_deps.push(setup.dep(dylib));
        let another_dylib = setup.add(another_dylib);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(another_dylib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = mylib\n",
            "crate_type = dylib\n",
            "output_extension = .so\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmylib\n",
            "\n",
            "build obj/bar/libmylib.so: rust_dylib ../../bar/lib.rs | ",
            "../../bar/mylib.rs ../../bar/lib.rs ",
            "obj/baz/libinside.rlib obj/faz/libprivate_inside.rlib\n",
            "  externs = --extern inside=obj/baz/libinside.rlib ",
            "--extern private_inside=obj/faz/libprivate_inside.rlib\n",
            "  rustdeps = -Ldependency=obj/baz -Ldependency=obj/faz\n",
            "  ldflags =\n",
            "  sources = ../../bar/mylib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, dylib), expected);

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/foo/libdirect.so\n",
            "  externs = --extern direct=obj/foo/libdirect.so ",
            "--extern mylib=obj/bar/libmylib.so ",
            "--extern inside=obj/baz/libinside.rlib\n",
            "  rustdeps = -Ldependency=obj/foo -Ldependency=obj/bar ",
            "-Ldependency=obj/baz -Ldependency=obj/faz\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn rlib_deps_across_groups() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let mut procmacro = rust_target(
            &setup,
            "//bar:mymacro",
            OutputType::RustProcMacro,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mymacro",
        );
        procmacro.rust_values.crate_type = Some(CrateType::ProcMacro);
        let procmacro = setup.add(procmacro);

        let mut group = setup.target("//baz:group", OutputType::Group);
        group.public_deps.push(setup.dep(procmacro));
        let group = setup.add(group);

        let mut rlib = rust_target(
            &setup,
            "//bar:mylib",
            OutputType::RustLibrary,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        );
        rlib.public_deps.push(setup.dep(group));
        let rlib = setup.add(rlib);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(rlib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = mymacro\n",
            "crate_type = proc-macro\n",
            "output_extension = .so\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmymacro\n",
            "\n",
            "build obj/bar/libmymacro.so: rust_macro ../../bar/lib.rs | ",
            "../../bar/mylib.rs ../../bar/lib.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../bar/mylib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, procmacro), expected);

        let expected = concat!(
            "crate_name = mylib\n",
            "crate_type = rlib\n",
            "output_extension = .rlib\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmylib\n",
            "\n",
            "build obj/bar/libmylib.rlib: rust_rlib ../../bar/lib.rs | ",
            "../../bar/mylib.rs ../../bar/lib.rs obj/bar/libmymacro.so || ",
            "obj/baz/group.stamp\n",
            "  externs = --extern mymacro=obj/bar/libmymacro.so\n",
            "  rustdeps = -Ldependency=obj/bar\n",
            "  ldflags =\n",
            "  sources = ../../bar/mylib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, rlib), expected);

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ",
            "../../foo/source.rs ../../foo/main.rs obj/bar/libmylib.rlib || ",
            "obj/baz/group.stamp\n",
            "  externs = --extern mylib=obj/bar/libmylib.rlib ",
            "--extern mymacro=obj/bar/libmymacro.so\n",
            "  rustdeps = -Ldependency=obj/bar\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn renamed_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let transitive = setup.add(rust_target(
            &setup,
            "//faz:transitive",
            OutputType::RustLibrary,
            &["//faz/transitive/transitive.rs", "//faz/transitive/lib.rs"],
            "//faz/transitive/lib.rs",
            "transitive",
        ));
        let mut rlib = rust_target(
            &setup,
            "//baz:mylib",
            OutputType::RustLibrary,
            &["//baz/bar/mylib.rs", "//baz/bar/lib.rs"],
            "//baz/bar/lib.rs",
            "mylib",
        );
        rlib.public_deps.push(setup.dep(transitive));
        let rlib = setup.add(rlib);
        let direct = setup.add(rust_target(
            &setup,
            "//bar:direct",
            OutputType::RustLibrary,
            &["//bar/direct/direct.rs", "//bar/direct/lib.rs"],
            "//bar/direct/lib.rs",
            "direct",
        ));

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.rust_values.aliased_deps.insert(
            setup.graph.target(direct).label.clone(),
            "direct_renamed".to_owned(),
        );
        target.rust_values.aliased_deps.insert(
            setup.graph.target(transitive).label.clone(),
            "transitive_renamed".to_owned(),
        );
        target.private_deps.push(setup.dep(direct));
        target.private_deps.push(setup.dep(rlib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/bar/libdirect.rlib obj/baz/libmylib.rlib\n",
            "  externs = --extern direct_renamed=obj/bar/libdirect.rlib ",
            "--extern mylib=obj/baz/libmylib.rlib ",
            "--extern transitive_renamed=obj/faz/libtransitive.rlib\n",
            "  rustdeps = -Ldependency=obj/bar -Ldependency=obj/baz ",
            "-Ldependency=obj/faz\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn non_rust_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let toolchain_with_toc = {
            let mut toolchain =
                Toolchain::new(TestSetup::label("//toolchain_with_toc:with_toc"));
            toolchain.shared_lib_toc = true;
            setup.graph.add_toolchain(toolchain)
        };

        let staticlib = setup.add(cpp_target(
            &setup,
            "//foo:static",
            OutputType::StaticLibrary,
            "//foo/static.cpp",
        ));
        let rlib = setup.add(rust_target(
            &setup,
            "//bar:mylib",
            OutputType::RustLibrary,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        ));
        let sharedlib = setup.add(cpp_target(
            &setup,
            "//foo:shared",
            OutputType::SharedLibrary,
            "//foo/static.cpp",
        ));
        let csourceset = setup.add(cpp_target(
            &setup,
            "//baz:sourceset",
            OutputType::SourceSet,
            "//baz/csourceset.cpp",
        ));
        let mut shared_with_toc = cpp_target(
            &setup,
            "//foo:shared_with_toc",
            OutputType::SharedLibrary,
            "//foo/static.cpp",
        );
        shared_with_toc.toolchain = Some(toolchain_with_toc);
        let shared_with_toc = setup.add(shared_with_toc);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(rlib));
        target.private_deps.push(setup.dep(staticlib));
        target.private_deps.push(setup.dep(sharedlib));
        target.private_deps.push(setup.dep(csourceset));
        target.private_deps.push(setup.dep(shared_with_toc));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/baz/sourceset.csourceset.o ",
            "obj/bar/libmylib.rlib ",
            "obj/foo/libstatic.a ./libshared.so ./libshared_with_toc.so.TOC ",
            "|| obj/baz/sourceset.stamp\n",
            "  externs = --extern mylib=obj/bar/libmylib.rlib\n",
            "  rustdeps = -Ldependency=obj/bar ",
            "-Lnative=obj/baz -Lnative=obj/foo -Lnative=. ",
            "-Clink-arg=-Bdynamic -Clink-arg=obj/baz/sourceset.csourceset.o ",
            "-Clink-arg=obj/foo/libstatic.a -Clink-arg=./libshared.so ",
            "-Clink-arg=./libshared_with_toc.so\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn non_rust_deps_static_only() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let staticlib = setup.add(cpp_target(
            &setup,
            "//foo:static",
            OutputType::StaticLibrary,
            "//foo/static.cpp",
        ));
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(staticlib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/foo/libstatic.a\n",
            "  externs =\n",
            "  rustdeps = -Lnative=obj/foo -Clink-arg=-Bdynamic ",
            "-Clink-arg=obj/foo/libstatic.a\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn rust_staticlib_with_native_dep() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let staticlib = setup.add(cpp_target(
            &setup,
            "//foo:static",
            OutputType::StaticLibrary,
            "//foo/static.cpp",
        ));
        let mut rstaticlib = rust_target(
            &setup,
            "//baz:baz",
            OutputType::StaticLibrary,
            &["//baz/lib.rs"],
            "//baz/lib.rs",
            "baz",
        );
        rstaticlib.private_deps.push(setup.dep(staticlib));
        let rstaticlib = setup.add(rstaticlib);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = baz\n",
            "crate_type = staticlib\n",
            "output_extension = .a\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/baz\n",
            "target_output_name = libbaz\n",
            "\n",
            "build obj/baz/libbaz.a: rust_staticlib ../../baz/lib.rs | ",
            "../../baz/lib.rs ",
            "obj/foo/libstatic.a\n",
            "  externs =\n",
            "  rustdeps = -Lnative=obj/foo -Clink-arg=-Bdynamic ",
            "-Clink-arg=obj/foo/libstatic.a\n",
            "  ldflags =\n",
            "  sources = ../../baz/lib.rs\n",
        );
        assert_eq!(run(&setup, rstaticlib), expected);
        Ok(())
    }

    #[test]
    fn rust_output_extension_and_dir() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/input3.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.output_extension = Some("exe".to_owned());
        target.output_dir = Some(SourceDir::new("//out/Debug/foo/"));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = .exe\n",
            "output_dir = foo\n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar.exe: rust_bin ../../foo/main.rs | ../../foo/input3.rs ",
            "../../foo/main.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../foo/input3.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn libs_and_lib_dirs() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/input.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.output_dir = Some(SourceDir::new("//out/Debug/foo/"));
        target.config_values.libs.push(LibFile::Name("quux".to_owned()));
        target.config_values.lib_dirs.push(SourceDir::new("//baz/"));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = foo\n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/input.rs ",
            "../../foo/main.rs\n",
            "  externs =\n",
            "  rustdeps = -Lnative=../../baz -lquux\n",
            "  ldflags =\n",
            "  sources = ../../foo/input.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    // Neither public nor private Rust deps of a proc macro are acquired as
    // accessible deps by users of the macro, but the macro itself is.
    #[test]
    fn rust_proc_macro() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let publicdep = setup.add(rust_target(
            &setup,
            "//baz/public:mymacropublicdep",
            OutputType::RustLibrary,
            &["//baz/public/mylib.rs", "//baz/public/lib.rs"],
            "//baz/public/lib.rs",
            "publicdep",
        ));
        let privatedep = setup.add(rust_target(
            &setup,
            "//baz/private:mymacroprivatedep",
            OutputType::RustLibrary,
            &["//baz/private/mylib.rs", "//baz/private/lib.rs"],
            "//baz/private/lib.rs",
            "privatedep",
        ));

        let mut procmacro = rust_target(
            &setup,
            "//bar:mymacro",
            OutputType::RustProcMacro,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mymacro",
        );
        procmacro.rust_values.crate_type = Some(CrateType::ProcMacro);
        procmacro.public_deps.push(setup.dep(publicdep));
        procmacro.private_deps.push(setup.dep(privatedep));
        let procmacro = setup.add(procmacro);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(procmacro));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = mymacro\n",
            "crate_type = proc-macro\n",
            "output_extension = .so\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmymacro\n",
            "\n",
            "build obj/bar/libmymacro.so: rust_macro ../../bar/lib.rs | ",
            "../../bar/mylib.rs ../../bar/lib.rs ",
            "obj/baz/public/libmymacropublicdep.rlib ",
            "obj/baz/private/libmymacroprivatedep.rlib\n",
            "  externs = ",
            "--extern publicdep=obj/baz/public/libmymacropublicdep.rlib ",
            "--extern privatedep=obj/baz/private/libmymacroprivatedep.rlib\n",
            "  rustdeps = -Ldependency=obj/baz/public ",
            "-Ldependency=obj/baz/private\n",
            "  ldflags =\n",
            "  sources = ../../bar/mylib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, procmacro), expected);

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/bar/libmymacro.so\n",
            "  externs = --extern mymacro=obj/bar/libmymacro.so\n",
            "  rustdeps = -Ldependency=obj/bar\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn group_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let rlib = setup.add(rust_target(
            &setup,
            "//bar:mylib",
            OutputType::RustLibrary,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        ));
        let mut group = setup.target("//baz:group", OutputType::Group);
        group.public_deps.push(setup.dep(rlib));
        let group = setup.add(group);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(group));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = mylib\n",
            "crate_type = rlib\n",
            "output_extension = .rlib\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmylib\n",
            "\n",
            "build obj/bar/libmylib.rlib: rust_rlib ../../bar/lib.rs | ",
            "../../bar/mylib.rs ../../bar/lib.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../bar/mylib.rs ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, rlib), expected);

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/bar/libmylib.rlib || obj/baz/group.stamp\n",
            "  externs = --extern mylib=obj/bar/libmylib.rlib\n",
            "  rustdeps = -Ldependency=obj/bar\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn externs() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.config_values.externs.push((
            "lib1".to_owned(),
            LibFile::Source(SourceFile::new("//foo/lib1.rlib")),
        ));
        target
            .config_values
            .externs
            .push(("lib2".to_owned(), LibFile::Name("lib2.rlib".to_owned())));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs ../../foo/lib1.rlib\n",
            "  externs = --extern lib1=../../foo/lib1.rlib --extern ",
            "lib2=lib2.rlib\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn inputs() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target
            .config_values
            .inputs
            .push(SourceFile::new("//foo/config.json"));
        target
            .config_values
            .inputs
            .push(SourceFile::new("//foo/template.h"));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "build obj/foo/bar.inputs.stamp: stamp ../../foo/config.json ",
            "../../foo/template.h\n",
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs ../../foo/config.json ../../foo/template.h ",
            "|| obj/foo/bar.inputs.stamp\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs ",
            "../../foo/config.json ../../foo/template.h\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn cdylib_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();
        let mut cdylib = rust_target(
            &setup,
            "//bar:mylib",
            OutputType::SharedLibrary,
            &["//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        );
        cdylib.rust_values.crate_type = Some(CrateType::Cdylib);
        let cdylib = setup.add(cdylib);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/source.rs", "//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(cdylib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = mylib\n",
            "crate_type = cdylib\n",
            "output_extension = .so\n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/bar\n",
            "target_output_name = libmylib\n",
            "\n",
            "build obj/bar/libmylib.so: rust_cdylib ../../bar/lib.rs | ",
            "../../bar/lib.rs\n",
            "  externs =\n",
            "  rustdeps =\n",
            "  ldflags =\n",
            "  sources = ../../bar/lib.rs\n",
        );
        assert_eq!(run(&setup, cdylib), expected);

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/source.rs ",
            "../../foo/main.rs obj/bar/libmylib.so\n",
            "  externs =\n",
            "  rustdeps = -Lnative=obj/bar -Clink-arg=-Bdynamic ",
            "-Clink-arg=obj/bar/libmylib.so\n",
            "  ldflags =\n",
            "  sources = ../../foo/source.rs ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }

    #[test]
    fn transitive_public_non_rust_deps() -> anyhow::Result<()> {
        let mut setup = TestSetup::new();

        let implicitlib = setup.add(cpp_target(
            &setup,
            "//foo:implicit",
            OutputType::SharedLibrary,
            "//foo/implicit.cpp",
        ));
        let mut sharedlib = cpp_target(
            &setup,
            "//foo:shared",
            OutputType::SharedLibrary,
            "//foo/shared.cpp",
        );
        sharedlib.public_deps.push(setup.dep(implicitlib));
        let sharedlib = setup.add(sharedlib);

        let mut rlib = rust_target(
            &setup,
            "//bar:mylib",
            OutputType::RustLibrary,
            &["//bar/mylib.rs", "//bar/lib.rs"],
            "//bar/lib.rs",
            "mylib",
        );
        rlib.private_deps.push(setup.dep(sharedlib));
        let rlib = setup.add(rlib);

        let mut target = rust_target(
            &setup,
            "//foo:bar",
            OutputType::Executable,
            &["//foo/main.rs"],
            "//foo/main.rs",
            "foo_bar",
        );
        target.private_deps.push(setup.dep(rlib));
        let target = setup.add(target);
        setup.resolve()?;

        let expected = concat!(
            "crate_name = foo_bar\n",
            "crate_type = bin\n",
            "output_extension = \n",
            "output_dir = \n",
            "rustflags =\n",
            "rustenv =\n",
            "root_out_dir = .\n",
            "target_out_dir = obj/foo\n",
            "target_output_name = bar\n",
            "\n",
            "build ./foo_bar: rust_bin ../../foo/main.rs | ../../foo/main.rs ",
            "obj/bar/libmylib.rlib ./libshared.so ./libimplicit.so\n",
            "  externs = --extern mylib=obj/bar/libmylib.rlib\n",
            "  rustdeps = -Ldependency=obj/bar -Lnative=. -Clink-arg=-Bdynamic ",
            "-Clink-arg=./libshared.so -Clink-arg=./libimplicit.so\n",
            "  ldflags =\n",
            "  sources = ../../foo/main.rs\n",
        );
        assert_eq!(run(&setup, target), expected);
        Ok(())
    }
}
