/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Dependency resolution.
//!
//! `resolve_all` walks the graph in dependency order and computes, per
//! target, everything emission reads: the recursive hard-dep closure, the
//! classified transitive Rust crate list, the inherited non-Rust linkables,
//! and the order-only stamp set.
//!
//! Classification rules:
//!
//! - A direct Rust crate dep is always accessible (`--extern`), whatever
//!   the edge visibility. Deps inherited through it stay accessible only
//!   while the chain from the direct dep is public throughout.
//! - Proc-macro boundaries stop inheritance: the macro itself is seen by
//!   its dependents, the macro's own deps are not.
//! - A group is transparent: its public deps act as if they were declared
//!   directly on the consumer, and the group's stamp becomes an order-only
//!   dependency.
//! - Rust libraries pass every inherited native linkable up; non-Rust
//!   shared libraries pass only their public shared-library deps; static
//!   libraries and source sets pass everything.

use genja_core::label::Label;
use indexmap::IndexMap;
use indexmap::IndexSet;
use thiserror::Error;

use crate::graph::TargetGraph;
use crate::graph::TargetId;
use crate::target::CrateType;
use crate::target::NativeEntry;
use crate::target::OutputType;
use crate::target::ResolvedDeps;
use crate::target::RustLibEntry;
use crate::target::Target;
use crate::visibility::VisibilityError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("dependency cycle: {path}")]
    Cycle { path: String },
    #[error(transparent)]
    NotVisible(#[from] VisibilityError),
    #[error("crate root `{root}` is not one of the sources of `{target}`")]
    CrateRootNotInSources { root: String, target: Label },
    #[error("`{target}` has Rust sources but no crate root")]
    MissingCrateRoot { target: Label },
    #[error("a source_set cannot have Rust sources (`{target}`)")]
    RustSourceSet { target: Label },
    #[error("generated_file target must have exactly one output (`{target}`)")]
    GeneratedFileOutputs { target: Label },
    #[error("\"contents\" is defined on `{target}`, so metadata collection keys will have no effect")]
    ContentsAndDataKeys { target: Label },
    #[error("either contents or data_keys should be set on `{target}`")]
    NeitherContentsNorDataKeys { target: Label },
}

/// Resolves every target in the graph. All targets are processed; the
/// first error in label order is the one reported.
pub fn resolve_all(graph: &mut TargetGraph) -> Result<(), ResolveError> {
    let order = topo_order(graph)?;

    let mut errors: Vec<(Label, ResolveError)> = Vec::new();
    for id in order {
        if let Err(err) = validate(graph, id) {
            errors.push((graph.target(id).label.clone(), err));
        }
        let derived = compute_derived(graph, id);
        graph.target_mut(id).set_resolved(derived);
    }

    errors.sort_by(|a, b| a.0.cmp(&b.0));
    match errors.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

/// Post-order over all edge classes; fails on the first cycle found from
/// the label-least root.
fn topo_order(graph: &TargetGraph) -> Result<Vec<TargetId>, ResolveError> {
    const WHITE: u8 = 0;
    const GREY: u8 = 1;
    const BLACK: u8 = 2;

    let count = graph.targets().count();
    let mut state = vec![WHITE; count];
    let mut order = Vec::with_capacity(count);

    for root in graph.ids_by_label() {
        if state[root.index()] != WHITE {
            continue;
        }
        let mut stack: Vec<(TargetId, Vec<TargetId>, usize)> = Vec::new();
        state[root.index()] = GREY;
        stack.push((root, dep_ids(graph, root), 0));

        while let Some(top) = stack.len().checked_sub(1) {
            let next = {
                let frame = &mut stack[top];
                if frame.2 < frame.1.len() {
                    frame.2 += 1;
                    Some(frame.1[frame.2 - 1])
                } else {
                    None
                }
            };
            match next {
                Some(next) => match state[next.index()] {
                    WHITE => {
                        state[next.index()] = GREY;
                        let deps = dep_ids(graph, next);
                        stack.push((next, deps, 0));
                    }
                    GREY => {
                        let pos = stack
                            .iter()
                            .position(|(id, _, _)| *id == next)
                            .unwrap_or(0);
                        let mut path: Vec<String> = stack[pos..]
                            .iter()
                            .map(|(id, _, _)| graph.target(*id).label.user_visible_name(false))
                            .collect();
                        path.push(graph.target(next).label.user_visible_name(false));
                        return Err(ResolveError::Cycle {
                            path: path.join(" -> "),
                        });
                    }
                    _ => {}
                },
                None => {
                    if let Some((id, _, _)) = stack.pop() {
                        state[id.index()] = BLACK;
                        order.push(id);
                    }
                }
            }
        }
    }
    Ok(order)
}

fn dep_ids(graph: &TargetGraph, id: TargetId) -> Vec<TargetId> {
    graph
        .target(id)
        .all_deps()
        .map(|pair| pair.target)
        .collect()
}

fn validate(graph: &TargetGraph, id: TargetId) -> Result<(), ResolveError> {
    let target = graph.target(id);

    if target.output_type == OutputType::SourceSet && target.rust_source_used() {
        return Err(ResolveError::RustSourceSet {
            target: target.label.clone(),
        });
    }

    if target.is_rust_binary() && target.output_type != OutputType::SourceSet {
        match &target.rust_values.crate_root {
            None => {
                return Err(ResolveError::MissingCrateRoot {
                    target: target.label.clone(),
                })
            }
            Some(root) => {
                if !target.sources.contains(root) {
                    return Err(ResolveError::CrateRootNotInSources {
                        root: root.as_str().to_owned(),
                        target: target.label.clone(),
                    });
                }
            }
        }
    }

    if target.output_type == OutputType::GeneratedFile {
        if target.action_values.outputs.len() != 1 {
            return Err(ResolveError::GeneratedFileOutputs {
                target: target.label.clone(),
            });
        }
        match &target.generated_file {
            Some(values) => {
                let collects = !values.data_keys.is_empty();
                if values.contents.is_some() && collects {
                    return Err(ResolveError::ContentsAndDataKeys {
                        target: target.label.clone(),
                    });
                }
                if values.contents.is_none() && !collects {
                    return Err(ResolveError::NeitherContentsNorDataKeys {
                        target: target.label.clone(),
                    });
                }
            }
            None => {
                return Err(ResolveError::NeitherContentsNorDataKeys {
                    target: target.label.clone(),
                })
            }
        }
    }

    for pair in target.all_deps() {
        let dep = graph.target(pair.target);
        if !dep.visibility.is_visible_to(&dep.label, &target.label) {
            return Err(VisibilityError::NotVisibleTo(
                dep.label.clone(),
                target.label.clone(),
            )
            .into());
        }
    }

    Ok(())
}

enum DepClass {
    /// Exposed to Rust consumers via `--extern`: rlibs, dylib crates, and
    /// proc macros.
    RustCrate,
    /// Contributes to the link line: static libraries, non-Rust shared
    /// libraries, cdylib crates, non-Rust source sets.
    Native,
    /// Everything else; reaches the build edge only through hard deps,
    /// data deps, or group stamps.
    NonLinkable,
}

fn classify_dep(dep: &Target) -> DepClass {
    match dep.output_type {
        OutputType::RustLibrary | OutputType::RustProcMacro => DepClass::RustCrate,
        OutputType::SharedLibrary => {
            if dep.rust_source_used() && dep.crate_type() == CrateType::Dylib {
                DepClass::RustCrate
            } else {
                DepClass::Native
            }
        }
        OutputType::StaticLibrary | OutputType::SourceSet => DepClass::Native,
        _ => DepClass::NonLinkable,
    }
}

/// Linked deps with groups flattened away: a group's public deps act as if
/// declared directly, and every group crossed is recorded as an order-only
/// stamp.
fn expand_groups(
    graph: &TargetGraph,
    target: &Target,
    order_only: &mut IndexSet<TargetId>,
) -> Vec<(TargetId, bool)> {
    fn visit(
        graph: &TargetGraph,
        dep_id: TargetId,
        edge_public: bool,
        out: &mut Vec<(TargetId, bool)>,
        order_only: &mut IndexSet<TargetId>,
    ) {
        let dep = graph.target(dep_id);
        if dep.output_type == OutputType::Group {
            order_only.insert(dep_id);
            for pair in &dep.public_deps {
                visit(graph, pair.target, edge_public, out, order_only);
            }
        } else {
            out.push((dep_id, edge_public));
        }
    }

    let mut out = Vec::new();
    for pair in &target.public_deps {
        visit(graph, pair.target, true, &mut out, order_only);
    }
    for pair in &target.private_deps {
        visit(graph, pair.target, false, &mut out, order_only);
    }
    out
}

fn insert_rust(libs: &mut IndexMap<TargetId, RustLibEntry>, entry: RustLibEntry) {
    libs.entry(entry.target).or_insert(entry);
}

fn insert_native(
    graph: &TargetGraph,
    natives: &mut IndexMap<TargetId, bool>,
    order_only: &mut IndexSet<TargetId>,
    dep_id: TargetId,
    public: bool,
) {
    natives.entry(dep_id).or_insert(public);
    // A source set contributes object files; its stamp still gates them.
    if graph.target(dep_id).output_type == OutputType::SourceSet {
        order_only.insert(dep_id);
    }
}

fn compute_derived(graph: &TargetGraph, id: TargetId) -> ResolvedDeps {
    let target = graph.target(id);

    let mut hard: IndexSet<TargetId> = IndexSet::new();
    for pair in target.linked_deps() {
        let dep = graph.target(pair.target);
        if dep.hard_dep() {
            hard.insert(pair.target);
        }
        hard.extend(dep.resolved().recursive_hard_deps.iter().copied());
    }
    let mut recursive_hard_deps: Vec<TargetId> = hard.into_iter().collect();
    recursive_hard_deps.sort_by(|a, b| graph.target(*a).label.cmp(&graph.target(*b).label));

    let mut rust_libs: IndexMap<TargetId, RustLibEntry> = IndexMap::new();
    let mut natives: IndexMap<TargetId, bool> = IndexMap::new();
    let mut order_only: IndexSet<TargetId> = IndexSet::new();

    for (dep_id, edge_public) in expand_groups(graph, target, &mut order_only) {
        let dep = graph.target(dep_id);
        match classify_dep(dep) {
            DepClass::RustCrate => {
                insert_rust(
                    &mut rust_libs,
                    RustLibEntry {
                        target: dep_id,
                        accessible: true,
                        direct: true,
                        inheritable_public: edge_public,
                    },
                );
                if dep.crate_type() == CrateType::ProcMacro {
                    continue;
                }
                let inherited = dep.resolved();
                for entry in &inherited.rust_libs {
                    insert_rust(
                        &mut rust_libs,
                        RustLibEntry {
                            target: entry.target,
                            accessible: entry.inheritable_public,
                            direct: false,
                            inheritable_public: edge_public && entry.inheritable_public,
                        },
                    );
                }
                for native in &inherited.inherited_natives {
                    insert_native(
                        graph,
                        &mut natives,
                        &mut order_only,
                        native.target,
                        native.public && edge_public,
                    );
                }
                order_only.extend(inherited.order_only_targets.iter().copied());
            }
            DepClass::Native => {
                insert_native(graph, &mut natives, &mut order_only, dep_id, edge_public);
                let inherited = dep.resolved();
                match dep.output_type {
                    OutputType::StaticLibrary | OutputType::SourceSet => {
                        for native in &inherited.inherited_natives {
                            insert_native(
                                graph,
                                &mut natives,
                                &mut order_only,
                                native.target,
                                native.public && edge_public,
                            );
                        }
                    }
                    OutputType::SharedLibrary => {
                        // Shared-library deps are inherited only across
                        // public shared-library edges.
                        for native in &inherited.inherited_natives {
                            let is_shared = graph.target(native.target).output_type
                                == OutputType::SharedLibrary;
                            if native.public && is_shared {
                                insert_native(
                                    graph,
                                    &mut natives,
                                    &mut order_only,
                                    native.target,
                                    edge_public,
                                );
                            }
                        }
                    }
                    _ => {}
                }
            }
            DepClass::NonLinkable => {}
        }
    }

    for pair in &target.data_deps {
        order_only.insert(pair.target);
    }

    let has_toc = target
        .toolchain
        .map(|id| graph.toolchain(id).shared_lib_toc)
        .unwrap_or(false);

    ResolvedDeps {
        recursive_hard_deps,
        rust_libs: rust_libs.into_values().collect(),
        inherited_natives: natives
            .into_iter()
            .map(|(target, public)| NativeEntry { target, public })
            .collect(),
        order_only_targets: order_only.into_iter().collect(),
        dependency_output: target.compute_dependency_output(has_toc),
        link_output: target.compute_link_output(),
    }
}
