/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Core vocabulary for the genja build graph.
//!
//! This crate owns the types every other layer speaks in: target labels,
//! the two path spaces (source-absolute and build-output-relative), the
//! tagged value model of the declarative language, per-target metadata,
//! and the build settings record that anchors path conversions.
//!
//! Nothing in here knows about targets, toolchains, or Ninja; those live in
//! `genja_node` and `genja_ninja` respectively.

pub mod build_settings;
pub mod label;
pub mod metadata;
pub mod paths;
pub mod value;
