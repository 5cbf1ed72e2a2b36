/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The two path spaces of the build.
//!
//! A [`SourceFile`]/[`SourceDir`] is anchored at the source tree and written
//! `//foo/bar.rs` (or system-absolute, `/usr/include/...`). An
//! [`OutputFile`] is a plain path relative to the build output directory,
//! e.g. `obj/foo/libbar.rlib`. Conversions between the two spaces are total
//! and deterministic and live on
//! [`BuildSettings`](crate::build_settings::BuildSettings).

mod output_file;
mod source_dir;
mod source_file;

pub use output_file::OutputFile;
pub use source_dir::SourceDir;
pub use source_file::SourceFile;
