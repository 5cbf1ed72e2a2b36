/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use gazebo::dupe::Dupe;
use genja_core::label::Label;

use crate::target::DepPair;

#[derive(Clone, Copy, Debug, Dupe, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ToolchainId(pub(crate) u32);

/// A toolchain: the set of tools targets of one configuration build with.
///
/// Tool definitions themselves (command lines, substitution patterns) are
/// the front end's business; emission only needs the toolchain's identity,
/// its deps (which must be complete before any of its targets run), and
/// whether its solink tool emits a table-of-contents file next to shared
/// libraries.
#[derive(Debug)]
pub struct Toolchain {
    pub label: Label,
    pub deps: Vec<DepPair>,
    pub shared_lib_toc: bool,
}

impl Toolchain {
    pub fn new(label: Label) -> Self {
        Toolchain {
            label,
            deps: Vec::new(),
            shared_lib_toc: false,
        }
    }
}
