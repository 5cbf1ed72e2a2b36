/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! The tagged value model of the declarative language.
//!
//! Values are a closed sum of string, boolean, integer, list, and scope
//! (a string-keyed map). Every value can carry the source span it was
//! written at; the span participates in diagnostics but never in equality.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::paths::SourceFile;

/// Where a value was written, for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Origin {
    pub file: SourceFile,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueType {
    String,
    Bool,
    Int,
    List,
    Scope,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "boolean",
            ValueType::Int => "integer",
            ValueType::List => "list",
            ValueType::Scope => "scope",
        }
    }
}

#[derive(Debug, Error)]
#[error("expected a {} but got a {}", .expected.name(), .actual.name())]
pub struct ValueTypeMismatch {
    pub expected: ValueType,
    pub actual: ValueType,
    pub origin: Option<Origin>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueKind {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<Value>),
    Scope(IndexMap<String, Value>),
}

/// A tagged value plus its optional origin. Equality ignores the origin.
#[derive(Clone, Debug)]
pub struct Value {
    kind: ValueKind,
    origin: Option<Origin>,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Value {}

impl Value {
    pub fn string<S: Into<String>>(s: S) -> Self {
        Value {
            kind: ValueKind::String(s.into()),
            origin: None,
        }
    }

    pub fn bool(b: bool) -> Self {
        Value {
            kind: ValueKind::Bool(b),
            origin: None,
        }
    }

    pub fn int(i: i64) -> Self {
        Value {
            kind: ValueKind::Int(i),
            origin: None,
        }
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value {
            kind: ValueKind::List(items),
            origin: None,
        }
    }

    pub fn scope(map: IndexMap<String, Value>) -> Self {
        Value {
            kind: ValueKind::Scope(map),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            ValueKind::String(_) => ValueType::String,
            ValueKind::Bool(_) => ValueType::Bool,
            ValueKind::Int(_) => ValueType::Int,
            ValueKind::List(_) => ValueType::List,
            ValueKind::Scope(_) => ValueType::Scope,
        }
    }

    fn mismatch(&self, expected: ValueType) -> ValueTypeMismatch {
        ValueTypeMismatch {
            expected,
            actual: self.value_type(),
            origin: self.origin.clone(),
        }
    }

    pub fn verify_string(&self) -> Result<&str, ValueTypeMismatch> {
        match &self.kind {
            ValueKind::String(s) => Ok(s),
            _ => Err(self.mismatch(ValueType::String)),
        }
    }

    pub fn verify_bool(&self) -> Result<bool, ValueTypeMismatch> {
        match &self.kind {
            ValueKind::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(ValueType::Bool)),
        }
    }

    pub fn verify_int(&self) -> Result<i64, ValueTypeMismatch> {
        match &self.kind {
            ValueKind::Int(i) => Ok(*i),
            _ => Err(self.mismatch(ValueType::Int)),
        }
    }

    pub fn verify_list(&self) -> Result<&[Value], ValueTypeMismatch> {
        match &self.kind {
            ValueKind::List(items) => Ok(items),
            _ => Err(self.mismatch(ValueType::List)),
        }
    }

    pub fn verify_scope(&self) -> Result<&IndexMap<String, Value>, ValueTypeMismatch> {
        match &self.kind {
            ValueKind::Scope(map) => Ok(map),
            _ => Err(self.mismatch(ValueType::Scope)),
        }
    }

    /// Appends the elements of `other` to this list. Both sides must be
    /// lists.
    pub fn concat_list(&mut self, other: &Value) -> Result<(), ValueTypeMismatch> {
        let tail = other.verify_list()?.to_vec();
        match &mut self.kind {
            ValueKind::List(items) => {
                items.extend(tail);
                Ok(())
            }
            _ => Err(self.mismatch(ValueType::List)),
        }
    }
}

impl fmt::Display for Value {
    /// The declarative-language literal form: strings quoted, lists
    /// bracketed, scopes braced.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::String(s) => write!(f, "\"{}\"", s),
            ValueKind::Bool(b) => write!(f, "{}", b),
            ValueKind::Int(i) => write!(f, "{}", i),
            ValueKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ValueKind::Scope(map) => {
                write!(f, "{{")?;
                for (key, value) in map {
                    write!(f, " {} = {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}
