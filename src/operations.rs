//! PATCH-style update operations.
//!
//! The configuration API updates an object with a list of field-level
//! operations. Every resource type builds that list the same way: compare the
//! planned value of each field with the value in state and emit an operation
//! only when they differ.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a single update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Add values to a multi-valued field.
    Add,
    /// Remove a field's value, or the given values of a multi-valued field.
    Remove,
    /// Replace a single-valued field.
    Replace,
}

/// One field-level instruction of an update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// What to do.
    pub op: OperationKind,
    /// The wire name of the field.
    pub path: String,
    /// The new value, or the values to add/remove for multi-valued fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Operation {
    /// Replace `path` with `value`.
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: OperationKind::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    /// Clear `path` entirely.
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: OperationKind::Remove,
            path: path.into(),
            value: None,
        }
    }

    /// Add `values` to the multi-valued field at `path`.
    pub fn add_values(path: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            op: OperationKind::Add,
            path: path.into(),
            value: Some(Value::from(values)),
        }
    }

    /// Remove `values` from the multi-valued field at `path`.
    pub fn remove_values(path: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            op: OperationKind::Remove,
            path: path.into(),
            value: Some(Value::from(values)),
        }
    }
}

/// Body of a `PATCH` request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// The operations, applied in order.
    pub operations: Vec<Operation>,
}

impl UpdateRequest {
    /// Wrap a list of operations.
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

/// Append a `replace`/`remove` for a boolean field if plan and state differ.
pub fn add_bool_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: Option<bool>,
    state: Option<bool>,
    path: &str,
) {
    add_scalar_operation_if_necessary(ops, plan.map(Value::Bool), state.map(Value::Bool), path);
}

/// Append a `replace`/`remove` for an integer field if plan and state differ.
pub fn add_int64_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: Option<i64>,
    state: Option<i64>,
    path: &str,
) {
    add_scalar_operation_if_necessary(ops, plan.map(Value::from), state.map(Value::from), path);
}

/// Append a `replace`/`remove` for a string field if plan and state differ.
///
/// Empty strings are treated as unset on both sides.
pub fn add_string_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: Option<&str>,
    state: Option<&str>,
    path: &str,
) {
    let plan = plan.filter(|s| !s.is_empty());
    let state = state.filter(|s| !s.is_empty());
    add_scalar_operation_if_necessary(ops, plan.map(Value::from), state.map(Value::from), path);
}

fn add_scalar_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: Option<Value>,
    state: Option<Value>,
    path: &str,
) {
    if plan == state {
        return;
    }
    match plan {
        Some(value) => ops.push(Operation::replace(path, value)),
        None => ops.push(Operation::remove(path)),
    }
}

/// Append `add`/`remove` operations for a string set field.
///
/// Values present only in the plan are added and values present only in
/// state are removed. When both directions change, the whole planned set
/// replaces the field instead, so a changed field yields one operation.
/// Values are in sorted order. An absent side counts as the empty set.
pub fn add_string_set_operations_if_necessary(
    ops: &mut Vec<Operation>,
    plan: Option<&BTreeSet<String>>,
    state: Option<&BTreeSet<String>>,
    path: &str,
) {
    let empty = BTreeSet::new();
    let plan = plan.unwrap_or(&empty);
    let state = state.unwrap_or(&empty);

    let added: Vec<String> = plan.difference(state).cloned().collect();
    let removed: Vec<String> = state.difference(plan).cloned().collect();

    match (added.is_empty(), removed.is_empty()) {
        (true, true) => {},
        (false, true) => ops.push(Operation::add_values(path, added)),
        (true, false) => ops.push(Operation::remove_values(path, removed)),
        (false, false) => {
            let values: Vec<String> = plan.iter().cloned().collect();
            ops.push(Operation::replace(path, Value::from(values)));
        },
    }
}
