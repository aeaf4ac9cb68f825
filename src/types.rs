//! Core types for the expense mirror.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an expense document.
///
/// Assigned by the remote store and stable across updates; the mirror never
/// generates ids of its own.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        ExpenseId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExpenseId({})", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        ExpenseId(s.to_string())
    }
}

impl From<String> for ExpenseId {
    fn from(s: String) -> Self {
        ExpenseId(s)
    }
}

/// A single expense entry mirrored from the remote collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Document id (assigned by the remote store).
    pub id: ExpenseId,

    /// Display label, used by renderers for legends and tooltips.
    pub name: String,

    /// Monthly cost. Weights the expense's chart sector; negative or zero
    /// values degrade the visual output but are not rejected here.
    pub cost: f64,
}

impl Expense {
    pub fn new(id: impl Into<ExpenseId>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }

    /// Build an expense from a raw remote document payload plus its
    /// store-assigned id.
    ///
    /// Remote payloads are not trusted to be well-formed: a missing or
    /// mistyped `name`/`cost` falls back to a default rather than failing,
    /// since a degraded sector is still renderable.
    pub fn from_document(id: impl Into<ExpenseId>, data: &serde_json::Value) -> Self {
        let name = data
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let cost = data
            .get("cost")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);

        Self {
            id: id.into(),
            name,
            cost,
        }
    }
}

/// A single change observed on the remote collection.
///
/// Batches of these arrive in commit order; later events for the same id
/// supersede earlier ones within a batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A document was added to the collection.
    Added { expense: Expense },

    /// An existing document's payload changed.
    Modified { expense: Expense },

    /// A document was deleted. Only the id survives deletion upstream.
    Removed { id: ExpenseId },
}

impl ChangeEvent {
    /// The id of the document this event refers to.
    pub fn id(&self) -> &ExpenseId {
        match self {
            ChangeEvent::Added { expense } | ChangeEvent::Modified { expense } => &expense.id,
            ChangeEvent::Removed { id } => id,
        }
    }
}
