//! Query model for filtered, limited document streams.
//!
//! A [`DocQuery`] is a flat list of field filters plus an optional result
//! limit. Filters compose conjunctively (AND) in the order applied; the
//! store backend interprets the conjunction and delivers results in its
//! natural order, with no ordering added by this layer.

use std::fmt;

use bson::Bson;

/// Comparison operators accepted by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Less than.
    Lt,
    /// Less than or equal to.
    Le,
    /// Equal to (exact match).
    Eq,
    /// Greater than or equal to.
    Ge,
    /// Greater than.
    Gt,
    /// Array field contains the value.
    ArrayContains,
}

impl FilterOp {
    /// The operator's wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Eq => "==",
            FilterOp::Ge => ">=",
            FilterOp::Gt => ">",
            FilterOp::ArrayContains => "array_contains",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field comparison applied to a query.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: Bson,
}

/// A structured query over one collection: conjunctive field filters plus an
/// optional maximum result count.
#[derive(Debug, Clone, Default)]
pub struct DocQuery {
    /// Filters, applied conjunctively in order.
    pub filters: Vec<FieldFilter>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl DocQuery {
    /// Creates an empty query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field filter.
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Bson>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
