//! Filter evaluation for in-memory document matching.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, Document, datetime::DateTime};

use docbind_core::query::{FieldFilter, FilterOp};

/// Type-erased, comparable representation of BSON values.
///
/// Normalizes all numeric types to f64 so filters compare across integer
/// widths and floats. Values of incomparable kinds never match an ordering
/// filter.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr.iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>(),
            ),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Whether `body` satisfies a single field filter.
///
/// A missing field never matches.
pub(crate) fn matches_filter(body: &Document, filter: &FieldFilter) -> bool {
    let Some(field_value) = body.get(&filter.field) else {
        return false;
    };

    let left = Comparable::from(field_value);
    let right = Comparable::from(&filter.value);

    match filter.op {
        FilterOp::Eq => left == right,
        FilterOp::Lt | FilterOp::Le | FilterOp::Ge | FilterOp::Gt => {
            match left.partial_cmp(&right) {
                Some(ordering) => match filter.op {
                    FilterOp::Lt => ordering == Ordering::Less,
                    FilterOp::Le => ordering != Ordering::Greater,
                    FilterOp::Ge => ordering != Ordering::Less,
                    FilterOp::Gt => ordering == Ordering::Greater,
                    _ => unreachable!(),
                },
                None => false,
            }
        }
        FilterOp::ArrayContains => match left {
            Comparable::Array(items) => items.iter().any(|item| item == &right),
            _ => false,
        },
    }
}

/// Whether `body` satisfies every filter of the conjunction.
pub(crate) fn matches_all(body: &Document, filters: &[FieldFilter]) -> bool {
    filters
        .iter()
        .all(|filter| matches_filter(body, filter))
}
