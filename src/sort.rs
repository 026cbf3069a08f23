/// TabFrame Sort Keys
///
/// Sort keys name a column and a direction. `Column::sort_index` turns one
/// column into a permutation; `Table::arrange` combines several keys into a
/// single stable comparator.

use crate::column::Column;
use crate::element::{DataType, Element};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// A single sort key: a column name and a direction.
///
/// ```
/// use tabframe::{SortKey, SortOrder};
///
/// let key: SortKey = serde_json::from_str(r#"{"column": "age", "order": "descending"}"#).unwrap();
/// assert_eq!(key, SortKey::descending("age"));
/// assert_eq!(SortKey::ascending("age").order, SortOrder::Ascending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Descending,
        }
    }

    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        SortKey {
            column: column.into(),
            order,
        }
    }

    pub fn is_reverse(&self) -> bool {
        self.order == SortOrder::Descending
    }
}

/// Ascending order of two elements of the same column.
///
/// Missing values compare smaller than every present value and equal to
/// each other. Strings compare lexicographically, numbers numerically.
pub(crate) fn compare_elements(a: &Element, b: &Element) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    match (a, b) {
        (Element::String(x), Element::String(y)) => x.cmp(y),
        (Element::Int(x), Element::Int(y)) => x.cmp(y),
        (Element::Bool(x), Element::Bool(y)) => x.cmp(y),
        _ => a
            .as_float()
            .partial_cmp(&b.as_float())
            .unwrap_or(Ordering::Equal),
    }
}

impl Column {
    /// Positions that would put this column in ascending order, or
    /// descending when `reverse` is set. The column is not modified.
    ///
    /// The sort is stable: equal values keep their current relative order.
    /// Missing values sort first ascending and last descending.
    ///
    /// # Panics
    ///
    /// Panics if the column is Bool. `Table::arrange` checks key types and
    /// returns an error instead.
    ///
    /// ```
    /// use tabframe::{Column, DataType};
    ///
    /// let col = Column::from_values("n", DataType::Int, vec![3, 1, 2]);
    /// assert_eq!(col.sort_index(false), vec![1, 2, 0]);
    /// assert_eq!(col.sort_index(true), vec![0, 2, 1]);
    /// ```
    pub fn sort_index(&self, reverse: bool) -> Vec<usize> {
        assert!(
            self.dtype() != DataType::Bool,
            "cannot sort bool column '{}'",
            self.name()
        );

        let elements = self.elements();
        let mut positions: Vec<usize> = (0..elements.len()).collect();
        positions.sort_by(|&a, &b| {
            let ordering = compare_elements(&elements[a], &elements[b]);
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        });
        positions
    }
}
