/// TabFrame Column Implementation
///
/// A Column (series) is a named, ordered sequence of elements that all share
/// one logical type, plus a permutation recording which source positions the
/// elements came from.
///
/// Every operation that appends or rebuilds the elements resets the
/// permutation to the identity `[0..len)`. Subsetting records the kept
/// positions instead, which is how table filters translate a column match
/// back into row positions.

use crate::element::{DataType, Element};
use crate::error::{Result, TableError};
use std::fmt::Debug;

/// Typed input for building a column.
///
/// This is the closed set of inputs accepted by table construction and
/// `Table::add_col`: a typed vector, or an existing column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Strings(Vec<String>),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Bools(Vec<bool>),
    Column(Column),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Strings(v) => v.len(),
            ColumnData::Ints(v) => v.len(),
            ColumnData::Floats(v) => v.len(),
            ColumnData::Bools(v) => v.len(),
            ColumnData::Column(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::Strings(_) => DataType::String,
            ColumnData::Ints(_) => DataType::Int,
            ColumnData::Floats(_) => DataType::Float,
            ColumnData::Bools(_) => DataType::Bool,
            ColumnData::Column(c) => c.dtype(),
        }
    }

    /// Build a column named `name`. An existing column is renamed.
    pub fn into_column(self, name: impl Into<String>) -> Column {
        let name = name.into();
        match self {
            ColumnData::Strings(v) => Column::from_values(name, DataType::String, v),
            ColumnData::Ints(v) => Column::from_values(name, DataType::Int, v),
            ColumnData::Floats(v) => Column::from_values(name, DataType::Float, v),
            ColumnData::Bools(v) => Column::from_values(name, DataType::Bool, v),
            ColumnData::Column(mut c) => {
                c.set_name(name);
                c
            }
        }
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(v: Vec<String>) -> Self {
        ColumnData::Strings(v)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(v: Vec<&str>) -> Self {
        ColumnData::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(v: Vec<i64>) -> Self {
        ColumnData::Ints(v)
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(v: Vec<f64>) -> Self {
        ColumnData::Floats(v)
    }
}

impl From<Vec<bool>> for ColumnData {
    fn from(v: Vec<bool>) -> Self {
        ColumnData::Bools(v)
    }
}

impl From<Column> for ColumnData {
    fn from(c: Column) -> Self {
        ColumnData::Column(c)
    }
}

/// A named, homogeneously typed sequence of elements.
///
/// `Clone` is a deep copy: no element storage is shared between columns.
#[derive(Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    elements: Vec<Element>,
    indexes: Vec<usize>,
}

impl Column {
    /// Create an empty column.
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Column {
            name: name.into(),
            dtype,
            elements: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Create a column by coercing every value into `dtype`.
    ///
    /// ```
    /// use tabframe::{Column, DataType};
    ///
    /// let col = Column::from_values("age", DataType::Int, vec!["20", "x", "30"]);
    /// assert_eq!(col.len(), 3);
    /// assert_eq!(col.records(), vec!["20", "NaN", "30"]);
    /// ```
    pub fn from_values<I, V>(name: impl Into<String>, dtype: DataType, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Element>,
    {
        let mut column = Column::new(name, dtype);
        column.extend(values);
        column
    }

    /// Create a column from text fields using `dtype`'s coercion rules.
    pub fn load_records<S: AsRef<str>>(name: impl Into<String>, dtype: DataType, values: &[S]) -> Self {
        Self::from_values(name, dtype, values.iter().map(|v| v.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Result<&Element> {
        self.elements.get(index).ok_or(TableError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Coerce `value` into the element at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Element>) -> Result<()> {
        let len = self.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or(TableError::IndexOutOfRange { index, len })?;
        element.set(value);
        Ok(())
    }

    /// Source positions of the current elements.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Reset the permutation to `[0..len)`.
    pub fn init_index(&mut self) {
        self.indexes = (0..self.elements.len()).collect();
    }

    pub(crate) fn clear_index(&mut self) {
        self.indexes.clear();
    }

    /// True if any element holds its missing sentinel.
    pub fn has_nan(&self) -> bool {
        self.elements.iter().any(Element::is_nan)
    }

    // ==================== Mutation ====================

    /// Append a single value.
    pub fn push(&mut self, value: impl Into<Element>) {
        self.elements.push(Element::new(self.dtype, value));
        self.init_index();
    }

    /// Append every value of a sequence.
    pub fn extend<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Element>,
    {
        let dtype = self.dtype;
        self.elements
            .extend(values.into_iter().map(|v| Element::new(dtype, v)));
        self.init_index();
    }

    /// Append copies of another column's elements, coerced into this type.
    pub fn append_column(&mut self, other: &Column) {
        let dtype = self.dtype;
        self.elements
            .extend(other.elements.iter().map(|e| e.cast(dtype)));
        self.init_index();
    }

    /// Append `other`, converting it toward this column's type first.
    pub fn concat(&mut self, other: &Column) {
        if other.dtype != self.dtype {
            log::warn!(
                "concatenating {} column '{}' onto {} column '{}', converting",
                other.dtype,
                other.name,
                self.dtype,
                self.name
            );
        }
        self.append_column(other);
    }

    /// Return a copy without the elements at `indexes`.
    ///
    /// Duplicate positions are collapsed. The surviving permutation entries
    /// are kept.
    pub fn drop(&self, indexes: &[usize]) -> Result<Column> {
        let mut positions = indexes.to_vec();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions.dedup();

        if let Some(&max) = positions.first() {
            if max >= self.len() {
                return Err(TableError::IndexOutOfRange {
                    index: max,
                    len: self.len(),
                });
            }
        }

        let mut column = self.clone();
        for index in positions {
            column.elements.remove(index);
            if index < column.indexes.len() {
                column.indexes.remove(index);
            }
        }
        Ok(column)
    }

    /// Return a copy holding only `indexes`, in the given order.
    ///
    /// The given positions become the new permutation.
    pub fn subset(&self, indexes: &[usize]) -> Result<Column> {
        if let Some(&bad) = indexes.iter().find(|&&i| i >= self.len()) {
            return Err(TableError::IndexOutOfRange {
                index: bad,
                len: self.len(),
            });
        }

        Ok(Column {
            name: self.name.clone(),
            dtype: self.dtype,
            elements: indexes.iter().map(|&i| self.elements[i].clone()).collect(),
            indexes: indexes.to_vec(),
        })
    }

    /// Convert every element to `dtype`. Never fails; values that do not
    /// convert become the new type's missing value.
    pub fn set_type(&mut self, dtype: DataType) {
        if self.dtype == dtype {
            return;
        }
        self.elements = self.elements.iter().map(|e| e.cast(dtype)).collect();
        self.dtype = dtype;
        self.init_index();
    }

    /// Replace every element with `f(index, element)`, coerced into this
    /// column's type.
    pub fn format<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &Element) -> Element,
    {
        for (i, element) in self.elements.iter_mut().enumerate() {
            let next = f(i, element);
            element.update(&next);
        }
    }

    // ==================== Bulk projections ====================

    pub fn records(&self) -> Vec<String> {
        self.elements.iter().map(Element::as_text).collect()
    }

    pub fn ints(&self) -> Vec<i64> {
        self.elements.iter().map(Element::as_int).collect()
    }

    pub fn floats(&self) -> Vec<f64> {
        self.elements.iter().map(Element::as_float).collect()
    }

    pub fn bools(&self) -> Vec<bool> {
        self.elements.iter().map(Element::as_bool).collect()
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {{ name: '{}', type: {}, len: {}, values: {:?} }}",
            self.name,
            self.dtype,
            self.len(),
            self.records()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::INT_NAN;

    #[test]
    fn test_column_basic() {
        let mut col = Column::new("test", DataType::Int);
        col.push(10);
        col.push("20");
        col.push(30.7);

        assert_eq!(col.len(), 3);
        assert_eq!(col.ints(), vec![10, 20, 30]);
        assert_eq!(col.indexes(), &[0, 1, 2]);
    }

    #[test]
    fn test_column_from_data() {
        let col = ColumnData::from(vec!["a", "", "c"]).into_column("letters");
        assert_eq!(col.name(), "letters");
        assert_eq!(col.dtype(), DataType::String);
        assert_eq!(col.records(), vec!["a", "NaN", "c"]);
        assert!(col.has_nan());
    }

    #[test]
    fn test_column_append_column_coerces() {
        let mut ints = Column::from_values("n", DataType::Int, vec![1, 2]);
        let floats = Column::from_values("f", DataType::Float, vec![3.5, f64::NAN]);
        ints.append_column(&floats);

        assert_eq!(ints.ints(), vec![1, 2, 3, INT_NAN]);
        assert_eq!(ints.indexes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_column_drop() {
        let col = Column::from_values("n", DataType::Int, vec![0, 1, 2, 3, 4]);
        let dropped = col.drop(&[1, 3, 1]).unwrap();

        assert_eq!(dropped.ints(), vec![0, 2, 4]);
        assert_eq!(dropped.indexes(), &[0, 2, 4]);
        // copy-on-write
        assert_eq!(col.len(), 5);

        assert_eq!(
            col.drop(&[5]),
            Err(TableError::IndexOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn test_column_subset() {
        let col = Column::from_values("s", DataType::String, vec!["a", "b", "c", "d"]);
        let sub = col.subset(&[3, 0, 2]).unwrap();

        assert_eq!(sub.records(), vec!["d", "a", "c"]);
        assert_eq!(sub.indexes(), &[3, 0, 2]);
        assert!(col.subset(&[1, 4]).is_err());
        assert!(col.subset(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_column_set_type() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut col = Column::from_values("v", DataType::String, vec!["1", "test", "3"]);
        col.set_type(DataType::Int);

        assert_eq!(col.dtype(), DataType::Int);
        assert_eq!(col.ints(), vec![1, INT_NAN, 3]);

        col.set_type(DataType::Float);
        assert_eq!(col.records(), vec!["1", "NaN", "3"]);

        col.set_type(DataType::Bool);
        assert_eq!(col.bools(), vec![true, false, true]);
    }

    #[test]
    fn test_column_concat() {
        let mut left = Column::from_values("a", DataType::Float, vec![1.5]);
        let right = Column::from_values("a", DataType::String, vec!["2.5", "x"]);
        left.concat(&right);

        assert_eq!(left.dtype(), DataType::Float);
        assert_eq!(left.records(), vec!["1.5", "2.5", "NaN"]);
    }

    #[test]
    fn test_column_format() {
        let mut col = Column::from_values("n", DataType::Int, vec![1, 2, 3]);
        col.format(|i, e| Element::from(e.as_int() * 10 + i as i64));
        assert_eq!(col.ints(), vec![10, 21, 32]);

        // results are coerced back into the column type
        col.format(|_, e| Element::from(format!("{}", e.as_int() + 1)));
        assert_eq!(col.ints(), vec![11, 22, 33]);
        assert_eq!(col.dtype(), DataType::Int);
    }

    #[test]
    fn test_column_set() {
        let mut col = Column::from_values("b", DataType::Bool, vec![true, true]);
        col.set(1, "f").unwrap();
        assert_eq!(col.bools(), vec![true, false]);
        assert!(col.set(2, true).is_err());
    }
}
