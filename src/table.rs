/// TabFrame Table Implementation
///
/// A Table is an ordered collection of equal-length columns.
/// Provides row and column editing, concatenation, sorting, subsetting and
/// predicate filtering.
///
/// Every fallible operation validates its whole input before touching any
/// column, so a failed call leaves the table as it was.
///
/// # Examples
///
/// ```
/// use tabframe::{ColumnData, Element, Table};
/// use std::collections::HashMap;
///
/// let mut table = Table::from_data(vec![
///     ("name", ColumnData::from(vec!["Alice", "Bob"])),
///     ("age", ColumnData::from(vec![30i64, 25])),
/// ])
/// .unwrap();
///
/// // Append a row by name; unnamed columns get their missing value
/// let mut row = HashMap::new();
/// row.insert("name".to_string(), Element::from("Carol"));
/// table.set(table.nrows(), row).unwrap();
///
/// assert_eq!(table.size(), (3, 2));
/// assert_eq!(table.cell(2, "name").unwrap().as_text(), "Carol");
/// assert!(table.cell(2, "age").unwrap().is_nan());
/// ```

use crate::column::{Column, ColumnData};
use crate::element::{DataType, Element};
use crate::error::{equal_length, Result, TableError};
use crate::expr::{FilterValue, RelationalOperator};
use crate::sort::{compare_elements, SortKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Column names and types of a table, in column order.
///
/// ```
/// use tabframe::{ColumnData, DataType, Table};
///
/// let table = Table::from_data(vec![
///     ("id", ColumnData::from(vec![1i64])),
///     ("email", ColumnData::from(vec!["a@b.c"])),
/// ])
/// .unwrap();
///
/// let schema = table.schema();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_column_index("email"), Some(1));
/// assert_eq!(schema.get_column_type("id"), Some(DataType::Int));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<(String, DataType)>,
}

impl Schema {
    pub fn new(columns: Vec<(String, DataType)>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Index of the first column called `name`.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    pub fn get_column_type(&self, name: &str) -> Option<DataType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

/// Values for one row, either in column order or by column name.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    Positional(Vec<Element>),
    Named(Vec<(String, Element)>),
}

impl From<Vec<Element>> for RowValues {
    fn from(values: Vec<Element>) -> Self {
        RowValues::Positional(values)
    }
}

impl From<Vec<(String, Element)>> for RowValues {
    fn from(values: Vec<(String, Element)>) -> Self {
        RowValues::Named(values)
    }
}

impl From<HashMap<String, Element>> for RowValues {
    fn from(values: HashMap<String, Element>) -> Self {
        RowValues::Named(values.into_iter().collect())
    }
}

/// One row filter: `column operator value`, combined with the previous
/// predicates by AND unless `or` is set.
///
/// ```
/// use tabframe::{Predicate, RelationalOperator};
///
/// let json = r#"[
///     {"column": "age", "operator": "GreaterThan", "value": 30},
///     {"column": "city", "operator": "In", "value": ["Oslo", "Rome"], "or": true}
/// ]"#;
/// let predicates: Vec<Predicate> = serde_json::from_str(json).unwrap();
/// assert_eq!(predicates[0], Predicate::new("age", RelationalOperator::GreaterThan, 30));
/// assert!(predicates[1].or);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub operator: RelationalOperator,
    pub value: FilterValue,
    #[serde(default)]
    pub or: bool,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: RelationalOperator, value: impl Into<FilterValue>) -> Self {
        Predicate {
            column: column.into(),
            operator,
            value: value.into(),
            or: false,
        }
    }

    /// Combine with the running result by union instead of intersection.
    pub fn or(mut self) -> Self {
        self.or = true;
        self
    }
}

/// An ordered collection of equal-length columns.
///
/// `Clone` is a deep copy. Name lookups resolve to the first column with
/// that name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub(crate) columns: Vec<Column>,
}

impl Table {
    /// Build a table from columns, which must all have the same length.
    pub fn new(mut columns: Vec<Column>) -> Result<Self> {
        equal_length(columns.iter().map(Column::len))?;
        for column in &mut columns {
            column.init_index();
        }
        Ok(Table { columns })
    }

    /// Build a table from named typed vectors or existing columns.
    pub fn from_data<I, N>(data: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, ColumnData)>,
        N: Into<String>,
    {
        Self::new(
            data.into_iter()
                .map(|(name, values)| values.into_column(name))
                .collect(),
        )
    }

    // ==================== Shape and lookup ====================

    /// `(rows, columns)`
    pub fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Length of the first column, 0 without columns.
    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn types(&self) -> Vec<DataType> {
        self.columns.iter().map(Column::dtype).collect()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| (c.name().to_string(), c.dtype()))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        Ok(&self.columns[self.position(name)?])
    }

    /// Copy of the named columns, in the given order.
    pub fn select_cols(&self, names: &[&str]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| self.column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Table { columns })
    }

    pub fn cell(&self, row: usize, name: &str) -> Result<&Element> {
        self.column(name)?.element(row)
    }

    /// Row `index` as a name to element mapping.
    pub fn row(&self, index: usize) -> Result<HashMap<String, Element>> {
        let mut row = HashMap::with_capacity(self.ncols());
        for column in &self.columns {
            let element = column.element(index)?;
            row.entry(column.name().to_string())
                .or_insert_with(|| element.clone());
        }
        Ok(row)
    }

    // ==================== Row editing ====================

    fn validate_row(&self, values: &RowValues) -> Result<()> {
        match values {
            RowValues::Positional(values) => {
                if values.len() != self.ncols() {
                    return Err(TableError::ColumnCountMismatch {
                        expected: self.ncols(),
                        found: values.len(),
                    });
                }
            }
            RowValues::Named(values) => {
                for (name, _) in values {
                    self.position(name)?;
                }
            }
        }
        Ok(())
    }

    /// Update row `index` in place, or append one row when `index` is at or
    /// past the end.
    ///
    /// Appending with named values fills the other columns with their
    /// missing value (`false` for Bool).
    pub fn set(&mut self, index: usize, values: impl Into<RowValues>) -> Result<()> {
        let values = values.into();
        self.validate_row(&values)?;
        self.apply_row(index, values)
    }

    fn apply_row(&mut self, index: usize, values: RowValues) -> Result<()> {
        let append = index >= self.nrows();
        match values {
            RowValues::Positional(values) => {
                for (column, value) in self.columns.iter_mut().zip(values) {
                    if append {
                        column.push(value);
                    } else {
                        column.set(index, value)?;
                    }
                }
            }
            RowValues::Named(values) => {
                let mut by_position: HashMap<usize, Element> = HashMap::with_capacity(values.len());
                for (name, value) in values {
                    by_position.insert(self.position(&name)?, value);
                }
                for (i, column) in self.columns.iter_mut().enumerate() {
                    match (by_position.remove(&i), append) {
                        (Some(value), false) => column.set(index, value)?,
                        (Some(value), true) => column.push(value),
                        (None, true) => column.push(Element::missing(column.dtype())),
                        (None, false) => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Append each row at the end. Nothing is appended if any row is invalid.
    pub fn add_rows<R: Into<RowValues>>(&mut self, rows: Vec<R>) -> Result<()> {
        let rows: Vec<RowValues> = rows.into_iter().map(Into::into).collect();
        for row in &rows {
            self.validate_row(row)?;
        }
        for row in rows {
            let end = self.nrows();
            self.apply_row(end, row)?;
        }
        Ok(())
    }

    // ==================== Column editing ====================

    /// Insert a column, or overwrite the first column called `name`.
    ///
    /// Short input is padded with `default`; long input is truncated to the
    /// table's row count. A table without columns takes the input as is.
    ///
    /// ```
    /// use tabframe::{ColumnData, Element, Table, TableError};
    ///
    /// let mut table = Table::from_data(vec![("id", ColumnData::from(vec![1i64, 2, 3]))]).unwrap();
    /// table.add_col("score", vec![9.5], Some(Element::from(0.0))).unwrap();
    /// assert_eq!(table.column("score").unwrap().floats(), vec![9.5, 0.0, 0.0]);
    ///
    /// let err = table.add_col("tag", vec!["x"], None).unwrap_err();
    /// assert_eq!(err, TableError::MissingDefault { column: "tag".to_string(), missing: 2 });
    /// ```
    pub fn add_col(
        &mut self,
        name: impl Into<String>,
        values: impl Into<ColumnData>,
        default: Option<Element>,
    ) -> Result<()> {
        let name = name.into();
        let mut column = values.into().into_column(name.clone());

        if !self.columns.is_empty() {
            let rows = self.nrows();
            if column.len() < rows {
                let missing = rows - column.len();
                let default = default.ok_or(TableError::MissingDefault {
                    column: name.clone(),
                    missing,
                })?;
                column.extend(std::iter::repeat(default).take(missing));
            } else if column.len() > rows {
                let keep: Vec<usize> = (0..rows).collect();
                column = column.subset(&keep)?;
            }
        }
        column.init_index();

        match self.columns.iter().position(|c| c.name() == name) {
            Some(i) => self.columns[i] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Remove every column whose name is listed.
    pub fn drop_cols(&mut self, names: &[&str]) {
        for name in names {
            if !self.columns.iter().any(|c| c.name() == *name) {
                log::debug!("drop_cols: no column named '{}'", name);
            }
        }
        self.columns.retain(|c| !names.contains(&c.name()));
    }

    /// Rename columns by `(old, new)` pairs. Unknown names are skipped with a
    /// warning. Pairs are resolved against the names before any renaming.
    pub fn rename<I, K, V>(&mut self, renames: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut resolved = Vec::new();
        for (old, new) in renames {
            match self.position(old.as_ref()) {
                Ok(i) => resolved.push((i, new.into())),
                Err(_) => log::warn!("rename: no column named '{}', skipping", old.as_ref()),
            }
        }
        for (i, new) in resolved {
            self.columns[i].set_name(new);
        }
    }

    /// Replace every element of the named columns with `f(row, element)`,
    /// coerced back into each column's type.
    pub fn format_cols<F>(&mut self, mut f: F, names: &[&str]) -> Result<()>
    where
        F: FnMut(usize, &Element) -> Element,
    {
        let positions = names
            .iter()
            .map(|name| self.position(name))
            .collect::<Result<Vec<_>>>()?;
        for i in positions {
            self.columns[i].format(&mut f);
        }
        Ok(())
    }

    // ==================== Composition ====================

    /// Append `other` to this table.
    ///
    /// With `by_column`, every column of `other` is added through
    /// [`Table::add_col`] and the row counts must match. Otherwise the rows
    /// of `other` are appended to the columns with the same name, converting
    /// toward this table's types; both tables must have the same set of
    /// column names.
    pub fn concat(&mut self, other: &Table, by_column: bool) -> Result<()> {
        if by_column {
            if !self.columns.is_empty() && self.nrows() != other.nrows() {
                return Err(TableError::LengthMismatch {
                    expected: self.nrows(),
                    found: other.nrows(),
                });
            }
            for column in &other.columns {
                self.add_col(column.name(), column.clone(), None)?;
            }
            return Ok(());
        }

        let mut left: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        let mut right: Vec<String> = other.names().into_iter().map(str::to_string).collect();
        left.sort();
        right.sort();
        if left != right {
            return Err(TableError::ColumnSetMismatch { left, right });
        }

        for column in &mut self.columns {
            let source = other.column(column.name())?;
            column.concat(source);
        }
        Ok(())
    }

    // ==================== Queries ====================

    /// Sort rows in place by `keys`, the first key being most significant.
    ///
    /// The sort is stable and missing values sort first in ascending order.
    /// Bool key columns are rejected before any row moves.
    ///
    /// ```
    /// use tabframe::{ColumnData, SortKey, Table};
    ///
    /// let mut table = Table::from_data(vec![
    ///     ("group", ColumnData::from(vec!["b", "a", "b", "a"])),
    ///     ("n", ColumnData::from(vec![1i64, 2, 3, 4])),
    /// ])
    /// .unwrap();
    /// table
    ///     .arrange(&[SortKey::ascending("group"), SortKey::descending("n")])
    ///     .unwrap();
    /// assert_eq!(table.column("n").unwrap().ints(), vec![4, 2, 3, 1]);
    /// ```
    pub fn arrange(&mut self, keys: &[SortKey]) -> Result<()> {
        let mut resolved = Vec::with_capacity(keys.len());
        for key in keys {
            let i = self.position(&key.column)?;
            if self.columns[i].dtype() == DataType::Bool {
                return Err(TableError::UnsortableType(DataType::Bool));
            }
            resolved.push((i, key.is_reverse()));
        }
        if resolved.is_empty() {
            return Ok(());
        }

        let mut order: Vec<usize> = (0..self.nrows()).collect();
        order.sort_by(|&a, &b| {
            for &(i, reverse) in &resolved {
                let elements = self.columns[i].elements();
                let ordering = compare_elements(&elements[a], &elements[b]);
                let ordering = if reverse { ordering.reverse() } else { ordering };
                if ordering.is_ne() {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });

        let mut columns = Vec::with_capacity(self.ncols());
        for column in &self.columns {
            let mut sorted = column.subset(&order)?;
            sorted.init_index();
            columns.push(sorted);
        }
        self.columns = columns;
        Ok(())
    }

    /// Copy of the rows at `indexes`, in the given order.
    pub fn subset(&self, indexes: &[usize]) -> Result<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.subset(indexes))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table { columns })
    }

    /// Copy of the rows matching `predicates`.
    ///
    /// The first predicate selects the starting rows; each later one is
    /// intersected with them, or unioned when its `or` flag is set. Rows
    /// keep their original order. No predicates selects every row.
    ///
    /// ```
    /// use tabframe::{ColumnData, Predicate, RelationalOperator, Table};
    ///
    /// let table = Table::from_data(vec![
    ///     ("name", ColumnData::from(vec!["ann", "bob", "cid", "dan"])),
    ///     ("age", ColumnData::from(vec![17i64, 42, 35, 70])),
    /// ])
    /// .unwrap();
    ///
    /// let adults_under_60 = table
    ///     .filter(&[
    ///         Predicate::new("age", RelationalOperator::GreaterOrEqual, 18),
    ///         Predicate::new("age", RelationalOperator::LessThan, 60),
    ///     ])
    ///     .unwrap();
    /// assert_eq!(adults_under_60.column("name").unwrap().records(), vec!["bob", "cid"]);
    /// ```
    pub fn filter(&self, predicates: &[Predicate]) -> Result<Table> {
        let Some((first, rest)) = predicates.split_first() else {
            return Ok(self.clone());
        };

        let mut keep: BTreeSet<usize> = self.matching_rows(first)?.into_iter().collect();
        for predicate in rest {
            let rows: BTreeSet<usize> = self.matching_rows(predicate)?.into_iter().collect();
            keep = if predicate.or {
                keep.union(&rows).copied().collect()
            } else {
                keep.intersection(&rows).copied().collect()
            };
        }

        let indexes: Vec<usize> = keep.into_iter().collect();
        self.subset(&indexes)
    }

    fn matching_rows(&self, predicate: &Predicate) -> Result<Vec<usize>> {
        self.column(&predicate.column)?
            .filter_positions(predicate.operator, &predicate.value)
    }
}
