/// TabFrame Text Records
///
/// The two rectangular-text shapes readers, writers and renderers exchange
/// with a table: building from rows of text fields plus a type per column,
/// and extracting every element as text.

use crate::column::Column;
use crate::element::DataType;
use crate::error::{Result, TableError};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Layout of extracted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    /// One inner vector per row
    #[default]
    Rows,
    /// One inner vector per column
    Columns,
}

/// Options for [`Table::records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordOptions {
    pub orient: Orient,
    /// Prefix the column names (a header row, or each column's first field).
    pub header: bool,
    /// Add a leading `Index` column numbering rows from 1.
    pub index: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        RecordOptions {
            orient: Orient::Rows,
            header: true,
            index: false,
        }
    }
}

impl RecordOptions {
    pub fn rows() -> Self {
        Self::default()
    }

    pub fn columns() -> Self {
        RecordOptions {
            orient: Orient::Columns,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }
}

/// Header of the row-number column added by `RecordOptions::index`.
pub const INDEX_HEADER: &str = "Index";

impl Table {
    /// Build a table from rows of text fields, coercing each field with its
    /// column's type.
    ///
    /// Without `names`, the first row is the header. Every row must have one
    /// field per type.
    ///
    /// ```
    /// use tabframe::{DataType, RecordOptions, Table};
    ///
    /// let rows = vec![
    ///     vec!["name", "age"],
    ///     vec!["Alice", "30"],
    ///     vec!["Bob", "n/a"],
    /// ];
    /// let table = Table::load_records(&rows, None, &[DataType::String, DataType::Int]).unwrap();
    ///
    /// assert_eq!(table.size(), (2, 2));
    /// assert!(table.cell(1, "age").unwrap().is_nan());
    /// assert_eq!(table.records(RecordOptions::rows()), vec![
    ///     vec!["name", "age"],
    ///     vec!["Alice", "30"],
    ///     vec!["Bob", "NaN"],
    /// ]);
    /// ```
    pub fn load_records<S: AsRef<str>>(rows: &[Vec<S>], names: Option<&[S]>, types: &[DataType]) -> Result<Table> {
        let (header, data): (Vec<&str>, &[Vec<S>]) = match names {
            Some(names) => (names.iter().map(AsRef::as_ref).collect(), rows),
            None => {
                let (first, rest) = rows
                    .split_first()
                    .ok_or_else(|| TableError::EmptyInput("no header row".to_string()))?;
                (first.iter().map(AsRef::as_ref).collect(), rest)
            }
        };

        if header.len() != types.len() {
            return Err(TableError::ColumnCountMismatch {
                expected: types.len(),
                found: header.len(),
            });
        }
        if let Some(row) = data.iter().find(|row| row.len() != types.len()) {
            return Err(TableError::LengthMismatch {
                expected: types.len(),
                found: row.len(),
            });
        }

        let columns = header
            .iter()
            .zip(types)
            .enumerate()
            .map(|(j, (name, &dtype))| {
                Column::from_values(*name, dtype, data.iter().map(|row| row[j].as_ref()))
            })
            .collect();
        Table::new(columns)
    }

    /// Every element as text, laid out per `options`.
    ///
    /// Missing values appear as `"NaN"`.
    pub fn records(&self, options: RecordOptions) -> Vec<Vec<String>> {
        let nrows = self.nrows();
        let row_number = |i: usize| (i + 1).to_string();

        match options.orient {
            Orient::Rows => {
                let mut out = Vec::with_capacity(nrows + 1);
                if options.header {
                    let mut header = Vec::with_capacity(self.ncols() + 1);
                    if options.index {
                        header.push(INDEX_HEADER.to_string());
                    }
                    header.extend(self.names().into_iter().map(str::to_string));
                    out.push(header);
                }
                for i in 0..nrows {
                    let mut row = Vec::with_capacity(self.ncols() + 1);
                    if options.index {
                        row.push(row_number(i));
                    }
                    row.extend(self.columns.iter().map(|c| c.elements()[i].as_text()));
                    out.push(row);
                }
                out
            }
            Orient::Columns => {
                let prefixed = |name: &str, values: Vec<String>| {
                    if options.header {
                        std::iter::once(name.to_string()).chain(values).collect()
                    } else {
                        values
                    }
                };
                let mut out = Vec::with_capacity(self.ncols() + 1);
                if options.index {
                    out.push(prefixed(INDEX_HEADER, (0..nrows).map(row_number).collect()));
                }
                out.extend(self.columns.iter().map(|c| prefixed(c.name(), c.records())));
                out
            }
        }
    }
}
