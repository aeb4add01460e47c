//! Column-oriented response table
//!
//! One row per respondent, one column per effective column name. The table is
//! immutable once built; masks and results are row-index-aligned views over it.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::cell::is_missing;
use super::errors::{DatasetError, DatasetResult};

/// A single named column of respondent cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Returns the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all cells in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the cell at `row`
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Counts non-missing cells
    pub fn non_missing_count(&self) -> usize {
        self.values.iter().filter(|v| !is_missing(v)).count()
    }
}

/// The response dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from named columns.
    ///
    /// All columns must have the same length. Empty strings are stored as
    /// `null` so that every consumer sees a single missing representation.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> DatasetResult<Self> {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut dataset = Dataset {
            columns: Vec::with_capacity(columns.len()),
            index: HashMap::new(),
            row_count,
        };

        for (name, values) in columns {
            if values.len() != row_count {
                return Err(DatasetError::ColumnLengthMismatch {
                    column: name,
                    expected: row_count,
                    found: values.len(),
                });
            }
            if dataset.index.contains_key(&name) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            dataset.push_column(name, values);
        }

        Ok(dataset)
    }

    /// Builds a dataset from row objects.
    ///
    /// The column set is the union of keys over all rows, in first-seen order.
    /// Keys absent from a row are missing for that row.
    pub fn from_rows(rows: &[Map<String, Value>]) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for row in rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    names.push(key.clone());
                }
            }
        }

        let mut dataset = Dataset {
            columns: Vec::with_capacity(names.len()),
            index: HashMap::new(),
            row_count: rows.len(),
        };

        for name in names {
            let values = rows
                .iter()
                .map(|row| row.get(&name).cloned().unwrap_or(Value::Null))
                .collect();
            dataset.push_column(name, values);
        }

        dataset
    }

    fn push_column(&mut self, name: String, values: Vec<Value>) {
        let values = values
            .into_iter()
            .map(|v| if is_missing(&v) && !v.is_array() { Value::Null } else { v })
            .collect();
        self.index.insert(name.clone(), self.columns.len());
        self.columns.push(Column { name, values });
    }

    /// Returns the number of respondents
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the column with the given name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Returns true if the column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
