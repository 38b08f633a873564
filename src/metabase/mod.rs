//! The metabase: the authoritative table listing, for every dataset, which
//! dimensions and labels it uses.
//!
//! One row per (dataset, dimension, label) triple, loaded wholesale from the
//! bulk download service and immutable afterwards. Every catalog query goes
//! through the [`resolver`] over this table.

pub mod resolver;

pub use resolver::{check_membership, resolve};

use crate::error::{Error, Result};
use crate::session::RawTable;
use std::fmt;

/// Semantic columns of the metabase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Dataset,
    Dimension,
    Label,
}

impl Column {
    /// All columns, in file order.
    pub const ALL: [Column; 3] = [Column::Dataset, Column::Dimension, Column::Label];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Dataset => "dataset",
            Column::Dimension => "dimension",
            Column::Label => "label",
        }
    }

    /// Parse a column name; anything but the three semantic columns fails
    /// with [`Error::UnknownColumn`].
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "dataset" => Ok(Column::Dataset),
            "dimension" => Ok(Column::Dimension),
            "label" => Ok(Column::Label),
            other => Err(Error::UnknownColumn(other.to_string())),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (dataset, dimension, label) triple of the metabase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetabaseRow {
    pub dataset: String,
    pub dimension: String,
    pub label: String,
}

impl MetabaseRow {
    pub fn new(dataset: &str, dimension: &str, label: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            dimension: dimension.to_string(),
            label: label.to_string(),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Dataset => &self.dataset,
            Column::Dimension => &self.dimension,
            Column::Label => &self.label,
        }
    }
}

/// The full, unindexed metabase for the whole catalog.
///
/// Absent until explicitly loaded, replaced wholesale on reload, never
/// partially mutated. A loaded-but-empty table is a valid state distinct
/// from "not loaded" (the facade tracks the latter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetabaseTable {
    rows: Vec<MetabaseRow>,
}

impl MetabaseTable {
    pub fn new(rows: Vec<MetabaseRow>) -> Self {
        Self { rows }
    }

    /// Build the table from the parsed bulk file. The file has no header;
    /// every line must carry exactly the three semantic columns.
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let mut rows = Vec::with_capacity(raw.len());
        for (index, cells) in raw.rows.iter().enumerate() {
            if cells.len() != Column::ALL.len() {
                return Err(Error::InvalidParameter(format!(
                    "metabase row {} has {} columns, expected {}",
                    index,
                    cells.len(),
                    Column::ALL.len()
                )));
            }
            if cells.iter().any(|c| c.trim().is_empty()) {
                return Err(Error::InvalidParameter(format!(
                    "metabase row {} has an empty column",
                    index
                )));
            }
            rows.push(MetabaseRow::new(&cells[0], &cells[1], &cells[2]));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[MetabaseRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_parse() {
        assert_eq!(Column::parse("dimension").unwrap(), Column::Dimension);
        assert!(matches!(Column::parse("geo"), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_from_raw_rejects_short_rows() {
        let raw = RawTable {
            headers: None,
            rows: vec![vec!["ds1".to_string(), "dim1".to_string()]],
        };
        assert!(MetabaseTable::from_raw(&raw).is_err());
    }
}
