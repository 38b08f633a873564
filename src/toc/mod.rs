//! Table of contents: per-dataset descriptive metadata.
//!
//! The TOC file carries one row per dataset with its title, observation
//! period and last update date. It is loaded independently of the metabase
//! and parameterized by language (one TOC per requested language).

use crate::error::{Error, Result};
use crate::session::RawTable;
use serde::{Deserialize, Serialize};

/// One TOC row. Fields are kept exactly as published; accessors on
/// [`TocTable`] apply the trimming callers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocRow {
    pub code: String,
    pub title: String,
    /// Date the underlying data was last updated, when published.
    pub last_update: Option<String>,
    pub data_start: String,
    pub data_end: String,
}

/// The loaded table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocTable {
    rows: Vec<TocRow>,
}

impl TocTable {
    pub fn new(rows: Vec<TocRow>) -> Self {
        Self { rows }
    }

    /// Build the table from the parsed TOC file, mapping columns by header
    /// name. The published headers are `title`, `code`, `last update of
    /// data`, `data start` and `data end` (plus others this model ignores).
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let code = Self::required_column(raw, "code")?;
        let title = Self::required_column(raw, "title")?;
        let data_start = Self::required_column(raw, "data start")?;
        let data_end = Self::required_column(raw, "data end")?;
        let last_update = raw.column_index("last update of data");

        let mut rows = Vec::with_capacity(raw.len());
        for cells in &raw.rows {
            let cell = |index: usize| cells.get(index).map(|c| c.trim().to_string());
            let (Some(code), Some(title), Some(data_start), Some(data_end)) =
                (cell(code), cell(title), cell(data_start), cell(data_end))
            else {
                // Folder rows and section headers come through shorter;
                // they carry no dataset and are skipped.
                continue;
            };
            if code.is_empty() {
                continue;
            }
            rows.push(TocRow {
                code,
                title,
                last_update: last_update.and_then(cell).filter(|c| !c.is_empty()),
                data_start,
                data_end,
            });
        }
        Ok(Self { rows })
    }

    fn required_column(raw: &RawTable, name: &str) -> Result<usize> {
        raw.column_index(name).ok_or_else(|| {
            Error::InvalidParameter(format!("table of contents has no '{}' column", name))
        })
    }

    /// Exact-match lookup by dataset code. Returns the first matching row;
    /// duplicate codes are a data-integrity condition this engine does not
    /// resolve.
    pub fn lookup(&self, code: &str) -> Result<&TocRow> {
        self.rows
            .iter()
            .find(|row| row.code == code)
            .ok_or_else(|| Error::NotFound(format!("dataset '{}' in table of contents", code)))
    }

    /// Title of a dataset, trimmed of surrounding whitespace.
    pub fn title(&self, code: &str) -> Result<String> {
        Ok(self.lookup(code)?.title.trim().to_string())
    }

    /// `[start, end]` observation period of a dataset, as stored.
    pub fn period(&self, code: &str) -> Result<(String, String)> {
        let row = self.lookup(code)?;
        Ok((row.data_start.clone(), row.data_end.clone()))
    }

    pub fn rows(&self) -> &[TocRow] {
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
    use crate::session::{parse_delimited, TableOptions};

    const TOC_TEXT: &str = "title\tcode\ttype\tlast update of data\tdata start\tdata end\tvalues\n  Income distribution \tilc_di01\tdataset\t04.01.2017\t1995\t2016\t...\n";

    #[test]
    fn test_from_raw_and_lookup() {
        let options = TableOptions { header_row: Some(0), ..Default::default() };
        let raw = parse_delimited(TOC_TEXT, &options);
        let toc = TocTable::from_raw(&raw).unwrap();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc.title("ilc_di01").unwrap(), "Income distribution");
        assert_eq!(
            toc.period("ilc_di01").unwrap(),
            ("1995".to_string(), "2016".to_string())
        );
        assert!(matches!(toc.lookup("missing"), Err(Error::NotFound(_))));
    }
}
