//! Extraction of tables from bulk listing pages.
//!
//! The listing pages are plain server-generated HTML. Rather than pulling in
//! a DOM library for three tags, the tables are scanned with regular
//! expressions tolerant of attribute noise and casing, and cell text is
//! stripped of markup and common entities.

use crate::session::{RawTable, TableOptions};
use regex::Regex;
use std::sync::OnceLock;

fn table_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<table[^>]*>(.*?)</table>").unwrap())
}

fn row_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap())
}

fn cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").unwrap())
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap())
}

/// Strip markup from a cell and normalize whitespace and entities.
fn cell_text(fragment: &str) -> String {
    let text = tag_regex().replace_all(fragment, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract every `<table>` of an HTML page as a [`RawTable`].
///
/// Rows with no cells are dropped. `options.header_row` selects the row used
/// as column headers within each table; `options.skip_rows` drops data rows
/// after the header is taken. The delimiter and compression options do not
/// apply here.
pub fn extract_tables(html: &str, options: &TableOptions) -> Vec<RawTable> {
    let mut tables = Vec::new();

    for table_match in table_regex().captures_iter(html) {
        let body = &table_match[1];
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row_match in row_regex().captures_iter(body) {
            let cells: Vec<String> = cell_regex()
                .captures_iter(&row_match[1])
                .map(|c| cell_text(&c[1]))
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }

        let mut headers = None;
        if let Some(header_row) = options.header_row {
            if header_row < rows.len() {
                headers = Some(rows.remove(header_row));
            }
        }
        let rows = rows
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !options.skip_rows.contains(i))
            .map(|(_, r)| r)
            .collect();

        tables.push(RawTable { headers, rows });
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <table class="filelist">
          <tr><th>Name</th><th>Size</th><th>Date</th></tr>
          <tr><td><a href="...">age.dic</a></td><td>2 KB</td><td>2017-01-04</td></tr>
          <tr><td><a href="...">geo.dic</a></td><td>48 KB</td><td>2016-12-20</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_listing_table() {
        let options = TableOptions { header_row: Some(0), ..Default::default() };
        let tables = extract_tables(LISTING, &options);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.column_index("Name"), Some(0));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "age.dic");
        assert_eq!(table.rows[1][2], "2016-12-20");
    }

    #[test]
    fn test_entities_and_nested_tags() {
        let html = "<table><tr><td><b>A &amp; B</b>&nbsp;C</td></tr></table>";
        let tables = extract_tables(html, &TableOptions::default());
        assert_eq!(tables[0].rows[0][0], "A & B C");
    }
}
