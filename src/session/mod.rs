//! Session port: the transport-facing collaborator of the resolution engine.
//!
//! The core never talks to the network directly; it goes through the
//! [`Session`] trait, which owns caching, expiry and retries. [`HttpSession`]
//! is the production implementation; tests substitute their own.

pub mod html_table;
pub mod http_session;

pub use http_session::{HttpSession, HttpSessionConfig};

use crate::error::{Error, Result};
use std::io::Read;

/// Compression hint for a fetched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
}

/// Options controlling how fetched content is turned into a [`RawTable`].
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Zero-based index of the row holding column headers, if any.
    pub header_row: Option<usize>,
    /// Zero-based indices of data rows to drop after the header is taken.
    pub skip_rows: Vec<usize>,
    /// Compression of the fetched bytes, if any.
    pub compression: Option<Compression>,
    /// Cell delimiter; tab when unset.
    pub delimiter: Option<char>,
}

/// A parsed tabular structure: optional column headers plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the column whose header matches `name`, case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .as_ref()?
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// External collaborator retrieving remote content.
///
/// Implementations own caching, expiry and retry policy; the core treats
/// their failures as opaque and wraps them into its own error taxonomy.
pub trait Session {
    /// Fetch a URL and return its raw content.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a URL and parse it as a delimited text table.
    fn fetch_table(&self, url: &str, options: &TableOptions) -> Result<RawTable> {
        let bytes = self.fetch_bytes(url)?;
        let bytes = decompress(bytes, options.compression).map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(parse_delimited(&text, options))
    }

    /// Fetch an HTML page and return every table found on it.
    fn fetch_html_tables(&self, url: &str, options: &TableOptions) -> Result<Vec<RawTable>> {
        let bytes = self.fetch_bytes(url)?;
        let html = String::from_utf8_lossy(&bytes);
        Ok(html_table::extract_tables(&html, options))
    }
}

/// Undo the given compression; a no-op when `compression` is `None`.
pub fn decompress(bytes: Vec<u8>, compression: Option<Compression>) -> std::io::Result<Vec<u8>> {
    match compression {
        None => Ok(bytes),
        Some(Compression::Gzip) => {
            let mut decoder = flate2::read::GzDecoder::new(bytes.as_slice());
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            Ok(out)
        }
    }
}

/// Parse delimited text into a [`RawTable`], honoring the header and
/// skip-row options. Blank lines are ignored; cells are trimmed of the
/// carriage returns the service leaves on line ends.
pub fn parse_delimited(text: &str, options: &TableOptions) -> RawTable {
    let delimiter = options.delimiter.unwrap_or('\t');
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty());

    let mut headers = None;
    if let Some(header_row) = options.header_row {
        for _ in 0..header_row {
            lines.next();
        }
        headers = lines
            .next()
            .map(|l| l.split(delimiter).map(|c| c.to_string()).collect());
    }

    let rows = lines
        .enumerate()
        .filter(|(i, _)| !options.skip_rows.contains(i))
        .map(|(_, l)| l.split(delimiter).map(|c| c.to_string()).collect())
        .collect();

    RawTable { headers, rows }
}
