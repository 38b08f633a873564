//! # Eurobase
//!
//! Eurobase is a client for the Eurostat *bulk download* and REST web
//! services. It builds query URLs, retrieves the catalog index files (the
//! metabase mapping datasets to dimensions and dimensions to labels, and the
//! table of contents with dataset titles and observation periods) and
//! resolves relationships between those entities: which datasets use a given
//! dimension, which labels a dimension takes, when an entity was last
//! updated.
//!
//! ## Features
//!
//! - URL construction for the bulk download service, including its
//!   `sort`-first quirk and language path suffixes
//! - In-memory metabase and table-of-contents tables with explicit loading
//! - A single relational resolver behind every catalog query
//! - A pluggable session port owning transport, caching and expiry
//!
//! ## Example
//!
//! ```rust,no_run
//! use eurobase::collection::{Collection, CollectionConfig};
//! use eurobase::session::{HttpSession, HttpSessionConfig};
//!
//! fn example() -> eurobase::Result<()> {
//!     let session = HttpSession::new(HttpSessionConfig::default())?;
//!     let mut catalog = Collection::new(CollectionConfig::default(), session)?;
//!     catalog.load_metabase()?;
//!     for dimension in catalog.dimensions_of("ilc_di01")? {
//!         println!("{}", dimension);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(missing_docs)]

/// Process-wide configuration constants
pub mod settings;

/// URL construction for the bulk download service
pub mod url;

/// Session port: transport, caching and tabular retrieval
pub mod session;

/// Metabase table and the relational resolver
pub mod metabase;

/// Table of contents: per-dataset descriptive metadata
pub mod toc;

/// Collection facade composing the other modules
pub mod collection;

pub mod error {
    //! Error types and result definitions

    use std::fmt;

    /// Result type alias for Eurobase operations
    pub type Result<T> = std::result::Result<T, Error>;

    /// Main error type for Eurobase
    #[derive(Debug)]
    pub enum Error {
        /// Malformed parameter (domain, sort, extension, ...)
        InvalidParameter(String),
        /// Language outside the supported set
        UnsupportedLanguage(String),
        /// Transport failure while fetching a URL
        Fetch {
            /// URL the fetch was attempted against
            url: String,
            /// Underlying transport or decoding failure
            reason: String,
        },
        /// Transport or parse failure while loading the metabase or TOC
        Load {
            /// URL the load was attempted against
            url: String,
            /// Underlying failure
            reason: String,
        },
        /// Query issued before the required table was loaded
        NotLoaded(&'static str),
        /// Resolver target or constraint names no table column
        UnknownColumn(String),
        /// Malformed resolver request
        InvalidQuery(String),
        /// TOC lookup miss
        NotFound(String),
        /// Membership check against an empty resolved set
        EmptyUniverse(String),
        /// IO error
        Io(std::io::Error),
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
                Error::UnsupportedLanguage(lang) => write!(f, "Unsupported language: {}", lang),
                Error::Fetch { url, reason } => write!(f, "Fetch error for {}: {}", url, reason),
                Error::Load { url, reason } => write!(f, "Load error for {}: {}", url, reason),
                Error::NotLoaded(what) => write!(f, "{} not loaded", what),
                Error::UnknownColumn(col) => write!(f, "Unknown column: {}", col),
                Error::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
                Error::NotFound(what) => write!(f, "Not found: {}", what),
                Error::EmptyUniverse(col) => {
                    write!(f, "No members to compare to in column: {}", col)
                }
                Error::Io(err) => write!(f, "IO error: {}", err),
            }
        }
    }

    impl std::error::Error for Error {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Error::Io(err) => Some(err),
                _ => None,
            }
        }
    }

    impl From<std::io::Error> for Error {
        fn from(err: std::io::Error) -> Self {
            Error::Io(err)
        }
    }
}

// Re-export commonly used types
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedLanguage("xx".to_string());
        assert_eq!(format!("{}", err), "Unsupported language: xx");

        let err = Error::Load {
            url: "example.org?sort=1&file=metabase.txt.gz".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(format!("{}", err).contains("example.org?sort=1&file=metabase.txt.gz"));
    }
}
