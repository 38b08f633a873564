//! Process-wide configuration constants for the Eurostat web services.
//!
//! Everything here is fixed at startup; per-call overrides go through
//! [`CollectionConfig`](crate::collection::CollectionConfig) or explicit
//! method parameters instead of mutating these.

/// Host and path of the bulk download service, published without a scheme.
pub const BULK_DOMAIN: &str = "ec.europa.eu/eurostat/estat-navtree-portlet-prod";

/// Query endpoint of the bulk download service.
pub const BULK_QUERY: &str = "BulkDownloadListing";

/// Host and path of the REST API. Reserved; the client currently targets
/// the bulk download service only.
pub const API_DOMAIN: &str = "ec.europa.eu/eurostat/wdds/rest/data";

/// REST API version segment. Reserved alongside [`API_DOMAIN`].
pub const API_VERSION: &str = "v2.1";

/// Languages the service publishes metadata in.
pub const LANGS: &[&str] = &["en", "de", "fr"];

/// Language used when none is requested.
pub const DEF_LANG: &str = "en";

/// Default value for the `sort` query parameter. The service misreads
/// queries when `sort` is missing or not first, so it is always injected.
pub const DEF_SORT: i64 = 1;

/// Base name of the metabase file.
pub const BULK_BASE_FILE: &str = "metabase";

/// Extension of the metabase file.
pub const BULK_BASE_EXT: &str = "txt";

/// Compression suffix of the metabase file; empty means uncompressed.
pub const BULK_BASE_ZIP: &str = "gz";

/// Base name of the table-of-contents file.
pub const BULK_TOC_FILE: &str = "table_of_contents";

/// Extensions the table of contents is published under. The first entry is
/// the default; the `xml` variant carries no language suffix.
pub const BULK_TOC_EXTS: &[&str] = &["txt", "xml"];

/// Compression suffix of the table-of-contents file.
pub const BULK_TOC_ZIP: &str = "";

/// Directory prefix for dimension (dictionary) files.
pub const BULK_DIC_DIR: &str = "dic";

/// Extensions a dimension file may be requested with.
pub const BULK_DIC_EXTS: &[&str] = &["dic"];

/// Compression suffix for dimension files.
pub const BULK_DIC_ZIP: &str = "";

/// Directory prefix for dataset data files.
pub const BULK_DATA_DIR: &str = "data";

/// Extensions a dataset file may be requested with.
pub const BULK_DATA_EXTS: &[&str] = &["tsv", "sdmx"];

/// Compression suffix for dataset files.
pub const BULK_DATA_ZIP: &str = "gz";

/// Header of the file-name column in bulk listing pages.
pub const LISTING_NAME_COLUMN: &str = "Name";

/// Header of the last-update column in bulk listing pages.
pub const LISTING_DATE_COLUMN: &str = "Date";
