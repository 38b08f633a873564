//! URL construction for the bulk download web service.

pub mod query_builder;

pub use query_builder::{build_url, ParamValue, QueryParams};
