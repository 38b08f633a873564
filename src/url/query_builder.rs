use crate::error::{Error, Result};
use crate::settings;

/// Value of a query parameter: the service only ever takes strings and
/// integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    fn serialize(&self) -> String {
        match self {
            ParamValue::Str(s) => urlencoding::encode(s).into_owned(),
            ParamValue::Int(i) => i.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

/// Ordered set of query parameters.
///
/// Insertion order is preserved; setting an existing key replaces the value
/// in place. The two distinguished parameters `sort` and `lang` are stored
/// like any other and given their special treatment by [`build_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set a parameter, replacing any existing value in place.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> impl Iterator<Item = &(String, ParamValue)> {
        self.entries.iter()
    }
}

/// Build a request URL from a base domain and an ordered set of query
/// parameters.
///
/// The serialization honors two conventions of the upstream service:
///
/// - `sort` must be the first key of the query string (the service otherwise
///   misinterprets the query) and is injected with
///   [`settings::DEF_SORT`](crate::settings::DEF_SORT) when absent;
/// - `lang`, when present, never appears as a query pair: it is validated
///   against [`settings::LANGS`](crate::settings::LANGS) and appended as a
///   trailing `/<lang>` path segment, after the query string.
///
/// All other parameters keep their caller-supplied relative order and are
/// URL-encoded. An empty parameter set returns the domain unchanged. The
/// function is pure and deterministic.
///
/// # Examples
///
/// ```
/// use eurobase::url::{build_url, QueryParams};
///
/// let mut params = QueryParams::new();
/// params.set("lang", "en").set("dir", "data");
/// let url = build_url("example.org", &params).unwrap();
/// assert_eq!(url, "example.org?sort=1&dir=data/en");
/// ```
pub fn build_url(domain: &str, params: &QueryParams) -> Result<String> {
    if domain.is_empty() {
        return Err(Error::InvalidParameter("empty DOMAIN".to_string()));
    }
    if params.is_empty() {
        return Ok(domain.to_string());
    }

    let mut params = params.clone();

    let lang = match params.remove("lang") {
        Some(ParamValue::Str(lang)) => {
            if !settings::LANGS.contains(&lang.as_str()) {
                return Err(Error::UnsupportedLanguage(lang));
            }
            Some(lang)
        }
        Some(ParamValue::Int(other)) => {
            return Err(Error::UnsupportedLanguage(other.to_string()));
        }
        None => None,
    };

    let sort = match params.remove("sort") {
        Some(ParamValue::Int(sort)) if sort > 0 => sort,
        Some(ParamValue::Str(raw)) => match raw.parse::<i64>() {
            Ok(sort) if sort > 0 => sort,
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "SORT must be a positive integer, got '{}'",
                    raw
                )))
            }
        },
        Some(ParamValue::Int(sort)) => {
            return Err(Error::InvalidParameter(format!(
                "SORT must be a positive integer, got {}",
                sort
            )))
        }
        None => settings::DEF_SORT,
    };

    // sort is the first pair regardless of insertion order
    let mut pairs = vec![format!("sort={}", sort)];
    for (key, value) in params.iter() {
        pairs.push(format!("{}={}", urlencoding::encode(key), value.serialize()));
    }

    let mut url = format!("{}?{}", domain, pairs.join("&"));
    if let Some(lang) = lang {
        url = format!("{}/{}", url, lang);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = QueryParams::new();
        params.set("dir", "data").set("start", "a").set("dir", "dic");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("dir"), Some(&ParamValue::Str("dic".to_string())));
    }

    #[test]
    fn test_file_values_are_encoded() {
        let mut params = QueryParams::new();
        params.set("file", "dic/en/age.dic");
        let url = build_url(settings::BULK_DOMAIN, &params).unwrap();
        assert!(url.ends_with("?sort=1&file=dic%2Fen%2Fage.dic"));
    }
}
