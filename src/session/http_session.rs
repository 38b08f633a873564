use crate::error::{Error, Result};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Configuration for the HTTP session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSessionConfig {
    /// Directory where downloaded files are stored; no caching when unset.
    pub cache_dir: Option<PathBuf>,
    /// How many seconds a cached file stays valid. `None` is forever,
    /// zero disables storing.
    pub expire_secs: Option<u64>,
    /// Bypass the cache and re-download unconditionally.
    pub force_download: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSessionConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            expire_secs: None,
            force_download: false,
            timeout_secs: 30,
        }
    }
}

/// Production [`Session`] backed by a blocking reqwest client with an
/// optional on-disk file cache.
///
/// The bulk service publishes its domain without a scheme; URLs are
/// completed with `http://` before the request goes out.
pub struct HttpSession {
    client: reqwest::blocking::Client,
    config: HttpSessionConfig,
}

impl HttpSession {
    pub fn new(config: HttpSessionConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::InvalidParameter(format!("SESSION setup failed: {}", e)))?;
        if let Some(dir) = &config.cache_dir {
            fs::create_dir_all(dir)?;
        }
        Ok(HttpSession { client, config })
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.config.cache_dir.as_ref()?;
        if self.config.expire_secs == Some(0) {
            return None;
        }
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        Some(dir.join(format!("{:016x}.cache", hasher.finish())))
    }

    fn read_cache(&self, url: &str) -> Option<Vec<u8>> {
        if self.config.force_download {
            return None;
        }
        let path = self.cache_path(url)?;
        let metadata = fs::metadata(&path).ok()?;
        if let Some(expire) = self.config.expire_secs {
            let age = SystemTime::now()
                .duration_since(metadata.modified().ok()?)
                .ok()?;
            if age.as_secs() > expire {
                return None;
            }
        }
        fs::read(&path).ok()
    }

    fn write_cache(&self, url: &str, bytes: &[u8]) {
        if let Some(path) = self.cache_path(url) {
            // A failed cache write never fails the fetch itself.
            if let Err(e) = fs::write(&path, bytes) {
                eprintln!("cache write failed for {}: {}", path.display(), e);
            }
        }
    }

    fn complete_url(url: &str) -> String {
        if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }
}

impl Session for HttpSession {
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.read_cache(url) {
            return Ok(bytes);
        }

        let request_url = Self::complete_url(url);
        let response = self
            .client
            .get(&request_url)
            .send()
            .map_err(|e| Error::Fetch { url: url.to_string(), reason: e.to_string() })?;

        if !response.status().is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Fetch { url: url.to_string(), reason: e.to_string() })?
            .to_vec();

        self.write_cache(url, &bytes);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_url() {
        assert_eq!(
            HttpSession::complete_url("ec.europa.eu/eurostat"),
            "http://ec.europa.eu/eurostat"
        );
        assert_eq!(
            HttpSession::complete_url("https://example.org"),
            "https://example.org"
        );
    }

    #[test]
    fn test_expire_zero_disables_cache() {
        let config = HttpSessionConfig {
            cache_dir: Some(std::env::temp_dir()),
            expire_secs: Some(0),
            ..Default::default()
        };
        let session = HttpSession::new(config).unwrap();
        assert!(session.cache_path("example.org?sort=1").is_none());
    }
}
