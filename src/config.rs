//! Endpoint configuration for the external catalogs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TRACKS_API: &str = "https://api.genome.ucsc.edu/list/tracks";
pub const DEFAULT_FILES_API: &str = "https://api.genome.ucsc.edu/list/files";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://hgdownload.soe.ucsc.edu";
pub const DEFAULT_SEARCH_API: &str = "https://www.ebi.ac.uk/ena/portal/api/search";

/// Default bound on the files-listing and manifest requests
pub const DEFAULT_CHECKSUM_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {url} (expected http:// or https://)")]
    InvalidUrl { name: &'static str, url: String },

    #[error("Checksum timeout must be greater than zero")]
    ZeroTimeout,
}

/// Where to reach the genome browser and sequence archive APIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Track-list API, queried with `?genome=<assembly>`
    pub tracks_api: String,

    /// Files-listing API, queried with `?genome=<assembly>`
    pub files_api: String,

    /// Public download host; `bigDataUrl` paths and relative manifest URLs resolve against it
    pub download_base: String,

    /// Sequence archive search API
    pub search_api: String,

    /// Timeout applied to each checksum-related request
    #[serde(with = "duration_secs")]
    pub checksum_timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tracks_api: DEFAULT_TRACKS_API.to_string(),
            files_api: DEFAULT_FILES_API.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            search_api: DEFAULT_SEARCH_API.to_string(),
            checksum_timeout: Duration::from_secs(DEFAULT_CHECKSUM_TIMEOUT_SECS),
        }
    }
}

impl Endpoints {
    /// Check that every endpoint is an http(s) URL and the timeout is non-zero
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("tracks API", &self.tracks_api),
            ("files API", &self.files_api),
            ("download base", &self.download_base),
            ("search API", &self.search_api),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name,
                    url: url.clone(),
                });
            }
        }

        if self.checksum_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Download base without a trailing slash
    #[must_use]
    pub fn download_base(&self) -> &str {
        self.download_base.trim_end_matches('/')
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let endpoints = Endpoints::default();
        assert!(endpoints.validate().is_ok());
        assert_eq!(endpoints.checksum_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_non_http() {
        let endpoints = Endpoints {
            files_api: "ftp://example.org/list".to_string(),
            ..Endpoints::default()
        };
        assert_eq!(
            endpoints.validate(),
            Err(ConfigError::InvalidUrl {
                name: "files API",
                url: "ftp://example.org/list".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let endpoints = Endpoints {
            checksum_timeout: Duration::ZERO,
            ..Endpoints::default()
        };
        assert_eq!(endpoints.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_download_base_trims_slash() {
        let endpoints = Endpoints {
            download_base: "http://localhost:8080/".to_string(),
            ..Endpoints::default()
        };
        assert_eq!(endpoints.download_base(), "http://localhost:8080");
    }
}
