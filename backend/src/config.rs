use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR {value:?} is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("ASSET_BASE_URL {value:?} is not a valid URL: {source}")]
    InvalidAssetBaseUrl { value: String, source: url::ParseError },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `development` or anything else for production.
    pub environment: String,
    pub content_path: PathBuf,
    /// Where report files are fetched from when no local asset directory is set.
    pub asset_base_url: Url,
    pub asset_dir: Option<PathBuf>,
    /// Built frontend, served for every path the API does not claim.
    pub static_dir: Option<PathBuf>,
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr { value: bind.clone(), source })?;

        let base = var("ASSET_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let asset_base_url = Url::parse(&base)
            .map_err(|source| ConfigError::InvalidAssetBaseUrl { value: base.clone(), source })?;

        Ok(Self {
            bind_addr,
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            content_path: var("CONTENT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("content/catalog.json")),
            asset_base_url,
            asset_dir: var("ASSET_DIR").map(PathBuf::from),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
            sentry_dsn: var("SENTRY_DSN"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert!(config.is_development());
        assert_eq!(config.content_path, PathBuf::from("content/catalog.json"));
        assert_eq!(config.asset_base_url.as_str(), "http://localhost:3000/");
        assert!(config.asset_dir.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("SENTRY_DSN", "  "), ("ENVIRONMENT", "production")]).unwrap();
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_development());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            config(&[("ASSET_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidAssetBaseUrl { .. })
        ));
    }
}
