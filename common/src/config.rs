//! Client configuration: the server base address every route resolves against.

use thiserror::Error;
use url::Url;

/// Address used when none is configured.
pub const DEFAULT_SERVER_ADDRESS: &str = "http://127.0.0.1:8000/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid server address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server address `{0}` cannot be used as a base")]
    NotABase(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_address: Url,
}

impl ClientConfig {
    /// Parses `address` as the server base.
    ///
    /// A missing trailing slash is added so that `http://host/api` followed by
    /// `groups/` resolves to `http://host/api/groups/` instead of replacing
    /// the last path segment.
    pub fn new(address: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(address).map_err(|source| ConfigError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(address.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(ClientConfig {
            server_address: url,
        })
    }

    /// The base address, always ending in `/`.
    pub fn server_address(&self) -> &Url {
        &self.server_address
    }

    /// Resolves a route such as `records/export` against the server address.
    pub fn resolve(&self, route: &str) -> Result<Url, url::ParseError> {
        self.server_address.join(route)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new(DEFAULT_SERVER_ADDRESS).expect("default server address is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_trailing_slash() {
        let config = ClientConfig::new("http://example.com/api").unwrap();
        assert_eq!(config.server_address().as_str(), "http://example.com/api/");
        assert_eq!(
            config.resolve("groups/").unwrap().as_str(),
            "http://example.com/api/groups/"
        );
    }

    #[test]
    fn default_address() {
        let config = ClientConfig::default();
        assert_eq!(
            config.resolve("token/").unwrap().as_str(),
            "http://127.0.0.1:8000/token/"
        );
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert!(matches!(
            ClientConfig::new("mailto:someone@example.com"),
            Err(ConfigError::NotABase(_))
        ));
    }
}
