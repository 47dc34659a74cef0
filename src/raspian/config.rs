// SPDX-License-Identifier: MIT

//! Process configuration, read once at startup from the environment.

use crate::adk::error::ConfigError;
use crate::adk::model::openai::DEFAULT_BASE_URL;
use crate::raspian::server::REST_ROUTES;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_NUM_RESULTS: u32 = 5;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

/// Settings for the completion API
#[derive(Debug, Clone)]
pub struct OpenAISettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Unset by default: completion calls are not bounded unless configured
    pub timeout: Option<Duration>,
}

/// Settings for the search scraper
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub url: String,
    pub num_results: u32,
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
            timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
        }
    }
}

/// Settings for the HTTP front end
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the MCP JSON-RPC endpoint
    pub path: String,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8844,
            path: "/mcp".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read only the server section. Used before logging is set up.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("MCP_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "MCP_PORT")?.unwrap_or(defaults.port),
            path: match lookup("MCP_PATH") {
                Some(raw) => mcp_path("MCP_PATH", &raw)?,
                None => defaults.path,
            },
            log_level: lookup("MCP_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAISettings,
    pub search: SearchSettings,
    pub server: ServerConfig,
}

impl Config {
    /// Load from the process environment.
    ///
    /// Fails when `OPENAI_API_KEY` is absent; callers treat that as fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let openai = OpenAISettings {
            api_key,
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: parse_secs(&lookup, "OPENAI_TIMEOUT_SECS")?,
        };

        let search = SearchSettings {
            url: lookup("SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            num_results: parse_var(&lookup, "SEARCH_NUM_RESULTS")?.unwrap_or(DEFAULT_NUM_RESULTS),
            timeout: parse_secs(&lookup, "SEARCH_TIMEOUT_SECS")?
                .unwrap_or(Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)),
        };

        Ok(Self {
            openai,
            search,
            server: ServerConfig::from_lookup(&lookup)?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::invalid(name, raw.as_str(), e.to_string())),
        None => Ok(None),
    }
}

/// Non-zero number of seconds
fn parse_secs<F>(lookup: &F, name: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<u64, F>(lookup, name)? {
        Some(0) => Err(ConfigError::invalid(
            name,
            lookup(name).unwrap_or_default(),
            "must be greater than zero",
        )),
        secs => Ok(secs.map(Duration::from_secs)),
    }
}

/// Normalize and check the MCP endpoint path.
///
/// The result starts with `/`, does not reuse a REST route and holds only
/// literal segments, so no `{capture}`, wildcard or `:` pattern reaches the
/// router. `name` is the source reported in the error (variable or flag).
pub fn mcp_path(name: &str, raw: &str) -> Result<String, ConfigError> {
    let path = normalize_path(raw.trim());

    if REST_ROUTES.contains(&path.as_str()) {
        return Err(ConfigError::invalid(
            name,
            raw,
            "collides with a built-in REST route",
        ));
    }

    let literal = path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~'));
    if !literal {
        return Err(ConfigError::invalid(
            name,
            raw,
            "only letters, digits, '/', '-', '_', '.' and '~' are allowed",
        ));
    }

    Ok(path)
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref name) if name == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai.api_key, "sk-test");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai.model, "gpt-4.1-mini");
        assert_eq!(config.openai.timeout, None);
        assert_eq!(config.search, SearchSettings::default());
        assert_eq!(config.search.timeout, Duration::from_secs(10));
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8844");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_TIMEOUT_SECS", "30"),
            ("SEARCH_NUM_RESULTS", "3"),
            ("MCP_HOST", "127.0.0.1"),
            ("MCP_PORT", "9000"),
            ("MCP_PATH", "rpc"),
            ("MCP_LOG_LEVEL", "info"),
        ]))
        .unwrap();

        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.search.num_results, 3);
        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.server.path, "/rpc");
        assert_eq!(config.server.log_level, "info");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MCP_PORT", "eighty"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::InvalidVar { name, value, .. } => {
                assert_eq!(name, "MCP_PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("Expected InvalidVar, got {:?}", other),
        }
    }

    #[test]
    fn test_mcp_path_cannot_shadow_rest_route() {
        let err = ServerConfig::from_lookup(lookup_from(&[("MCP_PATH", "/invoke")])).unwrap_err();

        match err {
            ConfigError::InvalidVar { name, value, .. } => {
                assert_eq!(name, "MCP_PATH");
                assert_eq!(value, "/invoke");
            }
            other => panic!("Expected InvalidVar, got {:?}", other),
        }

        for raw in ["api/health", "/tools"] {
            assert!(mcp_path("MCP_PATH", raw).is_err(), "{} accepted", raw);
        }
    }

    #[test]
    fn test_mcp_path_rejects_route_patterns() {
        for raw in ["/mcp/{id", "/mcp/{id}", "/{*rest}", "/:id", "/mcp path"] {
            let err = mcp_path("--path", raw).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidVar { ref name, .. } if name == "--path"));
        }
    }

    #[test]
    fn test_mcp_path_is_normalized() {
        assert_eq!(mcp_path("MCP_PATH", "rpc").unwrap(), "/rpc");
        assert_eq!(mcp_path("MCP_PATH", " /v1/mcp ").unwrap(), "/v1/mcp");
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        for var in ["SEARCH_TIMEOUT_SECS", "OPENAI_TIMEOUT_SECS"] {
            let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test"), (var, "0")]))
                .unwrap_err();

            match err {
                ConfigError::InvalidVar {
                    name,
                    value,
                    reason,
                } => {
                    assert_eq!(name, var);
                    assert_eq!(value, "0");
                    assert_eq!(reason, "must be greater than zero");
                }
                other => panic!("Expected InvalidVar, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_server_config_does_not_need_api_key() {
        let server = ServerConfig::from_lookup(lookup_from(&[("MCP_PORT", "1234")])).unwrap();
        assert_eq!(server.port, 1234);
    }
}
