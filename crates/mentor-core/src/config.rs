//! Relay configuration, read once from the environment at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_N_DOCUMENTS: u32 = 5;
pub const DEFAULT_STRICTNESS: u8 = 1;
pub const DEFAULT_PORT: u16 = 8000;

/// Valid range for the retrieval strictness knob.
pub const STRICTNESS_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Retrieval query mode understood by the search data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    #[default]
    Simple,
    Semantic,
    Vector,
    VectorSimpleHybrid,
    VectorSemanticHybrid,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Semantic => "semantic",
            Self::Vector => "vector",
            Self::VectorSimpleHybrid => "vector_simple_hybrid",
            Self::VectorSemanticHybrid => "vector_semantic_hybrid",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "semantic" => Ok(Self::Semantic),
            "vector" => Ok(Self::Vector),
            "vector_simple_hybrid" => Ok(Self::VectorSimpleHybrid),
            "vector_semantic_hybrid" => Ok(Self::VectorSemanticHybrid),
            other => Err(Error::Config(format!(
                "RAG_QUERY_TYPE must be one of simple, semantic, vector, \
                 vector_simple_hybrid, vector_semantic_hybrid (got {other:?})"
            ))),
        }
    }
}

/// Process-wide relay configuration.
///
/// Built once by [`RelayConfig::from_env`] and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Completion provider base URL, without trailing slash.
    pub openai_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
    pub deployment: String,
    pub api_version: String,

    pub search_endpoint: Option<String>,
    pub search_api_key: Option<String>,
    pub search_index: Option<String>,
    pub rag_enabled: bool,

    pub max_tokens: u32,
    pub temperature: f64,
    pub top_n_documents: u32,

    pub query_type: QueryType,
    /// Always within [`STRICTNESS_RANGE`].
    pub strictness: u8,
    /// Restrict answers to retrieved documents only.
    pub in_scope: bool,

    /// Operator override for the system prompt; the built-in persona is used when unset.
    pub system_prompt: Option<String>,

    pub allowed_origins: Vec<String>,
    pub log_level: String,
    pub environment: String,
    pub port: u16,
    /// Directory holding the front-end assets.
    pub static_dir: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai_endpoint: None,
            openai_api_key: None,
            deployment: DEFAULT_DEPLOYMENT.into(),
            api_version: DEFAULT_API_VERSION.into(),
            search_endpoint: None,
            search_api_key: None,
            search_index: None,
            rag_enabled: true,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_n_documents: DEFAULT_TOP_N_DOCUMENTS,
            query_type: QueryType::default(),
            strictness: DEFAULT_STRICTNESS,
            in_scope: false,
            system_prompt: None,
            allowed_origins: vec!["*".into()],
            log_level: "info".into(),
            environment: "development".into(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Non-secret configuration snapshot served to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicConfig {
    pub rag_enabled: bool,
    pub deployment: String,
    pub search_index: Option<String>,
    pub query_type: QueryType,
    pub strictness: u8,
    pub in_scope: bool,
}

impl RelayConfig {
    /// Create configuration from environment variables and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset. Values that fail to parse, a non-finite
    /// temperature, a strictness outside 1-5 or an unknown query type are
    /// rejected rather than clamped.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let strictness = parse_or(&var, "RAG_STRICTNESS", defaults.strictness)?;
        if !STRICTNESS_RANGE.contains(&strictness) {
            return Err(Error::Config(format!(
                "RAG_STRICTNESS must be between 1 and 5 (got {strictness})"
            )));
        }

        let temperature: f64 = parse_or(&var, "TEMPERATURE", defaults.temperature)?;
        if !temperature.is_finite() {
            return Err(Error::Config(format!(
                "TEMPERATURE must be a finite number (got {temperature})"
            )));
        }

        let query_type = match var("RAG_QUERY_TYPE") {
            Some(v) => v.parse()?,
            None => defaults.query_type,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        let config = Self {
            openai_endpoint: var("AZURE_OPENAI_ENDPOINT").map(trim_endpoint),
            openai_api_key: var("AZURE_OPENAI_API_KEY"),
            deployment: var("AZURE_OPENAI_DEPLOYMENT").unwrap_or(defaults.deployment),
            api_version: var("AZURE_OPENAI_API_VERSION").unwrap_or(defaults.api_version),
            search_endpoint: var("AZURE_SEARCH_ENDPOINT").map(trim_endpoint),
            search_api_key: var("AZURE_SEARCH_API_KEY"),
            search_index: var("AZURE_SEARCH_INDEX"),
            rag_enabled: flag_or(&var, "ENABLE_RAG", defaults.rag_enabled),
            max_tokens: parse_or(&var, "MAX_TOKENS", defaults.max_tokens)?,
            temperature,
            top_n_documents: parse_or(&var, "TOP_N_DOCUMENTS", defaults.top_n_documents)?,
            query_type,
            strictness,
            in_scope: flag_or(&var, "RAG_IN_SCOPE", defaults.in_scope),
            system_prompt: var("SYSTEM_PROMPT"),
            allowed_origins,
            log_level: var("LOG_LEVEL")
                .map(|l| l.to_ascii_lowercase())
                .unwrap_or(defaults.log_level),
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or(&var, "PORT", defaults.port)?,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        };

        debug!(
            deployment = %config.deployment,
            rag_enabled = config.rag_enabled,
            "Loaded relay configuration"
        );

        Ok(config)
    }

    /// Provider endpoint and key, when both are present.
    pub fn provider_credentials(&self) -> Option<(&str, &str)> {
        match (self.openai_endpoint.as_deref(), self.openai_api_key.as_deref()) {
            (Some(endpoint), Some(key)) if !endpoint.is_empty() && !key.is_empty() => {
                Some((endpoint, key))
            }
            _ => None,
        }
    }

    /// Build the public config response (no API keys exposed).
    pub fn public_view(&self) -> PublicConfig {
        PublicConfig {
            rag_enabled: self.rag_enabled,
            deployment: self.deployment.clone(),
            search_index: self.search_index.clone(),
            query_type: self.query_type,
            strictness: self.strictness,
            in_scope: self.in_scope,
        }
    }
}

fn trim_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

fn flag_or<F>(var: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("{key}: invalid value {raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RelayConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.deployment, "gpt-4o");
        assert_eq!(config.api_version, "2024-02-15-preview");
        assert!(config.rag_enabled);
        assert_eq!(config.max_tokens, 4096);
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.top_n_documents, 5);
        assert_eq!(config.query_type, QueryType::Simple);
        assert_eq!(config.strictness, 1);
        assert!(!config.in_scope);
        assert_eq!(config.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.environment, "development");
        assert_eq!(config.port, 8000);
        assert!(config.provider_credentials().is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = load(&[
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_DEPLOYMENT", "gpt-4o-mini"),
            ("ENABLE_RAG", "FALSE"),
            ("RAG_QUERY_TYPE", "vector_semantic_hybrid"),
            ("RAG_STRICTNESS", "4"),
            ("RAG_IN_SCOPE", "True"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("LOG_LEVEL", "DEBUG"),
            ("PORT", "9001"),
        ])
        .unwrap();

        assert_eq!(
            config.provider_credentials(),
            Some(("https://example.openai.azure.com", "secret"))
        );
        assert_eq!(config.deployment, "gpt-4o-mini");
        assert!(!config.rag_enabled);
        assert_eq!(config.query_type, QueryType::VectorSemanticHybrid);
        assert_eq!(config.strictness, 4);
        assert!(config.in_scope);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn test_non_true_flag_is_false() {
        let config = load(&[("ENABLE_RAG", "yes")]).unwrap();
        assert!(!config.rag_enabled);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[("AZURE_OPENAI_API_KEY", "  "), ("AZURE_OPENAI_DEPLOYMENT", "")]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.deployment, DEFAULT_DEPLOYMENT);
    }

    #[test]
    fn test_rejects_strictness_out_of_range() {
        for bad in ["0", "6"] {
            let err = load(&[("RAG_STRICTNESS", bad)]).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "strictness {bad} accepted");
        }
    }

    #[test]
    fn test_rejects_unknown_query_type() {
        let err = load(&[("RAG_QUERY_TYPE", "fuzzy")]).unwrap_err();
        assert!(err.to_string().contains("RAG_QUERY_TYPE"));
    }

    #[test]
    fn test_rejects_unparsable_numbers() {
        assert!(load(&[("MAX_TOKENS", "lots")]).is_err());
        assert!(load(&[("TEMPERATURE", "warm")]).is_err());
        for non_finite in ["NaN", "inf", "-infinity"] {
            let err = load(&[("TEMPERATURE", non_finite)]).unwrap_err();
            assert!(err.to_string().contains("TEMPERATURE"), "{non_finite} accepted");
        }
        assert!(load(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_public_view_hides_secrets() {
        let config = load(&[
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_SEARCH_API_KEY", "search-secret"),
            ("AZURE_SEARCH_INDEX", "docs"),
        ])
        .unwrap();
        let json = serde_json::to_string(&config.public_view()).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"search_index\":\"docs\""));
        assert!(json.contains("\"query_type\":\"simple\""));
    }
}
