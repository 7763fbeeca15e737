// src/config.rs
//! Collaborator configuration loaded from `config/sources.json`.
//!
//! Each external service gets a provider name, a base URL and an API key.
//! `"ENV"` as the key means: read the service's conventional environment
//! variable at load time. Missing configuration never aborts startup; the
//! client factory turns an empty key into a disabled client.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::warn;

const CONFIG_PATH_VAR: &str = "WANDERMATCH_SOURCES_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/sources.json";

fn default_provider() -> String {
    "disabled".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    /// "disabled" | "mock" | provider-specific name (case-insensitive).
    pub provider: String,
    /// Literal key, or "ENV" to read the service's env var.
    pub api_key: String,
    pub base_url: String,
    /// Generative-text model override; other services ignore it.
    pub model: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            base_url: String::new(),
            model: None,
        }
    }
}

impl ServiceConfig {
    pub fn is_disabled(&self) -> bool {
        self.provider == "disabled" || self.provider.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourcesConfig {
    pub taste_graph: ServiceConfig,
    pub channel_search: ServiceConfig,
    pub text_gen: ServiceConfig,
}

impl SourcesConfig {
    /// Strict loader: parse failures and unresolvable `"ENV"` keys are errors.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: SourcesConfig = serde_json::from_str(&data)?;

        for (svc, env_var) in [
            (&mut cfg.taste_graph, "QLOO_API_KEY"),
            (&mut cfg.channel_search, "CHANNEL_SEARCH_API_KEY"),
            (&mut cfg.text_gen, "OPENAI_API_KEY"),
        ] {
            svc.provider = svc.provider.to_lowercase();
            if svc.is_disabled() {
                continue;
            }
            if svc.api_key.trim().eq_ignore_ascii_case("env") {
                svc.api_key = env::var(env_var)
                    .map_err(|_| anyhow::anyhow!("Missing {env_var} env var"))?;
            }
        }

        Ok(cfg)
    }
}

/// Lenient loader used at startup. A missing or broken file, or a missing env
/// key, degrades the affected service to disabled instead of failing boot.
pub fn load_sources_config() -> SourcesConfig {
    let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let data = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return SourcesConfig::default(),
    };
    let mut cfg: SourcesConfig = match serde_json::from_str(&data) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path, error = %e, "sources config unreadable, all collaborators disabled");
            return SourcesConfig::default();
        }
    };

    for (svc, env_var) in [
        (&mut cfg.taste_graph, "QLOO_API_KEY"),
        (&mut cfg.channel_search, "CHANNEL_SEARCH_API_KEY"),
        (&mut cfg.text_gen, "OPENAI_API_KEY"),
    ] {
        svc.provider = svc.provider.to_lowercase();
        if svc.is_disabled() {
            continue;
        }
        if svc.api_key.trim().eq_ignore_ascii_case("env") {
            match env::var(env_var) {
                Ok(v) => svc.api_key = v,
                Err(_) => {
                    warn!(provider = %svc.provider, var = env_var, "api key env var missing, service disabled");
                    svc.provider = default_provider();
                    svc.api_key.clear();
                }
            }
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_are_disabled() {
        let cfg = SourcesConfig::default();
        assert!(cfg.taste_graph.is_disabled());
        assert!(cfg.channel_search.is_disabled());
        assert!(cfg.text_gen.is_disabled());
    }

    #[test]
    fn parses_partial_config() {
        let raw = r#"{"tasteGraph": {"provider": "Qloo", "apiKey": "k", "baseUrl": "https://x"}}"#;
        let cfg: SourcesConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.taste_graph.provider, "Qloo");
        assert!(cfg.text_gen.is_disabled());
    }

    #[test]
    #[serial]
    fn env_key_indirection_resolves() {
        std::env::set_var("QLOO_API_KEY", "resolved-key");
        let dir = std::env::temp_dir().join("wandermatch-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sources.json");
        std::fs::write(
            &path,
            r#"{"tasteGraph": {"provider": "QLOO", "apiKey": "ENV", "baseUrl": "https://x"}}"#,
        )
        .unwrap();
        let cfg = SourcesConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg.taste_graph.provider, "qloo");
        assert_eq!(cfg.taste_graph.api_key, "resolved-key");
        std::env::remove_var("QLOO_API_KEY");
    }

    #[test]
    #[serial]
    fn strict_loader_errors_on_missing_env() {
        std::env::remove_var("CHANNEL_SEARCH_API_KEY");
        let dir = std::env::temp_dir().join("wandermatch-config-test2");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sources.json");
        std::fs::write(
            &path,
            r#"{"channelSearch": {"provider": "http", "apiKey": "ENV", "baseUrl": "https://x"}}"#,
        )
        .unwrap();
        assert!(SourcesConfig::load_from_file(&path).is_err());
    }
}
