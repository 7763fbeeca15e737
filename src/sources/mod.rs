// src/sources/mod.rs
//! External collaborators and the factory that builds them from config.
//!
//! Every collaborator is a trait object with a disabled, a mock and an HTTP
//! implementation. `SOURCES_TEST_MODE=mock` forces mocks regardless of config,
//! mirroring how local runs and integration tests avoid the network.

pub mod channel_search;
pub mod taste_graph;
pub mod text_gen;

use std::sync::Arc;

use tracing::info;

use crate::config::SourcesConfig;
use channel_search::{
    ChannelSearchClient, DisabledChannelSearch, HttpChannelSearch, MockChannelSearch,
};
use taste_graph::{DisabledTasteGraph, HttpTasteGraph, MockTasteGraph, TasteGraphClient};
use text_gen::{DisabledTextGen, HttpTextGen, MockTextGen, TextGenClient};

#[derive(Clone)]
pub struct Collaborators {
    pub taste_graph: Arc<dyn TasteGraphClient>,
    pub channels: Arc<dyn ChannelSearchClient>,
    pub text_gen: Arc<dyn TextGenClient>,
}

impl Collaborators {
    /// Build clients per config. Unknown providers and empty keys degrade to
    /// disabled; nothing here fails.
    pub fn from_config(cfg: &SourcesConfig) -> Self {
        if std::env::var("SOURCES_TEST_MODE")
            .map(|v| v == "mock")
            .unwrap_or(false)
        {
            return Self::mocked();
        }

        let taste_graph: Arc<dyn TasteGraphClient> = match cfg.taste_graph.provider.as_str() {
            "qloo" if !cfg.taste_graph.api_key.is_empty() => {
                Arc::new(HttpTasteGraph::new(&cfg.taste_graph))
            }
            "mock" => Arc::new(MockTasteGraph::default()),
            _ => Arc::new(DisabledTasteGraph),
        };

        let channels: Arc<dyn ChannelSearchClient> = match cfg.channel_search.provider.as_str() {
            "http" if !cfg.channel_search.api_key.is_empty() => {
                Arc::new(HttpChannelSearch::new(&cfg.channel_search))
            }
            "mock" => Arc::new(MockChannelSearch::default()),
            _ => Arc::new(DisabledChannelSearch),
        };

        let text_gen: Arc<dyn TextGenClient> = match cfg.text_gen.provider.as_str() {
            "openai" if !cfg.text_gen.api_key.is_empty() => {
                Arc::new(HttpTextGen::new(&cfg.text_gen))
            }
            "mock" => Arc::new(MockTextGen::default()),
            _ => Arc::new(DisabledTextGen),
        };

        Self {
            taste_graph,
            channels,
            text_gen,
        }
    }

    pub fn disabled() -> Self {
        Self {
            taste_graph: Arc::new(DisabledTasteGraph),
            channels: Arc::new(DisabledChannelSearch),
            text_gen: Arc::new(DisabledTextGen),
        }
    }

    fn mocked() -> Self {
        Self {
            taste_graph: Arc::new(MockTasteGraph::default()),
            channels: Arc::new(MockChannelSearch::default()),
            text_gen: Arc::new(MockTextGen::default()),
        }
    }

    /// Startup probe: one line per collaborator, provider + configured flag.
    /// Safe diagnostics only, never key material.
    pub fn log_probe(&self) {
        info!(
            taste_graph = self.taste_graph.name(),
            taste_graph_ready = self.taste_graph.configured(),
            channels = self.channels.name(),
            channels_ready = self.channels.configured(),
            text_gen = self.text_gen.name(),
            text_gen_ready = self.text_gen.configured(),
            "collaborator probe"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use serial_test::serial;

    #[test]
    #[serial]
    fn unknown_provider_degrades_to_disabled() {
        std::env::remove_var("SOURCES_TEST_MODE");
        let cfg = SourcesConfig {
            taste_graph: ServiceConfig {
                provider: "something-new".into(),
                api_key: "k".into(),
                base_url: "https://x".into(),
                model: None,
            },
            ..Default::default()
        };
        let c = Collaborators::from_config(&cfg);
        assert!(!c.taste_graph.configured());
        assert_eq!(c.taste_graph.name(), "disabled");
    }

    #[test]
    #[serial]
    fn empty_key_disables_http_provider() {
        std::env::remove_var("SOURCES_TEST_MODE");
        let cfg = SourcesConfig {
            channel_search: ServiceConfig {
                provider: "http".into(),
                api_key: String::new(),
                base_url: "https://x".into(),
                model: None,
            },
            ..Default::default()
        };
        let c = Collaborators::from_config(&cfg);
        assert_eq!(c.channels.name(), "disabled");
    }

    #[test]
    #[serial]
    fn test_mode_forces_mocks() {
        std::env::set_var("SOURCES_TEST_MODE", "mock");
        let c = Collaborators::from_config(&SourcesConfig::default());
        assert_eq!(c.taste_graph.name(), "mock");
        assert!(c.text_gen.configured());
        std::env::remove_var("SOURCES_TEST_MODE");
    }
}
