// src/sources/text_gen.rs
//! Generative-text collaborator. Models return prose that is *expected* to
//! contain a JSON value; [`extract_json`] digs it out and treats failure as a
//! recoverable error, never a panic.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;

#[async_trait]
pub trait TextGenClient: Send + Sync {
    fn name(&self) -> &'static str;
    fn configured(&self) -> bool;
    /// Free text completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Pull the first JSON value out of model output. Handles fenced blocks
/// (```json ... ```), leading prose and trailing commentary. Returns an error
/// when nothing between the outermost braces/brackets parses.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let trimmed = text.trim();

    // Fenced block first; models love fences.
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if let Ok(v) = serde_json::from_str(inner) {
                return Ok(v);
            }
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(v) = serde_json::from_str(&trimmed[start..=end]) {
                    return Ok(v);
                }
            }
        }
    }

    bail!("no JSON value found in generated text")
}

pub struct DisabledTextGen;

#[async_trait]
impl TextGenClient for DisabledTextGen {
    fn name(&self) -> &'static str {
        "disabled"
    }
    fn configured(&self) -> bool {
        false
    }
    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("text generation not configured")
    }
}

#[derive(Default, Clone)]
pub struct MockTextGen {
    pub fixed: String,
    pub failing: bool,
}

#[async_trait]
impl TextGenClient for MockTextGen {
    fn name(&self) -> &'static str {
        "mock"
    }
    fn configured(&self) -> bool {
        true
    }
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.failing {
            bail!("mock text gen set to fail");
        }
        Ok(self.fixed.clone())
    }
}

/// OpenAI-compatible chat-completions provider.
pub struct HttpTextGen {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpTextGen {
    pub fn new(cfg: &ServiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("wandermatch/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string()),
        }
    }
}

#[async_trait]
impl TextGenClient for HttpTextGen {
    fn name(&self) -> &'static str {
        "openai"
    }
    fn configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if !self.configured() {
            bail!("text generation missing key or base url");
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: "You write terse travel-content notes. Respond with JSON only.",
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
            max_tokens: 400,
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("text generation request failed")?;
        if !resp.status().is_success() {
            bail!("text generation returned {}", resp.status());
        }
        let body: Resp = resp.json().await.context("text generation body unreadable")?;
        match body.choices.into_iter().next() {
            Some(c) => Ok(c.message.content),
            None => bail!("text generation returned no choices"),
        }
    }
}
