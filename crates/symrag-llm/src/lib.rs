//! Reasoning-service client: keyword extraction from a free-text query and
//! answer synthesis over retrieved context, against any OpenAI-compatible
//! chat endpoint.
//!
//! Every remote failure on this boundary is recovered locally with a
//! documented fallback value; nothing here propagates as a hard error to the
//! search pipeline.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use symrag_config::LlmConfig;
use symrag_core::KeywordExtractor;
use tracing::warn;

const NO_DOCUMENTS_MSG: &str =
    "I could not find any relevant documents in the database to answer this question.";
const NO_KEY_MSG: &str =
    "Error: API key missing. Set llm.api_key in .symrag.yml or SYMRAG_API_KEY.";

/// Credential state, explicit rather than an ambient environment lookup.
/// Absence of a key is a normal, checkable state, not a construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    Unauthenticated,
}

impl Credential {
    pub fn from_option(key: Option<String>) -> Self {
        match key {
            Some(k) if !k.is_empty() => Credential::ApiKey(k),
            _ => Credential::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Credential::ApiKey(_))
    }
}

#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    credential: Credential,
    model: String,
    endpoint: String,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        let base = config.api_base.trim_end_matches('/');
        let endpoint = if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{base}/chat/completions")
        };
        Ok(Self {
            client,
            credential: Credential::from_option(config.api_key.clone()),
            model: config.model.clone(),
            endpoint,
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    async fn chat(&self, prompt: String) -> Result<String> {
        let key = match &self.credential {
            Credential::ApiKey(k) => k,
            Credential::Unauthenticated => return Err(anyhow!("no API key configured")),
        };

        let res = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {key}"))
            .json(&json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.0
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = res
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow!("invalid response from reasoning service: {res}"))?;
        Ok(content.trim().to_string())
    }

    /// Synthesizes a prose answer for `query` over the formatted `context`
    /// block. Blank context and a missing key each short-circuit to a fixed
    /// message; a remote failure comes back as an error-tagged message. None
    /// of these raise.
    pub async fn answer(&self, query: &str, context: &str) -> String {
        if context.trim().is_empty() {
            return NO_DOCUMENTS_MSG.to_string();
        }
        if !self.credential.is_authenticated() {
            return NO_KEY_MSG.to_string();
        }

        let prompt = format!(
            concat!(
                "Answer only from the context given to you. Carefully analyze it and ",
                "generate a full response based on that analysis, sized to the amount ",
                "of useful context. Do not add information that is not in the context.\n\n",
                "Context:\n{}\n\n",
                "Question: {}"
            ),
            context, query
        );

        match self.chat(prompt).await {
            Ok(text) => text,
            Err(e) => format!("[ERROR] reasoning service failed: {e}"),
        }
    }
}

#[async_trait]
impl KeywordExtractor for ChatClient {
    /// Asks the model for the query's significant search terms. Without a
    /// key this falls back to the query's final whitespace token; a remote
    /// failure falls back to the whitespace-split query unmodified.
    async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>> {
        if !self.credential.is_authenticated() {
            return Ok(query
                .split_whitespace()
                .last()
                .map(str::to_string)
                .into_iter()
                .collect());
        }

        let prompt = format!(
            concat!(
                "Analyze the user query and extract the keywords that carry the ",
                "significance of answering it. Skip common filler words ",
                "(is, are, the, in, a, of, for and the like) that add no uniqueness.\n",
                "Return ONLY the keywords separated by spaces. Do not explain.\n\n",
                "Question: {}"
            ),
            query
        );

        match self.chat(prompt).await {
            Ok(raw) => Ok(normalize_terms(&raw)),
            Err(e) => {
                warn!(error = %e, "keyword extraction failed, falling back to raw query tokens");
                Ok(query.split_whitespace().map(str::to_string).collect())
            }
        }
    }
}

/// Lowercases, strips non-alphanumeric characters, and drops tokens that end
/// up empty.
fn normalize_terms(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split_whitespace()
        .filter_map(|token| {
            let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.is_empty() {
                None
            } else {
                Some(word)
            }
        })
        .collect()
}
