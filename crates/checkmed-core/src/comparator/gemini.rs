//! Gemini-backed visual comparator.

use super::{parse_reply, Comparator, Comparison};
use crate::model::ImageBlob;
use crate::profile::InstructionProfile;
use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiComparator {
    pub model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiComparator {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from environment.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `GEMINI_API_KEY` | API key (required) |
    /// | `GEMINI_MODEL` | Model name (default: `gemini-2.5-flash`) |
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(model, api_key))
    }

    /// Override the API base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn inline_part(image: &ImageBlob) -> serde_json::Value {
        json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            }
        })
    }
}

#[async_trait]
impl Comparator for GeminiComparator {
    async fn compare(
        &self,
        reference: &ImageBlob,
        submitted: &ImageBlob,
        profile: InstructionProfile,
    ) -> anyhow::Result<Comparison> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let body = json!({
            "system_instruction": { "parts": [{ "text": profile.system_prompt() }] },
            "contents": [{
                "parts": [
                    { "text": profile.reference_label() },
                    Self::inline_part(reference),
                    { "text": profile.submitted_label() },
                    Self::inline_part(submitted),
                ]
            }]
        });

        tracing::debug!(model = %self.model, profile = %profile, "comparator call");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_else(|_| String::new());
            anyhow::bail!("gemini API error (status {status}): {error_text}");
        }

        let reply: serde_json::Value = resp
            .json()
            .await
            .context("gemini response was not valid JSON")?;

        let text = reply
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("gemini response missing candidate text"))?;

        parse_reply(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
