use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::AnswerProvider;

pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AnswerProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, context: &str) -> anyhow::Result<String> {
        anyhow::ensure!(!self.api_key.is_empty(), "GEMINI_API_KEY is not configured");

        let full_prompt = format!(
            "You are a polite and helpful AI booking assistant for a salon/spa.\n\
             Use the following context from policy/FAQ documents when it is relevant to answer the user's query.\n\n\
             Context:\n{context}\n\n\
             User question:\n{prompt}\n"
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": full_prompt }],
            }],
        });

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API error ({}): {}", status, data);
        }

        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Gemini response"))
    }
}
