use super::{parse_products, ExtractionContract, ProductExtractor};
use crate::config::ModelConfig;
use crate::error::AnalyzeError;
use crate::models::ProductRecord;
use crate::service::encoder::DataUri;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Google Generative Language `generateContent` 客户端（结构化输出）
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    contract: Arc<ExtractionContract>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// 第一个候选的全部文本片段拼接
    fn into_text(self) -> Result<String, AnalyzeError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(AnalyzeError::SchemaValidation(format!("prompt blocked: {}", reason)));
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AnalyzeError::SchemaValidation("response has no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AnalyzeError::SchemaValidation(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, contract: Arc<ExtractionContract>) -> Result<Self, AnalyzeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.name
        );
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
            contract,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, image: &DataUri) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": self.contract.prompt() },
                    { "inlineData": { "mimeType": image.mime_type, "data": image.base64_data() } }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": self.contract.schema()
            }
        })
    }
}

#[async_trait]
impl ProductExtractor for GeminiClient {
    async fn extract(&self, photo_url: &str) -> Result<Vec<ProductRecord>, AnalyzeError> {
        let image = DataUri::parse(photo_url)?;
        info!(
            "Requesting product extraction: {} bytes of {}",
            image.bytes.len(),
            image.mime_type
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(&image))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!("Model endpoint returned {}: {}", status, excerpt(&body));
            return Err(AnalyzeError::ModelRequest(format!(
                "model endpoint returned {}",
                status
            )));
        }

        let envelope: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| AnalyzeError::ModelRequest(format!("unexpected response envelope: {}", e)))?;
        let products = parse_products(&envelope.into_text()?)?;
        info!("Model returned {} products", products.len());
        Ok(products)
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(300) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
