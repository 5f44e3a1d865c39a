pub mod contract;
pub mod gemini;

pub use contract::ExtractionContract;
pub use gemini::GeminiClient;

use crate::error::AnalyzeError;
use crate::models::{ExtractionOutput, ProductRecord};
use async_trait::async_trait;
use validator::Validate;

/// 结构化抽取: 一张图片的 data URI -> 商品列表
#[async_trait]
pub trait ProductExtractor: Send + Sync {
    async fn extract(&self, photo_url: &str) -> Result<Vec<ProductRecord>, AnalyzeError>;
}

/// 解析并校验模型返回的 JSON 文本
pub fn parse_products(text: &str) -> Result<Vec<ProductRecord>, AnalyzeError> {
    let body = strip_code_fence(text.trim());
    let output: ExtractionOutput = serde_json::from_str(body)
        .map_err(|e| AnalyzeError::SchemaValidation(e.to_string()))?;

    output.validate()?;

    Ok(output.products)
}

// 模型偶尔会把 JSON 包在 ```json ... ``` 里
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
