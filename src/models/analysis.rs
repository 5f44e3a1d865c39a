use super::ProductRecord;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 结构化输出外层: { products: [...] }
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExtractionOutput {
    #[validate(nested)]
    pub products: Vec<ProductRecord>,
}

/// 分析请求体: 图片 data URI
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub photo_url: String,
}

/// 一次分析的结果（含耗时）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub products: Vec<ProductRecord>,
    pub elapsed_ms: u64,
}
