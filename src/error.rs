use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 分析流程中的错误
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// 图片无法读取或 data URI 无效
    #[error("encoding error: {0}")]
    Encoding(String),

    /// 网络、超时、鉴权或服务端失败
    #[error("model request error: {0}")]
    ModelRequest(String),

    /// 模型输出不符合声明的结构
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    #[error("no image selected")]
    NoImage,

    #[error("an analysis is already in flight")]
    Busy,
}

impl AnalyzeError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzeError::Encoding(_) => "ENCODING_ERROR",
            AnalyzeError::ModelRequest(_) => "MODEL_REQUEST_ERROR",
            AnalyzeError::SchemaValidation(_) => "SCHEMA_VALIDATION_ERROR",
            AnalyzeError::NoImage => "NO_IMAGE",
            AnalyzeError::Busy => "BUSY",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::Encoding(_) | AnalyzeError::NoImage => StatusCode::BAD_REQUEST,
            AnalyzeError::ModelRequest(_) | AnalyzeError::SchemaValidation(_) => {
                StatusCode::BAD_GATEWAY
            }
            AnalyzeError::Busy => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// 展示给用户的提示文本（三类失败共用一条通用提示）
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalyzeError::NoImage => "Envie uma imagem primeiro.",
            AnalyzeError::Busy => "Já existe uma análise em andamento. Aguarde o resultado.",
            _ => "Falha ao analisar a imagem. Tente novamente.",
        }
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalyzeError::ModelRequest(format!("request timed out: {}", e))
        } else {
            AnalyzeError::ModelRequest(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AnalyzeError {
    fn from(err: validator::ValidationErrors) -> Self {
        AnalyzeError::SchemaValidation(err.to_string())
    }
}

/// JSON 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.code().to_string(),
            message: self.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (self.status(), Json(body)).into_response()
    }
}
