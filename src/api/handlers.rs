use crate::error::AnalyzeError;
use crate::models::{AnalysisReport, AnalyzeRequest};
use crate::render::{render_page, PageState};
use crate::service::encoder::{mime_from_name, DataUri};
use crate::service::AnalyzerService;
use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

/// 表单中的图片字段名
pub const IMAGE_FIELD: &str = "image";

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 首页（空闲状态）
pub async fn index() -> Html<String> {
    Html(render_page(&PageState::Idle))
}

/// 表单上传分析，返回渲染后的页面
pub async fn analyze_form(
    State(service): State<Arc<AnalyzerService>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let result = match read_image(multipart).await {
        Ok(image) => service.analyze_image(image).await,
        Err(e) => {
            tracing::error!("Error reading upload: {}", e);
            Err(e)
        }
    };

    match result {
        Ok(report) => (StatusCode::OK, Html(render_page(&PageState::Success(report)))),
        // 分析失败已由服务层记录
        Err(e) => {
            let state = PageState::Failed {
                message: e.user_message().to_string(),
            };
            (e.status(), Html(render_page(&state)))
        }
    }
}

/// JSON 接口: { photoUrl } -> { products, elapsedMs }
pub async fn analyze_json(
    State(service): State<Arc<AnalyzerService>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AnalyzeError> {
    if req.photo_url.trim().is_empty() {
        return Err(AnalyzeError::NoImage);
    }
    let report = service.analyze(&req.photo_url).await?;
    Ok(Json(report))
}

/// 读取 multipart 中的图片；未选择文件（空字段）时返回 None
async fn read_image(mut multipart: Multipart) -> Result<Option<DataUri>, AnalyzeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalyzeError::Encoding(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = match field.content_type() {
            Some(ct) if ct != "application/octet-stream" => ct.to_string(),
            _ => mime_from_name(&file_name).to_string(),
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalyzeError::Encoding(e.to_string()))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        tracing::info!("Received image '{}' ({}, {} bytes)", file_name, mime_type, bytes.len());
        return Ok(Some(DataUri::new(mime_type, bytes.to_vec())));
    }
    Ok(None)
}
