use product_lens_rust::{api, AnalyzerService, AppConfig, ExtractionContract, GeminiClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);
    if config.model.api_key.is_empty() {
        warn!("No model API key configured (GEMINI_API_KEY); analyses will fail");
    }

    // 提示词与 schema 启动时加载一次
    let contract = match &config.model.prompt_file {
        Some(path) => {
            info!("Loading prompt from {}", path);
            ExtractionContract::from_prompt_file(path)?
        }
        None => ExtractionContract::default(),
    };

    let client = GeminiClient::new(&config.model, Arc::new(contract))?;
    info!("Model endpoint: {}", client.endpoint());
    let service = Arc::new(AnalyzerService::new(
        Arc::new(client),
        config.analysis.max_in_flight,
    ));

    let app = api::router(service, config.server.max_upload_bytes);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("Endpoints:");
    info!("  GET  /             - upload page");
    info!("  POST /analyze      - multipart upload, HTML result");
    info!("  POST /api/analyze  - {{ photoUrl }} -> {{ products }}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
