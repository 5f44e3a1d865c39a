use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_CONFIG_FILE: &str = "product-lens";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传图片的最大字节数（不做压缩，仅防止 axum 默认 2MB 限制误拒）
    pub max_upload_bytes: usize,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// 覆盖内置提示词的文件路径
    pub prompt_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 同时进行中的分析数上限
    pub max_in_flight: usize,
}

// api_key 不进日志
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("name", &self.name)
            .field("api_key", &key)
            .field("timeout_secs", &self.timeout_secs)
            .field("prompt_file", &self.prompt_file)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_upload_bytes: 20 * 1024 * 1024,
            },
            model: ModelConfig {
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                name: "gemini-2.0-flash".to_string(),
                api_key: String::new(),
                timeout_secs: 120,
                prompt_file: None,
            },
            analysis: AnalysisConfig { max_in_flight: 1 },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> 配置文件 -> APP__* 环境变量 -> 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("PRODUCT_LENS_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok();

        Self::builder()?
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("model.api_key", api_key)?
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let d = Self::default();
        Config::builder()
            .set_default("server.host", d.server.host)?
            .set_default("server.port", i64::from(d.server.port))?
            .set_default("server.max_upload_bytes", d.server.max_upload_bytes as i64)?
            .set_default("model.base_url", d.model.base_url)?
            .set_default("model.name", d.model.name)?
            .set_default("model.api_key", d.model.api_key)?
            .set_default("model.timeout_secs", d.model.timeout_secs as i64)?
            .set_default("analysis.max_in_flight", d.analysis.max_in_flight as i64)
    }

    /// 从 TOML 文本加载（默认值之上叠加），便于测试
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
