pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod render;
pub mod service;

pub use config::AppConfig;
pub use error::AnalyzeError;
pub use llm::{ExtractionContract, GeminiClient, ProductExtractor};
pub use service::{AnalyzerService, DataUri};
