pub mod analyzer;
pub mod encoder;

pub use analyzer::AnalyzerService;
pub use encoder::DataUri;
