pub mod analysis;
pub mod product;

pub use analysis::{AnalysisReport, AnalyzeRequest, ExtractionOutput};
pub use product::{ProductRecord, Tag, Variation};
