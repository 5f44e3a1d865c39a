use crate::error::AnalyzeError;
use crate::llm::ProductExtractor;
use crate::models::AnalysisReport;
use crate::service::encoder::DataUri;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// 分析服务: 编码 -> 抽取，带在途请求上限
pub struct AnalyzerService {
    extractor: Arc<dyn ProductExtractor>,
    in_flight: Semaphore,
}

impl AnalyzerService {
    pub fn new(extractor: Arc<dyn ProductExtractor>, max_in_flight: usize) -> Self {
        Self {
            extractor,
            in_flight: Semaphore::new(max_in_flight.max(1)),
        }
    }

    /// 分析上传的图片；未选择图片时直接返回，不调用模型
    pub async fn analyze_image(&self, image: Option<DataUri>) -> Result<AnalysisReport, AnalyzeError> {
        let Some(image) = image else {
            tracing::warn!("Analysis requested without an image");
            return Err(AnalyzeError::NoImage);
        };
        self.analyze(&image.encode()).await
    }

    /// 分析一张 data URI 图片
    pub async fn analyze(&self, photo_url: &str) -> Result<AnalysisReport, AnalyzeError> {
        let _permit = self.in_flight.try_acquire().map_err(|_| {
            tracing::warn!("Rejecting analysis: another one is in flight");
            AnalyzeError::Busy
        })?;

        let start = Instant::now();
        tracing::info!("Analyzing image ({} bytes data URI)", photo_url.len());

        match self.extractor.extract(photo_url).await {
            Ok(products) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                tracing::info!(
                    "Analysis finished: {} products in {:.2}s",
                    products.len(),
                    elapsed_ms as f64 / 1000.0
                );
                Ok(AnalysisReport { products, elapsed_ms })
            }
            Err(e) => {
                tracing::error!("Error analyzing image: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::product;
    use crate::models::ProductRecord;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct Fake {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        result: fn() -> Result<Vec<ProductRecord>, AnalyzeError>,
    }

    #[async_trait]
    impl ProductExtractor for Fake {
        async fn extract(&self, _photo_url: &str) -> Result<Vec<ProductRecord>, AnalyzeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.result)()
        }
    }

    fn fake(result: fn() -> Result<Vec<ProductRecord>, AnalyzeError>) -> Arc<Fake> {
        Arc::new(Fake { calls: AtomicUsize::new(0), gate: None, result })
    }

    fn image() -> Option<DataUri> {
        Some(DataUri::new("image/png", vec![1, 2, 3]))
    }

    #[tokio::test]
    async fn returns_products() {
        let extractor = fake(|| Ok(vec![product("Arroz", 25.0), product("Feijão", 9.0)]));
        let service = AnalyzerService::new(extractor.clone(), 1);
        let report = service.analyze_image(image()).await.unwrap();
        assert_eq!(report.products.len(), 2);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_image_skips_model() {
        let extractor = fake(|| Ok(vec![]));
        let service = AnalyzerService::new(extractor.clone(), 1);
        assert!(matches!(service.analyze_image(None).await, Err(AnalyzeError::NoImage)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn propagates_extraction_failure() {
        let extractor = fake(|| Err(AnalyzeError::ModelRequest("connection refused".into())));
        let service = AnalyzerService::new(extractor, 1);
        assert!(matches!(
            service.analyze_image(image()).await,
            Err(AnalyzeError::ModelRequest(_))
        ));
    }

    #[tokio::test]
    async fn second_request_while_in_flight_is_rejected() {
        let gate = Arc::new(Notify::new());
        let extractor = Arc::new(Fake {
            calls: AtomicUsize::new(0),
            gate: Some(gate.clone()),
            result: || Ok(vec![product("Leite", 5.0)]),
        });
        let service = Arc::new(AnalyzerService::new(extractor.clone(), 1));

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.analyze_image(image()).await })
        };
        while extractor.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(service.analyze_image(image()).await, Err(AnalyzeError::Busy)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.products.len(), 1);

        // 许可已释放
        gate.notify_one();
        assert!(service.analyze_image(image()).await.is_ok());
    }
}
