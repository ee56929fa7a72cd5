use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct DestructorEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DestructorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting reshape process...");

        tracing::info!("📥 Loading struct definitions and initializers...");
        let bundle = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} full structs, {} view structs, {} mapping entries",
            bundle.full_structs.len(),
            bundle.view_structs.len(),
            bundle.mapping.len()
        );

        tracing::info!("🔧 Reshaping initializers...");
        let report = self.pipeline.transform(bundle).await?;
        tracing::info!(
            "Reshaped {} declarations ({} skipped)",
            report.declarations.len(),
            report.skipped.len()
        );

        tracing::info!("💾 Writing output...");
        let location = self.pipeline.load(report).await?;
        tracing::info!("Output written to: {}", location);

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::FieldMapping;
    use crate::domain::model::{ReshapeReport, SourceBundle, StructSet, ViewNode};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<SourceBundle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SourceBundle {
                full_structs: StructSet::new(),
                view_structs: StructSet::new(),
                view_tree: ViewNode::Struct(Vec::new()),
                mapping: FieldMapping::new(),
                init_text: String::new(),
            })
        }

        async fn transform(&self, _bundle: SourceBundle) -> Result<ReshapeReport> {
            self.calls.fetch_add(10, Ordering::SeqCst);
            Ok(ReshapeReport::default())
        }

        async fn load(&self, _report: ReshapeReport) -> Result<String> {
            self.calls.fetch_add(100, Ordering::SeqCst);
            Ok("memory".to_string())
        }
    }

    #[test]
    fn test_engine_runs_all_phases() {
        let engine = DestructorEngine::new(CountingPipeline {
            calls: AtomicUsize::new(0),
        });
        let location = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(location, "memory");
        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 111);
    }
}
