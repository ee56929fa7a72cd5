use crate::app::pipelines::{destructor_for, extract_sources, render_options};
use crate::core::declaration::{find_declarations, update_output};
use crate::core::{ConfigProvider, Pipeline, ReshapeReport, SourceBundle, Storage};
use crate::utils::error::{DestructorError, Result};

/// Reshapes every declaration of the target struct and merges the results
/// into the output header, replacing earlier versions by variable name.
pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<SourceBundle> {
        extract_sources(&self.storage, &self.config).await
    }

    async fn transform(&self, bundle: SourceBundle) -> Result<ReshapeReport> {
        let declarations = find_declarations(&bundle.init_text, self.config.target_struct())?;
        if declarations.is_empty() {
            return Err(DestructorError::DeclarationNotFoundError {
                struct_name: self.config.target_struct().to_string(),
            });
        }
        tracing::info!(
            "📋 Found {} declarations of '{}'",
            declarations.len(),
            self.config.target_struct()
        );

        let destructor = destructor_for(&bundle, &self.config)?;
        let options = render_options(&self.config, true);
        let mut report = ReshapeReport::default();

        for decl in &declarations {
            match destructor.process_declaration(decl, &options) {
                Ok(rendered) => {
                    tracing::debug!("✅ Reshaped '{}'", rendered.var_name);
                    report.declarations.push(rendered);
                }
                Err(e @ DestructorError::ShapeMismatchError { .. }) => {
                    tracing::warn!(
                        "⚠️ Declaration '{}' does not match the expected structure: {}",
                        decl.var_name,
                        e
                    );
                    report.skipped.push(decl.var_name.clone());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    async fn load(&self, report: ReshapeReport) -> Result<String> {
        let path = self
            .config
            .output_path()
            .ok_or_else(|| DestructorError::MissingConfigError {
                field: "output.path".to_string(),
            })?;

        let existing = if self.storage.exists(path).await {
            self.storage.read_to_string(path).await?
        } else {
            tracing::debug!("Output file {} does not exist yet, creating it", path);
            String::new()
        };

        let updated = update_output(&existing, &report.declarations)?;
        self.storage.write_file(path, updated.as_bytes()).await?;

        Ok(path.to_string())
    }
}
