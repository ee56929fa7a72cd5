use crate::app::pipelines::{destructor_for, extract_sources, render_options};
use crate::core::declaration::update_output;
use crate::core::{ConfigProvider, Pipeline, ReshapeReport, SourceBundle, Storage};
use crate::utils::error::Result;

/// Reshapes the first declaration of the target struct. Without an output
/// path the declaration is printed to stdout.
pub struct SinglePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    rename_to: Option<String>,
}

impl<S: Storage, C: ConfigProvider> SinglePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            rename_to: None,
        }
    }

    pub fn with_var_name(mut self, var_name: Option<String>) -> Self {
        self.rename_to = var_name.filter(|name| !name.is_empty());
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SinglePipeline<S, C> {
    async fn extract(&self) -> Result<SourceBundle> {
        extract_sources(&self.storage, &self.config).await
    }

    async fn transform(&self, bundle: SourceBundle) -> Result<ReshapeReport> {
        let destructor = destructor_for(&bundle, &self.config)?;
        let mut options = render_options(&self.config, false);
        options.rename_to = self.rename_to.clone();

        let rendered = destructor.run(&bundle.init_text, &options)?;
        tracing::debug!("Rendered declaration of '{}'", rendered.var_name);

        Ok(ReshapeReport {
            declarations: vec![rendered],
            skipped: Vec::new(),
        })
    }

    async fn load(&self, report: ReshapeReport) -> Result<String> {
        match self.config.output_path() {
            Some(path) => {
                let existing = if self.storage.exists(path).await {
                    self.storage.read_to_string(path).await?
                } else {
                    String::new()
                };
                let updated = update_output(&existing, &report.declarations)?;
                self.storage.write_file(path, updated.as_bytes()).await?;
                Ok(path.to_string())
            }
            None => {
                println!("Full declaration:");
                for decl in &report.declarations {
                    println!("{}", decl.text);
                }
                Ok("stdout".to_string())
            }
        }
    }
}
