use crate::domain::model::{ReshapeReport, SourceBundle};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_to_string(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn header_file(&self) -> &str;
    fn view_file(&self) -> &str;
    fn init_file(&self) -> &str;
    fn mapping_file(&self) -> Option<&str>;
    fn target_struct(&self) -> &str;
    fn target_view(&self) -> &str;
    /// Type name written in front of the reshaped declaration.
    fn output_type(&self) -> &str {
        self.target_struct()
    }
    fn specifier(&self) -> Option<&str>;
    fn output_path(&self) -> Option<&str>;
    fn default_value(&self) -> &str {
        "0"
    }
    fn inline_mapping(&self) -> Option<&std::collections::BTreeMap<String, String>> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceBundle>;
    async fn transform(&self, bundle: SourceBundle) -> Result<ReshapeReport>;
    async fn load(&self, report: ReshapeReport) -> Result<String>;
}
