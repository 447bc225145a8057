use crate::domain::model::{ScanInput, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn escaped_input(&self) -> bool;
    fn reference_date(&self) -> Option<NaiveDate>;
    /// 設定時將所有輸出打包成此名稱的 zip
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ScanInput>>;
    async fn transform(&self, data: Vec<ScanInput>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
