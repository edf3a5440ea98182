use crate::domain::model::{
    AcquisitionBatch, AcquisitionRequest, MosaicLayout, PathType, SheetColumns,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn operator_name(&self) -> &str;
    fn sheet_export_path(&self) -> &str;
    fn sheet_columns(&self) -> SheetColumns;
    fn search_path(&self) -> &str;
    fn destination_path(&self) -> &str;
    fn path_type(&self) -> PathType;
    /// File name of the batch store, relative to the storage root.
    fn store_file(&self) -> &str;
    fn mosaic_layout(&self) -> MosaicLayout;
}

#[async_trait]
pub trait AcquisitionPipeline: Send + Sync {
    /// All frames of the requested block.
    async fn extract(&self, request: &AcquisitionRequest) -> Result<Vec<String>>;
    async fn transform(
        &self,
        request: &AcquisitionRequest,
        frames: Vec<String>,
    ) -> Result<AcquisitionBatch>;
    /// Persists the batch and returns its id.
    async fn load(&self, batch: AcquisitionBatch) -> Result<String>;
}
