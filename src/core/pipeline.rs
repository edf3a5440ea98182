use crate::adapters::sheet::SheetExport;
use crate::adapters::store::BatchStore;
use crate::core::engine::FrameGridEngine;
use crate::core::grid::Grid;
use crate::core::{AcquisitionBatch, AcquisitionPipeline, ConfigProvider, Storage};
use crate::domain::model::AcquisitionRequest;
use crate::utils::error::{FrameGridError, Result};
use chrono::Utc;

/// Reads block frames from the sheet export and records batches in a JSON store.
pub struct SheetPipeline<S: Storage, C: ConfigProvider> {
    sheet_storage: S,
    store: BatchStore<S>,
    config: C,
    engine: FrameGridEngine,
}

impl<S: Storage, C: ConfigProvider> SheetPipeline<S, C> {
    pub fn new(sheet_storage: S, store: BatchStore<S>, config: C) -> Self {
        let engine = FrameGridEngine::new(config.mosaic_layout());
        Self {
            sheet_storage,
            store,
            config,
            engine,
        }
    }

    pub fn store(&self) -> &BatchStore<S> {
        &self.store
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> AcquisitionPipeline for SheetPipeline<S, C> {
    async fn extract(&self, request: &AcquisitionRequest) -> Result<Vec<String>> {
        tracing::debug!("Reading sheet export {}", self.config.sheet_export_path());
        let export = SheetExport::load(
            &self.sheet_storage,
            self.config.sheet_export_path(),
            self.config.sheet_columns(),
        )
        .await?;

        export.block_frames(&request.block)
    }

    async fn transform(
        &self,
        request: &AcquisitionRequest,
        frames: Vec<String>,
    ) -> Result<AcquisitionBatch> {
        let outside: Vec<&String> = request
            .taken
            .iter()
            .filter(|taken| !frames.contains(taken))
            .collect();
        if !outside.is_empty() {
            tracing::warn!(
                "{} taken frames are not listed for block {}: {:?}",
                outside.len(),
                request.block,
                outside
            );
        }

        let (convention, schema, adjacent_frames, adjacent_schema) =
            match self.engine.adjacency(&frames, &request.taken) {
                Ok(report) => (report.convention, report.grid, report.adjacent, report.display),
                // 無法排版的命名方式只保存清單
                Err(FrameGridError::UnsupportedConvention { convention }) => {
                    tracing::warn!(
                        "Block {} uses the {} convention, storing frames without a grid",
                        request.block,
                        convention
                    );
                    (
                        self.engine.detect(&frames)?,
                        Grid::default(),
                        Vec::new(),
                        Vec::new(),
                    )
                }
                Err(e) => return Err(e),
            };

        let created_at = Utc::now();
        Ok(AcquisitionBatch {
            id: format!("{}-{}", request.block, created_at.format("%Y%m%d%H%M%S%6f")),
            block: request.block.clone(),
            frames: request.taken.clone(),
            frames_location: request.frames_location.clone(),
            convention,
            schema,
            adjacent_frames,
            adjacent_schema,
            created_at,
        })
    }

    async fn load(&self, batch: AcquisitionBatch) -> Result<String> {
        let id = batch.id.clone();
        self.store.add(batch).await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheme::NamingConvention;
    use crate::domain::model::{MosaicLayout, PathType, SheetColumns};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn with_file(self, path: &str, data: &str) -> Self {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
            self
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                FrameGridError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.to_string(),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig;

    impl ConfigProvider for TestConfig {
        fn operator_name(&self) -> &str {
            "Petrenko"
        }
        fn sheet_export_path(&self) -> &str {
            "sheet.csv"
        }
        fn sheet_columns(&self) -> SheetColumns {
            SheetColumns::default()
        }
        fn search_path(&self) -> &str {
            "/search"
        }
        fn destination_path(&self) -> &str {
            "/dest"
        }
        fn path_type(&self) -> PathType {
            PathType::Flat
        }
        fn store_file(&self) -> &str {
            "frames.json"
        }
        fn mosaic_layout(&self) -> MosaicLayout {
            MosaicLayout::default()
        }
    }

    const SHEET: &str = "\
1,2701,P1,1A,Petrenko
2,2701,P1,2A,Petrenko
3,2701,P1,3A,Petrenko
4,2701,P2,A1,Petrenko
";

    async fn pipeline() -> SheetPipeline<MockStorage, TestConfig> {
        let sheet = MockStorage::default().with_file("sheet.csv", SHEET).await;
        let store = BatchStore::new(MockStorage::default(), "frames.json");
        SheetPipeline::new(sheet, store, TestConfig)
    }

    fn request(block: &str, taken: &[&str]) -> AcquisitionRequest {
        AcquisitionRequest {
            block: block.to_string(),
            taken: taken.iter().map(|t| t.to_string()).collect(),
            frames_location: "/dest/2701/1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_pipeline_stages() {
        let pipeline = pipeline().await;
        let request = request("P1", &["1A"]);

        let frames = pipeline.extract(&request).await.unwrap();
        assert_eq!(frames, vec!["1A", "2A", "3A"]);

        let batch = pipeline.transform(&request, frames).await.unwrap();
        assert_eq!(batch.convention, NamingConvention::ColNumberRowLetter);
        assert_eq!(batch.adjacent_frames, vec!["2A"]);
        assert!(batch.id.starts_with("P1-"));

        let id = pipeline.load(batch).await.unwrap();
        assert_eq!(pipeline.store().get(&id).await.unwrap().frames, vec!["1A"]);
    }

    #[tokio::test]
    async fn test_unsupported_block_is_stored_as_list() {
        let pipeline = pipeline().await;
        let request = request("P2", &["A1"]);

        let frames = pipeline.extract(&request).await.unwrap();
        let batch = pipeline.transform(&request, frames).await.unwrap();
        assert_eq!(batch.convention, NamingConvention::RowLetterColNumber);
        assert_eq!(batch.schema, Grid::default());
        assert!(batch.adjacent_frames.is_empty());
    }
}
