use crate::core::{AcquisitionBatch, Storage};
use crate::utils::error::{FrameGridError, Result};

/// Acquisition batches kept as one pretty-printed JSON array.
pub struct BatchStore<S: Storage> {
    storage: S,
    file: String,
}

impl<S: Storage> BatchStore<S> {
    pub fn new(storage: S, file: impl Into<String>) -> Self {
        Self {
            storage,
            file: file.into(),
        }
    }

    /// A store file that does not exist yet holds no batches.
    pub async fn list(&self) -> Result<Vec<AcquisitionBatch>> {
        let data = match self.storage.read_file(&self.file).await {
            Ok(data) => data,
            Err(FrameGridError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Batch store {} does not exist yet", self.file);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn get(&self, id: &str) -> Result<AcquisitionBatch> {
        self.list()
            .await?
            .into_iter()
            .find(|batch| batch.id == id)
            .ok_or_else(|| FrameGridError::BatchNotFound { id: id.to_string() })
    }

    pub async fn add(&self, batch: AcquisitionBatch) -> Result<()> {
        let mut batches = self.list().await?;
        tracing::debug!("Storing batch {} ({} frames)", batch.id, batch.frames.len());
        batches.push(batch);
        self.save(&batches).await
    }

    pub async fn delete(&self, id: &str) -> Result<AcquisitionBatch> {
        let mut batches = self.list().await?;
        let index = batches
            .iter()
            .position(|batch| batch.id == id)
            .ok_or_else(|| FrameGridError::BatchNotFound { id: id.to_string() })?;

        let removed = batches.remove(index);
        self.save(&batches).await?;
        Ok(removed)
    }

    async fn save(&self, batches: &[AcquisitionBatch]) -> Result<()> {
        let json = serde_json::to_vec_pretty(batches)?;
        self.storage.write_file(&self.file, &json).await?;
        tracing::debug!("Batch store {} saved ({} batches)", self.file, batches.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::core::scheme::NamingConvention;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
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
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn batch(id: &str) -> AcquisitionBatch {
        AcquisitionBatch {
            id: id.to_string(),
            block: "2701".to_string(),
            frames: vec!["1A".to_string()],
            frames_location: "/frames/2701/1".to_string(),
            convention: NamingConvention::ColNumberRowLetter,
            schema: Grid::from_rows(vec![vec![Some("1A".to_string())]]),
            adjacent_frames: Vec::new(),
            adjacent_schema: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_store_is_empty() {
        let store = BatchStore::new(MockStorage::default(), "frames.json");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_get_delete() {
        let store = BatchStore::new(MockStorage::default(), "frames.json");
        store.add(batch("first")).await.unwrap();
        store.add(batch("second")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.get("second").await.unwrap().block, "2701");

        let removed = store.delete("first").await.unwrap();
        assert_eq!(removed.id, "first");

        let remaining: Vec<String> = store.list().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(remaining, vec!["second"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_batch() {
        let store = BatchStore::new(MockStorage::default(), "frames.json");
        let err = store.delete("nope").await.unwrap_err();
        assert!(matches!(err, FrameGridError::BatchNotFound { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_store_is_reported() {
        let storage = MockStorage::default();
        storage.write_file("frames.json", b"{not json").await.unwrap();

        let store = BatchStore::new(storage, "frames.json");
        assert!(matches!(
            store.list().await,
            Err(FrameGridError::SerializationError(_))
        ));
    }
}
