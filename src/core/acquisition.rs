use crate::core::{AcquisitionBatch, AcquisitionPipeline};
use crate::domain::model::AcquisitionRequest;
use crate::utils::error::Result;

pub struct AcquisitionEngine<P: AcquisitionPipeline> {
    pipeline: P,
}

impl<P: AcquisitionPipeline> AcquisitionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs extract, transform and load for one request and returns the stored batch.
    pub async fn run(&self, request: &AcquisitionRequest) -> Result<AcquisitionBatch> {
        tracing::info!("Starting acquisition for block {}", request.block);

        let frames = self.pipeline.extract(request).await?;
        tracing::info!("Block {} lists {} frames", request.block, frames.len());

        let batch = self.pipeline.transform(request, frames).await?;
        tracing::info!(
            "Laid out {} frames as a {} grid, {} adjacent frames",
            batch.frames.len(),
            batch.convention,
            batch.adjacent_frames.len()
        );

        let id = self.pipeline.load(batch.clone()).await?;
        tracing::info!("Batch {} saved", id);

        Ok(batch)
    }
}
