pub mod acquisition;
pub mod adjacency;
pub mod alphanumeric;
pub mod engine;
pub mod grid;
pub mod hierarchical;
pub mod pipeline;
pub mod scheme;

pub use crate::domain::model::{AcquisitionBatch, SheetRow};
pub use crate::domain::ports::{AcquisitionPipeline, ConfigProvider, Storage};
pub use crate::utils::error::Result;
