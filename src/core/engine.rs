use crate::core::adjacency::{adjacent_frames, display_grid, AnnotatedCell};
use crate::core::alphanumeric::AlphaNumericGridBuilder;
use crate::core::grid::Grid;
use crate::core::hierarchical::HierarchicalGridBuilder;
use crate::core::scheme::{classify, NamingConvention};
use crate::domain::model::MosaicLayout;
use crate::utils::error::{FrameGridError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Trimmed grid of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGrid {
    pub convention: NamingConvention,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyReport {
    pub convention: NamingConvention,
    /// Trimmed presence grid of the whole batch.
    pub grid: Grid,
    pub adjacent: Vec<String>,
    pub display: Vec<Vec<AnnotatedCell>>,
}

/// Entry point of the grid engine. Holds no state besides the mosaic layout, so one
/// engine can serve any number of batches.
#[derive(Debug, Clone, Default)]
pub struct FrameGridEngine {
    layout: MosaicLayout,
}

impl FrameGridEngine {
    pub fn new(layout: MosaicLayout) -> Self {
        Self { layout }
    }

    /// Convention of the batch, taken from its first frame.
    pub fn detect<S: AsRef<str>>(&self, frames: &[S]) -> Result<NamingConvention> {
        let first = frames.first().ok_or(FrameGridError::EmptyBatch)?;
        Ok(classify(first.as_ref()).convention())
    }

    pub fn ensure_homogeneous<S: AsRef<str>>(
        &self,
        frames: &[S],
        convention: NamingConvention,
    ) -> Result<()> {
        match frames
            .iter()
            .map(|f| f.as_ref())
            .find(|name| classify(name).convention() != convention)
        {
            Some(name) => Err(FrameGridError::MixedConventions {
                expected: convention.to_string(),
                identifier: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Untrimmed presence grid, the input adjacency needs.
    pub fn presence_grid<S: AsRef<str>>(
        &self,
        frames: &[S],
        convention: NamingConvention,
    ) -> Result<Grid> {
        match convention {
            NamingConvention::Hierarchical => {
                Ok(HierarchicalGridBuilder::new(self.layout).presence_grid(frames))
            }
            NamingConvention::ColNumberRowLetter | NamingConvention::LetterUnderscoreNumber => {
                AlphaNumericGridBuilder::new(convention)?.presence_grid(frames)
            }
            NamingConvention::RowLetterColNumber | NamingConvention::Unknown => {
                Err(FrameGridError::UnsupportedConvention {
                    convention: convention.to_string(),
                })
            }
        }
    }

    fn checked_presence_grid<S: AsRef<str>>(&self, frames: &[S]) -> Result<(NamingConvention, Grid)> {
        let convention = self.detect(frames)?;
        self.ensure_homogeneous(frames, convention)?;
        let grid = self.presence_grid(frames, convention)?;
        tracing::debug!(
            "Built {}x{} {} grid for {} frames",
            grid.row_count(),
            grid.col_count(),
            convention,
            frames.len()
        );
        Ok((convention, grid))
    }

    pub fn build<S: AsRef<str>>(&self, frames: &[S]) -> Result<FrameGrid> {
        let (convention, grid) = self.checked_presence_grid(frames)?;
        Ok(FrameGrid {
            convention,
            grid: grid.trim(),
        })
    }

    /// Grid of `frames` plus the frames adjacent to `taken`. Taken frames outside the
    /// batch have no position and never produce adjacency.
    pub fn adjacency<S: AsRef<str>, T: AsRef<str>>(
        &self,
        frames: &[S],
        taken: &[T],
    ) -> Result<AdjacencyReport> {
        // 鄰接要用未裁切的網格計算
        let (convention, grid) = self.checked_presence_grid(frames)?;
        let taken: HashSet<&str> = taken.iter().map(|t| t.as_ref()).collect();

        let adjacent = adjacent_frames(&grid, &taken);
        let display = display_grid(&grid, &taken, &adjacent);
        tracing::info!(
            "{} taken frames, {} adjacent frames available",
            taken.len(),
            adjacent.len()
        );

        Ok(AdjacencyReport {
            convention,
            grid: grid.trim(),
            adjacent,
            display,
        })
    }
}
