use crate::core::adjacency::AnnotatedCell;
use crate::core::grid::Grid;
use crate::core::scheme::NamingConvention;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the progress sheet export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// 1-based, as shown in the spreadsheet.
    pub row_number: usize,
    pub block: Option<String>,
    pub part: Option<String>,
    pub section: Option<String>,
    pub operator: Option<String>,
    pub done: Option<String>,
    pub left: Option<String>,
    pub check: Option<String>,
}

/// Top sheets per row of the regional mosaic (a 12×12 block of sheets).
pub const DEFAULT_SHEETS_PER_ROW: u16 = 12;

/// How top sheets tile the regional mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicLayout {
    pub sheets_per_row: u16,
}

impl Default for MosaicLayout {
    fn default() -> Self {
        Self {
            sheets_per_row: DEFAULT_SHEETS_PER_ROW,
        }
    }
}

impl MosaicLayout {
    pub fn new(sheets_per_row: u16) -> Self {
        Self { sheets_per_row }
    }
}

/// Zero-based column indices of the sheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetColumns {
    pub block: usize,
    pub part: usize,
    pub section: usize,
    pub operator: usize,
    pub done: usize,
    pub left: usize,
    pub check: usize,
    /// Column compared with the requested block when collecting a block's frames.
    pub lookup: usize,
}

impl Default for SheetColumns {
    fn default() -> Self {
        // B, C, D, E, G, H, J
        Self {
            block: 1,
            part: 2,
            section: 3,
            operator: 4,
            done: 6,
            left: 7,
            check: 9,
            lookup: 2,
        }
    }
}

/// How frame payloads are laid out under the search path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    /// `<search>/<block>/LAZ/<frame>.laz`
    Root,
    /// `<search>/<frame>.laz`
    #[default]
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionRequest {
    pub block: String,
    /// Frames the operator has taken in this batch.
    pub taken: Vec<String>,
    pub frames_location: String,
}

/// A persisted record of frames taken from one block, with the grid they were picked from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionBatch {
    pub id: String,
    pub block: String,
    pub frames: Vec<String>,
    pub frames_location: String,
    pub convention: NamingConvention,
    pub schema: Grid,
    pub adjacent_frames: Vec<String>,
    pub adjacent_schema: Vec<Vec<AnnotatedCell>>,
    pub created_at: DateTime<Utc>,
}
