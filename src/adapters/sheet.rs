use crate::core::{SheetRow, Storage};
use crate::domain::model::SheetColumns;
use crate::utils::error::{FrameGridError, Result};
use std::collections::HashSet;

/// Rows of a header-less CSV export of the progress spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct SheetExport {
    rows: Vec<SheetRow>,
    /// Value of the lookup column for each row.
    lookup_keys: Vec<Option<String>>,
}

impl SheetExport {
    pub fn from_csv_bytes(data: &[u8], columns: SheetColumns) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut export = SheetExport::default();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |column: usize| {
                record
                    .get(column)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };

            export.lookup_keys.push(cell(columns.lookup));
            export.rows.push(SheetRow {
                row_number: index + 1,
                block: cell(columns.block),
                part: cell(columns.part),
                section: cell(columns.section),
                operator: cell(columns.operator),
                done: cell(columns.done),
                left: cell(columns.left),
                check: cell(columns.check),
            });
        }

        tracing::debug!("Parsed {} sheet rows", export.rows.len());
        Ok(export)
    }

    pub async fn load<S: Storage>(storage: &S, path: &str, columns: SheetColumns) -> Result<Self> {
        let data = storage.read_file(path).await?;
        Self::from_csv_bytes(&data, columns)
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    /// Rows naming `operator` that carry a frame.
    pub fn assigned_to(&self, operator: &str) -> Vec<&SheetRow> {
        self.rows
            .iter()
            .filter(|row| {
                row.section.is_some()
                    && row
                        .operator
                        .as_deref()
                        .is_some_and(|cell| cell.contains(operator))
            })
            .collect()
    }

    /// Distinct frames of `block`, in sheet order.
    pub fn block_frames(&self, block: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let frames: Vec<String> = self
            .rows
            .iter()
            .zip(&self.lookup_keys)
            .filter(|(_, key)| key.as_deref() == Some(block))
            .filter_map(|(row, _)| row.section.clone())
            .filter(|frame| seen.insert(frame.clone()))
            .collect();

        if frames.is_empty() {
            return Err(FrameGridError::BlockNotFound {
                block: block.to_string(),
            });
        }
        Ok(frames)
    }
}
