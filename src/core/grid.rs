//! Rectangular frame grid and its bounding-box trimmer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A grid cell: the frame name when present, `None` when the position is addressable
/// but the frame is missing from the batch.
pub type Cell = Option<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Rows must all have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.windows(2).all(|pair| pair[0].len() == pair[1].len()));
        Self { rows }
    }

    pub fn blank(row_count: usize, col_count: usize) -> Self {
        Self {
            rows: vec![vec![None; col_count]; row_count],
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn set(&mut self, row: usize, col: usize, label: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = Some(label);
        }
    }

    /// True when no cell holds a frame.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    pub fn present_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn position_of(&self, label: &str) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| cell.as_deref() == Some(label))
                .map(|c| (r, c))
        })
    }

    /// Blanks every cell whose frame is not in `files`. The shape is unchanged.
    pub fn mark_presence(mut self, files: &HashSet<&str>) -> Self {
        for cell in self.rows.iter_mut().flatten() {
            if cell.as_deref().is_some_and(|label| !files.contains(label)) {
                *cell = None;
            }
        }
        self
    }

    /// Drops all-empty rows, then slices the remaining rows to the shared column range
    /// spanning every row's first and last non-empty cell.
    pub fn trim(&self) -> Grid {
        // 所有列共用同一個欄範圍
        let kept: Vec<&Vec<Cell>> = self
            .rows
            .iter()
            .filter(|row| row.iter().any(Option::is_some))
            .collect();

        let Some((start, end)) = shared_span(&kept, |cell| cell.is_some()) else {
            return Grid::default();
        };

        Grid {
            rows: kept.iter().map(|row| row[start..=end].to_vec()).collect(),
        }
    }
}

/// Minimum first match and maximum last match over `rows`, or `None` when nothing matches.
pub(crate) fn shared_span<F>(rows: &[&Vec<Cell>], matches: F) -> Option<(usize, usize)>
where
    F: Fn(&Cell) -> bool,
{
    rows.iter()
        .filter_map(|row| {
            let first = row.iter().position(&matches)?;
            let last = row.iter().rposition(&matches)?;
            Some((first, last))
        })
        .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2)))
}
