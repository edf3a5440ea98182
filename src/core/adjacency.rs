//! Frames that touch an already acquired set.

use crate::core::grid::{shared_span, Cell, Grid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedCell {
    pub label: Option<String>,
    pub is_taken: bool,
    pub is_selectable: bool,
    /// Position in the untrimmed grid, `r{row}c{col}`.
    pub id: String,
}

/// Present, untaken frames with at least one taken orthogonal neighbour, in row-major order.
///
/// `grid` must be the untrimmed presence grid: trimming removes empty rows and would make
/// frames on either side of them look adjacent.
pub fn adjacent_frames(grid: &Grid, taken: &HashSet<&str>) -> Vec<String> {
    let is_taken = |row: Option<usize>, col: Option<usize>| match (row, col) {
        (Some(r), Some(c)) => grid.get(r, c).is_some_and(|label| taken.contains(label)),
        _ => false,
    };

    let mut adjacent = Vec::new();
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let Some(label) = cell else { continue };
            if taken.contains(label.as_str()) {
                continue;
            }
            // 上下左右，不含斜角
            let touches = is_taken(r.checked_sub(1), Some(c))
                || is_taken(Some(r + 1), Some(c))
                || is_taken(Some(r), c.checked_sub(1))
                || is_taken(Some(r), Some(c + 1));
            if touches {
                adjacent.push(label.clone());
            }
        }
    }
    adjacent
}

/// Display grid limited to the rows and shared column range holding taken or adjacent frames.
pub fn display_grid(
    grid: &Grid,
    taken: &HashSet<&str>,
    adjacent: &[String],
) -> Vec<Vec<AnnotatedCell>> {
    let selectable: HashSet<&str> = adjacent.iter().map(String::as_str).collect();
    let relevant = |cell: &Cell| {
        cell.as_deref()
            .is_some_and(|label| taken.contains(label) || selectable.contains(label))
    };

    // 保留原始列號，id 才能對應未裁切的網格
    let kept: Vec<(usize, &Vec<Cell>)> = grid
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(relevant))
        .collect();

    let rows: Vec<&Vec<Cell>> = kept.iter().map(|(_, row)| *row).collect();
    let Some((start, end)) = shared_span(&rows, relevant) else {
        return Vec::new();
    };

    kept.iter()
        .map(|(r, row)| {
            (start..=end)
                .map(|c| {
                    let label = row[c].clone();
                    let name = label.as_deref().unwrap_or_default();
                    AnnotatedCell {
                        is_taken: label.is_some() && taken.contains(name),
                        is_selectable: label.is_some() && selectable.contains(name),
                        label,
                        id: format!("r{}c{}", r, c),
                    }
                })
                .collect()
        })
        .collect()
}
