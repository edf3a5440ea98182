//! Leaf grid of hierarchically subdivided map sheets.
//!
//! A top sheet such as `N-34-124` is split in halves six times. At every depth the
//! half (top/bottom) picks one row bit and the symbol inside the half picks one column
//! bit, so a sheet holds 64×64 leaves named `N-34-124-C-c-1-3-1-1`.

use crate::core::grid::Grid;
use crate::core::scheme::TopSheet;
use crate::domain::model::MosaicLayout;
use std::collections::HashSet;

pub const SUBDIVISION_DEPTH: usize = 6;

/// Leaves along one side of a top sheet.
pub const SHEET_SIDE: usize = 1 << SUBDIVISION_DEPTH;

/// `SYMBOLS[depth][half][symbol]`
const SYMBOLS: [[[char; 2]; 2]; SUBDIVISION_DEPTH] = [
    [['A', 'B'], ['C', 'D']],
    [['a', 'b'], ['c', 'd']],
    [['1', '2'], ['3', '4']],
    [['1', '2'], ['3', '4']],
    [['1', '2'], ['3', '4']],
    [['1', '2'], ['3', '4']],
];

/// Name of the leaf at `(row, col)` inside `sheet`.
pub fn leaf_label(sheet: &TopSheet, row: usize, col: usize) -> String {
    let mut label = sheet.to_string();
    for (depth, table) in SYMBOLS.iter().enumerate() {
        // 每一層取一個列位元與一個欄位元
        let shift = SUBDIVISION_DEPTH - 1 - depth;
        let half = (row >> shift) & 1;
        let symbol = (col >> shift) & 1;
        label.push('-');
        label.push(table[half][symbol]);
    }
    label
}

/// Sheet and in-sheet `(row, col)` of a leaf name; `None` if the name is not a leaf.
pub fn leaf_position(name: &str) -> Option<(TopSheet, usize, usize)> {
    let sheet = TopSheet::parse_prefix(name)?;
    let symbols: Vec<&str> = name.split('-').skip(3).collect();
    if symbols.len() != SUBDIVISION_DEPTH {
        return None;
    }

    let (mut row, mut col) = (0usize, 0usize);
    for (table, token) in SYMBOLS.iter().zip(symbols) {
        let mut chars = token.chars();
        let symbol = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let (half, within) = (0..2)
            .flat_map(|h| (0..2).map(move |s| (h, s)))
            .find(|&(h, s)| table[h][s] == symbol)?;
        row = (row << 1) | half;
        col = (col << 1) | within;
    }
    Some((sheet, row, col))
}

/// Every leaf of one sheet, rows top to bottom.
pub fn sheet_leaves(sheet: &TopSheet) -> Vec<Vec<String>> {
    (0..SHEET_SIDE)
        .map(|row| (0..SHEET_SIDE).map(|col| leaf_label(sheet, row, col)).collect())
        .collect()
}

impl MosaicLayout {
    /// `(sheet_row, sheet_col)` of a sheet inside its region. Sheet indices start at 1 and
    /// stop at `sheets_per_row²`.
    pub fn coordinates(&self, sheet: &TopSheet) -> Option<(usize, usize)> {
        let width = usize::from(self.sheets_per_row);
        let index = usize::from(sheet.index);
        // 區域外的圖幅沒有位置
        if index == 0 || width == 0 || index > width * width {
            return None;
        }
        Some(((index - 1) / width, (index - 1) % width))
    }
}

#[derive(Debug, Clone, Default)]
pub struct HierarchicalGridBuilder {
    layout: MosaicLayout,
}

impl HierarchicalGridBuilder {
    pub fn new(layout: MosaicLayout) -> Self {
        Self { layout }
    }

    /// Sheets that can share one mosaic with the first sheet of the batch, each with its
    /// mosaic coordinates. Sheets from another region are logged and skipped.
    pub fn place_sheets<S: AsRef<str>>(&self, files: &[S]) -> Vec<(TopSheet, (usize, usize))> {
        let mut seen = HashSet::new();
        let mut placed = Vec::new();
        let mut anchor: Option<TopSheet> = None;

        for sheet in files.iter().filter_map(|f| TopSheet::parse_prefix(f.as_ref())) {
            if !seen.insert(sheet) {
                continue;
            }
            // 以第一張圖幅的區域為準
            let anchor = *anchor.get_or_insert(sheet);
            if !sheet.same_region(&anchor) {
                tracing::warn!(
                    "Sheet {} is outside region {}-{}, its frames are left unplaced",
                    sheet,
                    anchor.series,
                    anchor.zone
                );
                continue;
            }
            match self.layout.coordinates(&sheet) {
                Some(coords) => placed.push((sheet, coords)),
                None => tracing::warn!(
                    "Sheet {} has no position in a {}-wide mosaic, its frames are left unplaced",
                    sheet,
                    self.layout.sheets_per_row
                ),
            }
        }
        placed
    }

    /// Untrimmed grid covering the bounding box of every placed sheet, with frames
    /// missing from `files` blanked out.
    pub fn presence_grid<S: AsRef<str>>(&self, files: &[S]) -> Grid {
        let placed = self.place_sheets(files);
        let Some(bounds) = sheet_bounds(&placed) else {
            return Grid::default();
        };
        let (min_row, min_col, max_row, max_col) = bounds;

        let mut grid = Grid::blank(
            (max_row - min_row + 1) * SHEET_SIDE,
            (max_col - min_col + 1) * SHEET_SIDE,
        );

        for (sheet, (sheet_row, sheet_col)) in &placed {
            let row_offset = (sheet_row - min_row) * SHEET_SIDE;
            let col_offset = (sheet_col - min_col) * SHEET_SIDE;
            tracing::debug!(
                "Placing sheet {} at mosaic cell ({}, {})",
                sheet,
                sheet_row - min_row,
                sheet_col - min_col
            );
            for (row, leaves) in sheet_leaves(sheet).into_iter().enumerate() {
                for (col, label) in leaves.into_iter().enumerate() {
                    grid.set(row_offset + row, col_offset + col, label);
                }
            }
        }

        let present: HashSet<&str> = files.iter().map(|f| f.as_ref()).collect();
        grid.mark_presence(&present)
    }

    pub fn build<S: AsRef<str>>(&self, files: &[S]) -> Grid {
        self.presence_grid(files).trim()
    }
}

fn sheet_bounds(placed: &[(TopSheet, (usize, usize))]) -> Option<(usize, usize, usize, usize)> {
    placed.iter().map(|(_, coords)| *coords).fold(None, |bounds, (r, c)| {
        Some(match bounds {
            None => (r, c, r, c),
            Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(index: u16) -> TopSheet {
        TopSheet::new('N', 34, index)
    }

    fn all_leaves(index: u16) -> Vec<String> {
        sheet_leaves(&sheet(index)).into_iter().flatten().collect()
    }

    #[test]
    fn test_leaf_label_corners() {
        let s = sheet(124);
        assert_eq!(leaf_label(&s, 0, 0), "N-34-124-A-a-1-1-1-1");
        assert_eq!(leaf_label(&s, 0, 63), "N-34-124-B-b-2-2-2-2");
        assert_eq!(leaf_label(&s, 63, 0), "N-34-124-C-c-3-3-3-3");
        assert_eq!(leaf_label(&s, 63, 63), "N-34-124-D-d-4-4-4-4");
    }

    #[test]
    fn test_every_leaf_roundtrips_through_its_position() {
        let s = sheet(124);
        let mut seen = HashSet::new();
        for (row, leaves) in sheet_leaves(&s).iter().enumerate() {
            for (col, label) in leaves.iter().enumerate() {
                assert_eq!(leaf_position(label), Some((s, row, col)));
                assert!(seen.insert(label.clone()), "duplicate leaf {label}");
            }
        }
        assert_eq!(seen.len(), SHEET_SIDE * SHEET_SIDE);
    }

    #[test]
    fn test_padded_sheet_prefix_roundtrips() {
        let name = "N-34-007-B-c-2-3-4-1";
        let (s, row, col) = leaf_position(name).unwrap();
        assert_eq!(s.index, 7);
        assert_eq!(leaf_label(&s, row, col), name);
    }

    #[test]
    fn test_padded_sheet_frames_stay_present() {
        let files = vec!["N-34-007-A-a-1-1-1-1", "N-34-007-A-a-1-1-1-2"];
        let grid = HierarchicalGridBuilder::default().build(&files);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(grid.get(0, 1), Some("N-34-007-A-a-1-1-1-2"));
    }

    #[test]
    fn test_leaf_position_rejects_bad_symbols() {
        assert_eq!(leaf_position("N-34-124-E-a-1-1-1-1"), None);
        assert_eq!(leaf_position("N-34-124-A-a-1-1-1"), None);
        assert_eq!(leaf_position("N-34-124-A-a-1-1-1-5"), None);
    }

    #[test]
    fn test_layout_coordinates() {
        let layout = MosaicLayout::default();
        assert_eq!(layout.coordinates(&sheet(1)), Some((0, 0)));
        assert_eq!(layout.coordinates(&sheet(124)), Some((10, 3)));
        assert_eq!(layout.coordinates(&sheet(144)), Some((11, 11)));
        assert_eq!(layout.coordinates(&sheet(0)), None);
        assert_eq!(layout.coordinates(&sheet(145)), None);
    }

    #[test]
    fn test_sheet_beyond_mosaic_is_left_unplaced() {
        let files = vec!["N-34-1-A-a-1-1-1-1", "N-34-999-A-a-1-1-1-1"];
        let grid = HierarchicalGridBuilder::default().presence_grid(&files);
        assert_eq!(grid.row_count(), SHEET_SIDE);
        assert_eq!(grid.col_count(), SHEET_SIDE);
        assert_eq!(grid.present_count(), 1);
    }

    #[test]
    fn test_eastern_neighbour_extends_columns() {
        let mut files = all_leaves(124);
        files.extend(all_leaves(125));

        let grid = HierarchicalGridBuilder::default().presence_grid(&files);
        assert_eq!(grid.row_count(), SHEET_SIDE);
        assert_eq!(grid.col_count(), 2 * SHEET_SIDE);
        assert_eq!(grid.get(0, 64), Some("N-34-125-A-a-1-1-1-1"));
    }

    #[test]
    fn test_southern_neighbour_extends_rows() {
        let mut files = all_leaves(124);
        files.extend(all_leaves(136));

        let grid = HierarchicalGridBuilder::default().presence_grid(&files);
        assert_eq!(grid.row_count(), 2 * SHEET_SIDE);
        assert_eq!(grid.col_count(), SHEET_SIDE);
        assert_eq!(grid.get(64, 0), Some("N-34-136-A-a-1-1-1-1"));
    }

    #[test]
    fn test_missing_southern_sheet_leaves_blank_block() {
        let mut files = all_leaves(124);
        files.extend(all_leaves(137));

        let grid = HierarchicalGridBuilder::default().presence_grid(&files);
        assert_eq!(grid.row_count(), 128);
        assert_eq!(grid.col_count(), 128);

        for row in 64..128 {
            for col in 0..64 {
                assert_eq!(grid.get(row, col), None);
            }
            for col in 64..128 {
                assert!(grid.get(row, col).is_some());
            }
        }
        assert_eq!(grid.get(64, 64), Some("N-34-137-A-a-1-1-1-1"));
        assert_eq!(grid.get(0, 64), None);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec!["N-34-124-D-d-4-4-4-4", "N-34-137-A-a-1-1-1-1"];
        let backward = vec!["N-34-137-A-a-1-1-1-1", "N-34-124-D-d-4-4-4-4"];

        let builder = HierarchicalGridBuilder::default();
        assert_eq!(builder.presence_grid(&forward), builder.presence_grid(&backward));

        let trimmed = builder.build(&forward);
        assert_eq!(trimmed.row_count(), 2);
        assert_eq!(trimmed.col_count(), 2);
        assert_eq!(trimmed.get(0, 0), Some("N-34-124-D-d-4-4-4-4"));
        assert_eq!(trimmed.get(1, 1), Some("N-34-137-A-a-1-1-1-1"));
    }

    #[test]
    fn test_foreign_region_is_left_unplaced() {
        let files = vec!["N-34-124-A-a-1-1-1-1", "M-34-124-A-a-1-1-1-1"];
        let grid = HierarchicalGridBuilder::default().presence_grid(&files);
        assert_eq!(grid.row_count(), SHEET_SIDE);
        assert_eq!(grid.present_count(), 1);
    }

    #[test]
    fn test_custom_mosaic_width() {
        let files = vec!["N-34-1-A-a-1-1-1-1", "N-34-5-A-a-1-1-1-1"];
        let grid = HierarchicalGridBuilder::new(MosaicLayout::new(4)).presence_grid(&files);
        // with 4 sheets per row, sheet 5 sits directly south of sheet 1
        assert_eq!(grid.row_count(), 128);
        assert_eq!(grid.col_count(), 64);
    }
}
