//! Row/column frame names such as `12C` or `AB_007`.

use crate::core::grid::{Cell, Grid};
use crate::core::scheme::{classify, NamingConvention};
use crate::utils::error::{FrameGridError, Result};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Orders row labels by length first, then letter by letter (case-insensitive).
pub fn compare_row_labels(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.bytes()
            .map(|c| c.to_ascii_uppercase())
            .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
    })
}

/// Every row label from `min` to `max` inclusive: `Y, Z, AA, AB, ...`.
///
/// Labels take the letter case of `min`. An empty or inverted range yields nothing.
pub fn row_labels(min: &str, max: &str) -> Vec<String> {
    if min.is_empty() || compare_row_labels(min, max) == Ordering::Greater {
        return Vec::new();
    }

    let lowercase = min.bytes().all(|c| c.is_ascii_lowercase());
    let render = |letters: &[u8]| -> String {
        letters
            .iter()
            .map(|&c| {
                let c = char::from(c);
                if lowercase {
                    c.to_ascii_lowercase()
                } else {
                    c
                }
            })
            .collect()
    };

    let max_upper = max.to_ascii_uppercase();
    let mut current: Vec<u8> = min.to_ascii_uppercase().into_bytes();
    let mut labels = Vec::new();

    loop {
        labels.push(render(&current));
        if compare_row_labels(&render(&current), &max_upper) != Ordering::Less {
            break;
        }
        increment_label(&mut current);
        if current.len() > max_upper.len() {
            break;
        }
    }
    labels
}

fn increment_label(letters: &mut Vec<u8>) {
    for c in letters.iter_mut().rev() {
        if *c < b'Z' {
            *c += 1;
            return;
        }
        *c = b'A';
    }
    // 全部進位，例如 ZZ -> AAA
    letters.insert(0, b'A');
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelCase {
    Upper,
    Lower,
}

impl LabelCase {
    fn of(label: &str) -> Option<Self> {
        if label.bytes().all(|c| c.is_ascii_uppercase()) {
            Some(Self::Upper)
        } else if label.bytes().all(|c| c.is_ascii_lowercase()) {
            Some(Self::Lower)
        } else {
            None
        }
    }
}

impl fmt::Display for LabelCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upper => "uppercase",
            Self::Lower => "lowercase",
        })
    }
}

/// Row and column extent of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBounds {
    pub row_min: String,
    pub row_max: String,
    pub col_min: u64,
    pub col_max: u64,
    /// Digit count of the widest column token, used for zero padding.
    pub col_width: usize,
}

/// Builder for `ColNumberRowLetter` and `LetterUnderscoreNumber` batches.
#[derive(Debug, Clone, Copy)]
pub struct AlphaNumericGridBuilder {
    convention: NamingConvention,
}

impl AlphaNumericGridBuilder {
    pub fn new(convention: NamingConvention) -> Result<Self> {
        match convention {
            NamingConvention::ColNumberRowLetter | NamingConvention::LetterUnderscoreNumber => {
                Ok(Self { convention })
            }
            other => Err(FrameGridError::UnsupportedConvention {
                convention: other.to_string(),
            }),
        }
    }

    /// Row labels of one batch must share one letter case; `1a` and `1A` are not the
    /// same frame.
    pub fn bounds<S: AsRef<str>>(&self, files: &[S]) -> Result<GridBounds> {
        let mut bounds: Option<GridBounds> = None;
        let mut batch_case: Option<LabelCase> = None;

        for name in files.iter().map(|f| f.as_ref()) {
            let found = classify(name);
            if found.convention() != self.convention {
                return Err(FrameGridError::MixedConventions {
                    expected: self.convention.to_string(),
                    identifier: name.to_string(),
                });
            }
            let Some((row, col_token)) = found.row_col() else {
                continue;
            };
            let case = LabelCase::of(row).ok_or_else(|| FrameGridError::MalformedIdentifier {
                identifier: name.to_string(),
                reason: format!("row label '{}' mixes upper and lower case", row),
            })?;
            let expected = *batch_case.get_or_insert(case);
            if case != expected {
                return Err(FrameGridError::MixedConventions {
                    expected: format!("{} ({} rows)", self.convention, expected),
                    identifier: name.to_string(),
                });
            }

            let col: u64 = col_token
                .parse()
                .map_err(|_| FrameGridError::MalformedIdentifier {
                    identifier: name.to_string(),
                    reason: format!("column number '{}' is out of range", col_token),
                })?;

            match bounds.as_mut() {
                None => {
                    bounds = Some(GridBounds {
                        row_min: row.to_string(),
                        row_max: row.to_string(),
                        col_min: col,
                        col_max: col,
                        col_width: col_token.len(),
                    })
                }
                Some(b) => {
                    if compare_row_labels(row, &b.row_min) == Ordering::Less {
                        b.row_min = row.to_string();
                    }
                    if compare_row_labels(row, &b.row_max) == Ordering::Greater {
                        b.row_max = row.to_string();
                    }
                    b.col_min = b.col_min.min(col);
                    b.col_max = b.col_max.max(col);
                    b.col_width = b.col_width.max(col_token.len());
                }
            }
        }

        bounds.ok_or(FrameGridError::EmptyBatch)
    }

    fn label(&self, row: &str, col: u64, width: usize) -> String {
        match self.convention {
            NamingConvention::LetterUnderscoreNumber => format!("{}_{:0width$}", row, col, width = width),
            _ => format!("{}{}", col, row),
        }
    }

    /// Untrimmed grid spanning every row label and column number between the batch
    /// extremes, with frames missing from `files` blanked out.
    pub fn presence_grid<S: AsRef<str>>(&self, files: &[S]) -> Result<Grid> {
        let bounds = self.bounds(files)?;
        tracing::debug!(
            "Row labels {}..={}, columns {}..={}",
            bounds.row_min,
            bounds.row_max,
            bounds.col_min,
            bounds.col_max
        );

        let rows: Vec<Vec<Cell>> = row_labels(&bounds.row_min, &bounds.row_max)
            .iter()
            .map(|row| {
                (bounds.col_min..=bounds.col_max)
                    .map(|col| Some(self.label(row, col, bounds.col_width)))
                    .collect()
            })
            .collect();

        let present: HashSet<&str> = files.iter().map(|f| f.as_ref()).collect();
        Ok(Grid::from_rows(rows).mark_presence(&present))
    }

    pub fn build<S: AsRef<str>>(&self, files: &[S]) -> Result<Grid> {
        Ok(self.presence_grid(files)?.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_labels_single_letters() {
        assert_eq!(row_labels("A", "C"), vec!["A", "B", "C"]);
        assert_eq!(row_labels("B", "B"), vec!["B"]);
    }

    #[test]
    fn test_row_labels_carry_into_new_letter() {
        assert_eq!(row_labels("Y", "AB"), vec!["Y", "Z", "AA", "AB"]);
        assert_eq!(row_labels("AZ", "BB"), vec!["AZ", "BA", "BB"]);
        assert_eq!(row_labels("ZZ", "AAA"), vec!["ZZ", "AAA"]);
    }

    #[test]
    fn test_row_labels_keep_lowercase() {
        assert_eq!(row_labels("y", "ab"), vec!["y", "z", "aa", "ab"]);
    }

    #[test]
    fn test_row_labels_inverted_range_is_empty() {
        assert!(row_labels("AB", "Z").is_empty());
        assert!(row_labels("", "Z").is_empty());
    }

    #[test]
    fn test_compare_row_labels_is_length_aware() {
        // a plain string comparison would put "AA" before "B"
        assert_eq!(compare_row_labels("B", "AA"), Ordering::Less);
        assert_eq!(compare_row_labels("ab", "AB"), Ordering::Equal);
        assert_eq!(compare_row_labels("Z", "Y"), Ordering::Greater);
    }

    #[test]
    fn test_bounds_use_numeric_columns() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::LetterUnderscoreNumber).unwrap();
        let bounds = builder.bounds(&["B_9", "AA_10", "C_02"]).unwrap();
        assert_eq!(bounds.row_min, "B");
        assert_eq!(bounds.row_max, "AA");
        assert_eq!(bounds.col_min, 2);
        assert_eq!(bounds.col_max, 10);
        assert_eq!(bounds.col_width, 2);
    }

    #[test]
    fn test_number_first_grid() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::ColNumberRowLetter).unwrap();
        let grid = builder.build(&["1A", "3A", "2C"]).unwrap();

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.get(0, 0), Some("1A"));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(0, 2), Some("3A"));
        assert_eq!(grid.get(1, 1), Some("2C"));
    }

    #[test]
    fn test_presence_grid_keeps_empty_rows() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::ColNumberRowLetter).unwrap();
        let grid = builder.presence_grid(&["1A", "2C"]).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert!(grid.rows()[1].iter().all(Option::is_none));
    }

    #[test]
    fn test_underscore_grid_pads_columns() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::LetterUnderscoreNumber).unwrap();
        let grid = builder.build(&["a_08", "a_10", "b_09"]).unwrap();

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.get(0, 0), Some("a_08"));
        assert_eq!(grid.get(0, 2), Some("a_10"));
        assert_eq!(grid.get(1, 1), Some("b_09"));
    }

    #[test]
    fn test_mixed_batch_is_rejected() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::ColNumberRowLetter).unwrap();
        let err = builder.build(&["1A", "A_1"]).unwrap_err();
        assert!(matches!(err, FrameGridError::MixedConventions { .. }));
    }

    #[test]
    fn test_mixed_case_rows_are_rejected() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::ColNumberRowLetter).unwrap();

        let err = builder.build(&["1a", "1B"]).unwrap_err();
        assert!(matches!(err, FrameGridError::MixedConventions { ref identifier, .. } if identifier == "1B"));

        let err = builder.build(&["1A", "1a"]).unwrap_err();
        assert!(matches!(err, FrameGridError::MixedConventions { .. }));

        let err = builder.build(&["1Ab"]).unwrap_err();
        assert!(matches!(err, FrameGridError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_lowercase_batch_keeps_every_frame() {
        let builder = AlphaNumericGridBuilder::new(NamingConvention::ColNumberRowLetter).unwrap();
        let grid = builder.build(&["1a", "1b", "2z"]).unwrap();
        assert_eq!(grid.present_count(), 3);
        assert_eq!(grid.get(0, 0), Some("1a"));
    }

    #[test]
    fn test_letters_first_has_no_builder() {
        assert!(AlphaNumericGridBuilder::new(NamingConvention::RowLetterColNumber).is_err());
    }
}
