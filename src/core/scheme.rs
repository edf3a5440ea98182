//! Frame naming conventions and their detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static LETTER_UNDERSCORE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)_([0-9]+)$").expect("valid regex"));
static COL_NUMBER_ROW_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)([A-Za-z]+)$").expect("valid regex"));
static ROW_LETTER_COL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("valid regex"));
static HIERARCHICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Z])-([0-9]{1,3})-([0-9]{1,3})-([A-Z])-([a-z])-([0-9])-([0-9])-([0-9])-([0-9])$",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `N-34-124-C-c-1-3-1-1`
    Hierarchical,
    /// `a1`, `AB12`
    RowLetterColNumber,
    /// `1a`, `12AB`
    ColNumberRowLetter,
    /// `a_1`, `AB_012`
    LetterUnderscoreNumber,
    Unknown,
}

impl NamingConvention {
    /// Whether a grid builder exists for this convention.
    pub fn has_layout(self) -> bool {
        matches!(
            self,
            Self::Hierarchical | Self::ColNumberRowLetter | Self::LetterUnderscoreNumber
        )
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hierarchical => "hierarchical",
            Self::RowLetterColNumber => "row-letter/column-number",
            Self::ColNumberRowLetter => "column-number/row-letter",
            Self::LetterUnderscoreNumber => "letter_number",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Top-level map sheet of a hierarchical frame name, e.g. `N-34-124`.
///
/// Zone and index keep the digit count they were written with, so `N-34-007` prints back
/// as `N-34-007` and its leaves match the names on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopSheet {
    pub series: char,
    pub zone: u16,
    pub index: u16,
    pub zone_digits: u8,
    pub index_digits: u8,
}

impl TopSheet {
    /// Sheet written without zero padding.
    pub fn new(series: char, zone: u16, index: u16) -> Self {
        Self {
            series,
            zone,
            index,
            zone_digits: digit_count(zone),
            index_digits: digit_count(index),
        }
    }

    /// Parses the `L-NN-NNN` prefix of a frame name; the rest of the name is ignored.
    pub fn parse_prefix(name: &str) -> Option<Self> {
        let mut parts = name.splitn(4, '-');
        let series_part = parts.next()?;
        let mut series_chars = series_part.chars();
        let series = series_chars.next().filter(char::is_ascii_uppercase)?;
        if series_chars.next().is_some() {
            return None;
        }
        let (zone, zone_digits) = parse_short_number(parts.next()?)?;
        let (index, index_digits) = parse_short_number(parts.next()?)?;
        Some(Self {
            series,
            zone,
            index,
            zone_digits,
            index_digits,
        })
    }

    /// Whether two sheets belong to the same regional mosaic. Padding is ignored.
    pub fn same_region(&self, other: &TopSheet) -> bool {
        self.series == other.series && self.zone == other.zone
    }
}

fn digit_count(value: u16) -> u8 {
    // u16 最多五位數
    value.to_string().len() as u8
}

fn parse_short_number(token: &str) -> Option<(u16, u8)> {
    if token.is_empty() || token.len() > 3 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((token.parse().ok()?, token.len() as u8))
}

impl fmt::Display for TopSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:0zw$}-{:0iw$}",
            self.series,
            self.zone,
            self.index,
            zw = usize::from(self.zone_digits),
            iw = usize::from(self.index_digits)
        )
    }
}

/// Detection result with the tokens the matching grid builder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeMatch {
    Hierarchical { sheet: TopSheet },
    RowLetterColNumber { row: String, col: String },
    ColNumberRowLetter { col: String, row: String },
    LetterUnderscoreNumber { row: String, col: String },
    Unknown,
}

impl SchemeMatch {
    pub fn convention(&self) -> NamingConvention {
        match self {
            Self::Hierarchical { .. } => NamingConvention::Hierarchical,
            Self::RowLetterColNumber { .. } => NamingConvention::RowLetterColNumber,
            Self::ColNumberRowLetter { .. } => NamingConvention::ColNumberRowLetter,
            Self::LetterUnderscoreNumber { .. } => NamingConvention::LetterUnderscoreNumber,
            Self::Unknown => NamingConvention::Unknown,
        }
    }

    /// Row label and column token, for the row/column conventions.
    pub fn row_col(&self) -> Option<(&str, &str)> {
        match self {
            Self::RowLetterColNumber { row, col }
            | Self::ColNumberRowLetter { col, row }
            | Self::LetterUnderscoreNumber { row, col } => Some((row.as_str(), col.as_str())),
            _ => None,
        }
    }
}

/// Classifies one frame name. Shapes are tried in a fixed order and the first match wins.
pub fn classify(name: &str) -> SchemeMatch {
    if let Some(caps) = LETTER_UNDERSCORE_NUMBER.captures(name) {
        return SchemeMatch::LetterUnderscoreNumber {
            row: caps[1].to_string(),
            col: caps[2].to_string(),
        };
    }

    if let Some(caps) = COL_NUMBER_ROW_LETTER.captures(name) {
        return SchemeMatch::ColNumberRowLetter {
            col: caps[1].to_string(),
            row: caps[2].to_string(),
        };
    }

    if let Some(caps) = ROW_LETTER_COL_NUMBER.captures(name) {
        return SchemeMatch::RowLetterColNumber {
            row: caps[1].to_string(),
            col: caps[2].to_string(),
        };
    }

    if HIERARCHICAL.is_match(name) {
        if let Some(sheet) = TopSheet::parse_prefix(name) {
            return SchemeMatch::Hierarchical { sheet };
        }
    }

    SchemeMatch::Unknown
}
