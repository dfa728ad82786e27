//! Amount normalization for table cells.
//!
//! Cells come out of the text layer with thousands separators, stray
//! renderer letters (`1,234.50E`) or nothing at all. Normalization never
//! fails: anything that does not parse becomes `0.0`.

use serde::{Deserialize, Serialize};

use crate::models::config::ExtractionConfig;

/// Letters the GST portal's table renderer appends to some amounts.
pub const DEFAULT_STRAY_MARKERS: [char; 2] = ['E', 'F'];

/// A raw cell value as handed over by a table extractor or a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCell<'a> {
    /// No cell (short row) or an explicitly absent value.
    Missing,
    /// Cell text.
    Text(&'a str),
    /// Already numeric.
    Number(f64),
}

impl<'a> From<&'a str> for RawCell<'a> {
    fn from(text: &'a str) -> Self {
        RawCell::Text(text)
    }
}

impl<'a> From<&'a String> for RawCell<'a> {
    fn from(text: &'a String) -> Self {
        RawCell::Text(text.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawCell<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(RawCell::Missing, RawCell::Text)
    }
}

impl From<f64> for RawCell<'_> {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

/// Outcome of normalizing one cell.
///
/// `value` is what every table receives. `parsed` and `marker` let a caller
/// tell a genuine zero from an unreadable cell, and see which renderer
/// letter (if any) was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericCell {
    pub value: f64,
    pub parsed: bool,
    pub marker: Option<char>,
}

impl NumericCell {
    fn unparsed(marker: Option<char>) -> Self {
        Self {
            value: 0.0,
            parsed: false,
            marker,
        }
    }
}

/// Cell normalizer with a configurable set of stray markers.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericNormalizer {
    markers: Vec<char>,
}

impl NumericNormalizer {
    /// Create a normalizer stripping the default markers.
    pub fn new() -> Self {
        Self {
            markers: DEFAULT_STRAY_MARKERS.to_vec(),
        }
    }

    /// Replace the set of stripped markers.
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = char>) -> Self {
        self.markers = markers.into_iter().collect();
        self
    }

    /// Build a normalizer from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_markers(config.stray_markers.iter().copied())
    }

    /// Normalize a cell to a finite number, `0.0` on any failure.
    pub fn normalize<'a>(&self, cell: impl Into<RawCell<'a>>) -> f64 {
        self.classify(cell).value
    }

    /// Normalize a cell and report how it went.
    pub fn classify<'a>(&self, cell: impl Into<RawCell<'a>>) -> NumericCell {
        match cell.into() {
            RawCell::Missing => NumericCell::unparsed(None),
            RawCell::Number(value) if value.is_finite() => NumericCell {
                value,
                parsed: true,
                marker: None,
            },
            RawCell::Number(_) => NumericCell::unparsed(None),
            RawCell::Text(text) => self.classify_text(text),
        }
    }

    fn classify_text(&self, text: &str) -> NumericCell {
        let marker = text.chars().find(|c| self.markers.contains(c));

        let cleaned: String = text
            .chars()
            .filter(|c| !self.markers.contains(c))
            .collect::<String>()
            .trim()
            .replace(',', "");

        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => NumericCell {
                value,
                parsed: true,
                marker,
            },
            _ => NumericCell::unparsed(marker),
        }
    }
}

impl Default for NumericNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a cell with the default markers.
pub fn clean_numeric_value<'a>(cell: impl Into<RawCell<'a>>) -> f64 {
    NumericNormalizer::new().normalize(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_numeric_value() {
        assert_eq!(clean_numeric_value(None::<&str>), 0.0);
        assert_eq!(clean_numeric_value(""), 0.0);
        assert_eq!(clean_numeric_value("1,234.50"), 1234.50);
        assert_eq!(clean_numeric_value("1234.50E"), 1234.50);
        assert_eq!(clean_numeric_value("abc"), 0.0);
        assert_eq!(clean_numeric_value(42.0), 42.0);
    }

    #[test]
    fn test_indian_grouping_and_negatives() {
        assert_eq!(clean_numeric_value("12,34,567.89"), 1234567.89);
        assert_eq!(clean_numeric_value(" -1,000.00 "), -1000.0);
        assert_eq!(clean_numeric_value("-"), 0.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(clean_numeric_value("inf"), 0.0);
        assert_eq!(clean_numeric_value("NaN"), 0.0);
        assert_eq!(clean_numeric_value(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_classify_distinguishes_zero_from_garbage() {
        let normalizer = NumericNormalizer::new();

        let zero = normalizer.classify("0.00");
        assert_eq!(zero.value, 0.0);
        assert!(zero.parsed);

        let garbage = normalizer.classify("n/a");
        assert_eq!(garbage.value, 0.0);
        assert!(!garbage.parsed);

        assert!(!normalizer.classify(RawCell::Missing).parsed);
    }

    #[test]
    fn test_classify_reports_marker() {
        let cell = NumericNormalizer::new().classify("500.00F");
        assert_eq!(cell.value, 500.0);
        assert_eq!(cell.marker, Some('F'));
        assert_eq!(NumericNormalizer::new().classify("500.00").marker, None);
    }

    #[test]
    fn test_custom_markers() {
        let normalizer = NumericNormalizer::new().with_markers(['E']);
        assert_eq!(normalizer.normalize("10.00E"), 10.0);
        assert_eq!(normalizer.normalize("10.00F"), 0.0);
    }
}
