//! Rule-based extractors for GST return text.

pub mod fields;
pub mod liability;
pub mod numeric;
pub mod patterns;
pub mod states;

pub use fields::{extract_general_details, extract_gstr1_details, FieldLocator, LabeledField};
pub use liability::extract_total_liability;
pub use numeric::{clean_numeric_value, NumericCell, NumericNormalizer, RawCell};
pub use states::{resolve_state, state_for_gstin};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A located value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
