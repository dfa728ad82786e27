//! Labeled scalar fields of GSTR-1 and GSTR-3B headers.

use chrono::NaiveDate;
use regex::Regex;
use tracing::trace;

use super::patterns::{
    GSTR1_FINANCIAL_YEAR, GSTR1_GSTIN, GSTR1_LEGAL_NAME, GSTR1_TAX_PERIOD, GSTR3B_ARN_DATE,
    GSTR3B_GSTIN, GSTR3B_LEGAL_NAME, GSTR3B_PERIOD, GSTR3B_YEAR,
};
use super::states::state_for_gstin;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::report::DocumentDetails;

/// A field found by a label pattern whose first capture group is the value.
pub struct LabeledField {
    name: &'static str,
    pattern: &'static Regex,
}

impl LabeledField {
    pub fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl FieldExtractor for LabeledField {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let (Some(full_match), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = value.as_str().trim();
            if value.is_empty() {
                continue;
            }
            trace!("{} matched {:?}", self.name, value);
            results.push(
                ExtractionMatch::new(value.to_string(), full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Locates the scalar header fields of one form variant.
pub struct FieldLocator {
    gstin: LabeledField,
    legal_name: LabeledField,
    period: LabeledField,
    financial_year: LabeledField,
    filing_date: Option<LabeledField>,
}

impl FieldLocator {
    /// Header patterns of a GSTR-1 summary.
    pub fn gstr1() -> Self {
        Self {
            gstin: LabeledField::new("GSTIN", &GSTR1_GSTIN),
            legal_name: LabeledField::new("Legal Name", &GSTR1_LEGAL_NAME),
            period: LabeledField::new("Month", &GSTR1_TAX_PERIOD),
            financial_year: LabeledField::new("Financial Year", &GSTR1_FINANCIAL_YEAR),
            filing_date: None,
        }
    }

    /// Header patterns of a GSTR-3B return.
    pub fn gstr3b() -> Self {
        Self {
            gstin: LabeledField::new("GSTIN", &GSTR3B_GSTIN),
            legal_name: LabeledField::new("Legal Name", &GSTR3B_LEGAL_NAME),
            period: LabeledField::new("Period", &GSTR3B_PERIOD),
            financial_year: LabeledField::new("Financial Year", &GSTR3B_YEAR),
            filing_date: Some(LabeledField::new("Date", &GSTR3B_ARN_DATE)),
        }
    }

    /// Locate every field in `text`. Fields that do not match stay `None`.
    pub fn locate(&self, text: &str) -> DocumentDetails {
        let value = |field: &LabeledField| field.extract(text).map(|m| m.value);

        let gstin = value(&self.gstin);
        let filing_date = self.filing_date.as_ref().and_then(value);

        DocumentDetails {
            state: gstin.as_deref().map(|g| state_for_gstin(g).to_string()),
            filing_date_parsed: filing_date.as_deref().and_then(parse_filing_date),
            gstin,
            legal_name: value(&self.legal_name),
            period: value(&self.period),
            financial_year: value(&self.financial_year),
            filing_date,
        }
    }
}

/// Header details of a GSTR-3B, searched over the whole document text.
pub fn extract_general_details(text: &str) -> DocumentDetails {
    FieldLocator::gstr3b().locate(text)
}

/// Header details of a GSTR-1, searched over its first page with text.
pub fn extract_gstr1_details(first_page: &str) -> DocumentDetails {
    FieldLocator::gstr1().locate(first_page)
}

fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}
