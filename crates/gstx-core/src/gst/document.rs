//! Per-document extraction for both return forms.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::rules::{extract_general_details, extract_gstr1_details, extract_total_liability};
use super::rules::numeric::NumericNormalizer;
use super::tables::TableExtractor;
use crate::error::Result;
use crate::models::config::GstxConfig;
use crate::models::report::{
    DocumentDetails, Gstr1Row, ItcRow, PaymentRow, SupplyRow, Table,
};
use crate::pdf::{PdfContent, PdfExtractor, PdfProcessor};

/// Everything extracted from one GSTR-3B return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gstr3bDocument {
    pub file_name: String,
    pub details: DocumentDetails,
    pub outward_supplies: Table<SupplyRow>,
    pub eligible_itc: Table<ItcRow>,
    pub tax_payment: Table<PaymentRow>,
    /// Data-quality notes; never fatal.
    pub warnings: Vec<String>,
}

/// Turns return PDFs into details and tables.
#[derive(Debug, Clone)]
pub struct ReturnParser {
    tables: TableExtractor,
    /// Pages scanned per document (0 = all).
    max_pages: usize,
    /// Below this many text characters a document is flagged as textless.
    min_text_length: usize,
}

impl ReturnParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&GstxConfig::default())
    }

    pub fn from_config(config: &GstxConfig) -> Self {
        Self {
            tables: TableExtractor::new(NumericNormalizer::from_config(&config.extraction)),
            max_pages: config.pdf.max_pages,
            min_text_length: config.pdf.min_text_length,
        }
    }

    /// Limit the number of pages scanned per document.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Load PDF bytes and extract their page texts.
    pub fn load(&self, bytes: &[u8]) -> Result<PdfContent> {
        let mut extractor = PdfExtractor::new();
        extractor.load(bytes)?;
        let content = extractor.extract_all()?;
        Ok(self.limit_pages(content))
    }

    fn limit_pages(&self, content: PdfContent) -> PdfContent {
        if self.max_pages == 0 || content.pages.len() <= self.max_pages {
            return content;
        }
        debug!("Scanning first {} of {} pages", self.max_pages, content.pages.len());
        PdfContent::from_pages(
            content
                .pages
                .into_iter()
                .take(self.max_pages)
                .map(|page| page.text),
        )
    }

    fn text_warning(&self, file_name: &str, content: &PdfContent) -> Option<String> {
        let chars = content.text.chars().filter(|c| !c.is_whitespace()).count();
        if chars >= self.min_text_length {
            return None;
        }
        warn!("{}: only {} text characters, is it scanned?", file_name, chars);
        Some(format!(
            "Document has {} text characters; fields and tables may be missing",
            chars
        ))
    }

    /// Extract a GSTR-3B from already-loaded content.
    pub fn parse_gstr3b(&self, file_name: &str, content: &PdfContent) -> Gstr3bDocument {
        let start = Instant::now();
        let mut warnings: Vec<String> = self.text_warning(file_name, content).into_iter().collect();

        let details = extract_general_details(&content.text);
        if details.gstin.is_none() {
            warnings.push("GSTIN not found".to_string());
        }

        let pages = &content.pages;
        let mut notes = Vec::new();
        let outward_supplies = Table::new(file_name, self.tables.outward_supplies(pages, &mut notes));
        if outward_supplies.is_empty() {
            warnings.push("Table 3.1 not found".to_string());
        }
        let eligible_itc = Table::new(file_name, self.tables.eligible_itc(pages, &mut notes));
        if eligible_itc.rows.iter().all(|row| !row.found) {
            warnings.push("Table 4 not found".to_string());
        }
        let tax_payment = Table::new(file_name, self.tables.tax_payment(pages, &mut notes));
        if tax_payment.is_empty() {
            warnings.push("Table 6.1 not found".to_string());
        }
        for note in &notes {
            debug!("{}: {}", file_name, note);
        }
        warnings.extend(notes);

        info!(
            "{}: GSTR-3B extracted in {}ms ({} warnings)",
            file_name,
            start.elapsed().as_millis(),
            warnings.len()
        );

        Gstr3bDocument {
            file_name: file_name.to_string(),
            details,
            outward_supplies,
            eligible_itc,
            tax_payment,
            warnings,
        }
    }

    /// Extract a GSTR-1 summary row from already-loaded content.
    pub fn parse_gstr1(&self, file_name: &str, content: &PdfContent) -> Gstr1Row {
        let mut warnings: Vec<String> = self.text_warning(file_name, content).into_iter().collect();

        let details = content
            .first_text_page()
            .map(extract_gstr1_details)
            .unwrap_or_default();
        if details.gstin.is_none() {
            warnings.push("GSTIN not found".to_string());
        }
        let liability = extract_total_liability(&content.text);
        if !liability.found {
            warn!("{}: Total Liability line not found", file_name);
            warnings.push("Total Liability line not found".to_string());
        }

        Gstr1Row {
            file_name: file_name.to_string(),
            details,
            liability,
            warnings,
        }
    }

    /// Load and extract a GSTR-3B PDF.
    pub fn process_gstr3b(&self, file_name: &str, bytes: &[u8]) -> Result<Gstr3bDocument> {
        let content = self.load(bytes)?;
        Ok(self.parse_gstr3b(file_name, &content))
    }

    /// Load and extract a GSTR-1 PDF.
    pub fn process_gstr1(&self, file_name: &str, bytes: &[u8]) -> Result<Gstr1Row> {
        let content = self.load(bytes)?;
        Ok(self.parse_gstr1(file_name, &content))
    }
}

impl Default for ReturnParser {
    fn default() -> Self {
        Self::new()
    }
}
