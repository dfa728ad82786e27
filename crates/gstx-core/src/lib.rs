//! Core library for GST return PDF extraction.
//!
//! This crate provides:
//! - PDF loading and per-page text extraction
//! - Header field location for GSTR-1 and GSTR-3B returns
//! - Reconstruction of GSTR-3B Tables 3.1, 4 and 6.1 from page text
//! - Batch combination into one document-grouped report
//! - Multi-sheet spreadsheet export

pub mod error;
pub mod export;
pub mod gst;
pub mod models;
pub mod pdf;

pub use error::{ExportError, GstxError, PdfError, Result};
pub use export::{write_gstr1_workbook, write_gstr3b_workbook};
pub use gst::rules::{clean_numeric_value, resolve_state, state_for_gstin, NumericNormalizer};
pub use gst::{combine_gstr3b, Gstr1Filter, Gstr3bBatch, Gstr3bDocument, ReturnParser, Selection};
pub use models::config::GstxConfig;
pub use models::report::{
    CombinedRow, DataType, DocumentDetails, Gstr1Row, ItcRow, ItcRowKind, PaymentRow, SupplyRow,
    Table, TableRow, TotalLiability,
};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
