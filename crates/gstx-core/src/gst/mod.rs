//! GST return extraction: rules, table reconstruction, per-document
//! aggregation and batch combination.

pub mod combine;
pub mod document;
pub mod filter;
pub mod grid;
pub mod rules;
pub mod tables;

pub use combine::{combine_gstr3b, Gstr3bBatch};
pub use document::{Gstr3bDocument, ReturnParser};
pub use filter::{Gstr1Filter, Selection};
pub use tables::TableExtractor;
