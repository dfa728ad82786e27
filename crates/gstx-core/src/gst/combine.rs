//! Batch combination of GSTR-3B extracts into one document-grouped report.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::document::Gstr3bDocument;
use crate::models::report::{
    BatchTables, CombinedRow, DataType, DocumentDetails, ReportAmounts, Table, TaggedRow,
    TableRow, UNKNOWN,
};

/// Description of the row that opens each document group.
pub const FILE_INFO_DESCRIPTION: &str = "File Information";

/// Accumulated GSTR-3B results of a batch, in document iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Gstr3bBatch {
    /// Details of every document, keyed by file name.
    pub details: Vec<(String, DocumentDetails)>,
    pub tables: BatchTables,
}

impl Gstr3bBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's details and tables.
    ///
    /// File names key the combined report, so a name already in the batch
    /// is given a numbered suffix and the document's rows are retagged.
    /// Returns the name the document is listed under.
    pub fn push(&mut self, document: &Gstr3bDocument) -> String {
        let name = unique_name(&document.file_name, |candidate| {
            self.details.iter().any(|(taken, _)| taken == candidate)
        });
        if name != document.file_name {
            warn!("Duplicate file name {}, listed as {}", document.file_name, name);
        }

        self.details.push((name.clone(), document.details.clone()));
        self.tables.push_document(
            &retag(&document.outward_supplies, &name),
            &retag(&document.eligible_itc, &name),
            &retag(&document.tax_payment, &name),
        );
        name
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// The combined report of everything pushed so far.
    pub fn combined(&self) -> Vec<CombinedRow> {
        combine_gstr3b(&self.details, &self.tables)
    }
}

fn retag<R: TableRow + Clone>(table: &Table<R>, file_name: &str) -> Table<R> {
    Table::new(file_name, table.rows.clone())
}

/// `name`, or the first of `name (2)`, `name (3)`, ... that is not taken.
/// The suffix goes before the extension: `april.pdf` becomes `april (2).pdf`.
pub fn unique_name(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    (2..)
        .map(|n| format!("{} ({}){}", stem, n, extension))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Leading text cells shared by every row of one document group.
struct GroupHeader<'a> {
    file_name: &'a str,
    details: Option<&'a DocumentDetails>,
}

impl GroupHeader<'_> {
    fn row(&self, data_type: DataType, description: &str, amounts: ReportAmounts) -> CombinedRow {
        // no record at all is "Unknown"; a field the record lacks is blank
        let text = |value: Option<&Option<String>>| match value {
            Some(value) => value.clone().unwrap_or_default(),
            None => UNKNOWN.to_string(),
        };
        let d = self.details;

        CombinedRow {
            file_name: self.file_name.to_string(),
            gstin: text(d.map(|d| &d.gstin)),
            state: text(d.map(|d| &d.state)),
            legal_name: text(d.map(|d| &d.legal_name)),
            date: text(d.map(|d| &d.filing_date)),
            financial_year: text(d.map(|d| &d.financial_year)),
            period: text(d.map(|d| &d.period)),
            data_type,
            description: description.to_string(),
            amounts,
        }
    }

    fn table_rows<'r, R>(
        &'r self,
        data_type: DataType,
        rows: &'r [TaggedRow<R>],
    ) -> impl Iterator<Item = CombinedRow> + 'r
    where
        R: TableRow,
        for<'x> ReportAmounts: From<&'x R>,
    {
        rows.iter()
            .filter(move |tagged| tagged.file_name == self.file_name)
            .map(move |tagged| {
                self.row(data_type, tagged.row.label(), ReportAmounts::from(&tagged.row))
            })
    }
}

/// File names in the order the combined report lists them.
///
/// Documents follow `details` order but only those referenced by a table
/// are listed. Tags that only appear in the tables come last, in order of
/// first appearance.
fn document_order<'a>(
    details: &'a [(String, DocumentDetails)],
    tables: &'a BatchTables,
) -> Vec<&'a str> {
    let table_tags = tables
        .outward_supplies
        .iter()
        .map(|r| r.file_name.as_str())
        .chain(tables.eligible_itc.iter().map(|r| r.file_name.as_str()))
        .chain(tables.tax_payment.iter().map(|r| r.file_name.as_str()));

    let mut tagged: Vec<&str> = Vec::new();
    for tag in table_tags {
        if !tagged.contains(&tag) {
            tagged.push(tag);
        }
    }

    let mut order: Vec<&str> = Vec::with_capacity(tagged.len());
    for (file_name, _) in details {
        let name = file_name.as_str();
        if tagged.contains(&name) && !order.contains(&name) {
            order.push(name);
        }
    }
    for tag in tagged {
        if !order.contains(&tag) {
            order.push(tag);
        }
    }
    order
}

/// Flatten details and tables into one report grouped by document.
///
/// Each group is a `FILE INFO` row, the Table 3.1 rows, the Table 4 rows,
/// the Table 6.1 rows and a separator. Details are joined by file name.
/// A document with tables but no details record gets `Unknown` fields.
pub fn combine_gstr3b(
    details: &[(String, DocumentDetails)],
    tables: &BatchTables,
) -> Vec<CombinedRow> {
    let by_name: HashMap<&str, &DocumentDetails> = details
        .iter()
        .map(|(name, d)| (name.as_str(), d))
        .collect();

    let mut rows = Vec::new();

    for file_name in document_order(details, tables) {
        let header = GroupHeader {
            file_name,
            details: by_name.get(file_name).copied(),
        };
        if header.details.is_none() {
            debug!("No details record for {}", file_name);
        }

        rows.push(header.row(
            DataType::FileInfo,
            FILE_INFO_DESCRIPTION,
            ReportAmounts::default(),
        ));
        rows.extend(header.table_rows(DataType::Table31, &tables.outward_supplies));
        rows.extend(header.table_rows(DataType::Table4, &tables.eligible_itc));
        rows.extend(header.table_rows(DataType::Table61, &tables.tax_payment));
        rows.push(CombinedRow::separator());
    }

    rows
}
