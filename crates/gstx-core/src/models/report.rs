//! Report data models for GSTR-1 and GSTR-3B extraction.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder used when a document has table rows but no details record.
pub const UNKNOWN: &str = "Unknown";

/// Description carried by the blank row that closes each document group.
pub const SEPARATOR_DESCRIPTION: &str = "----------------------";

/// Scalar details located in one return.
///
/// Every field is optional: a label that is not found in the text leaves
/// its field unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetails {
    /// GST identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,

    /// Jurisdiction resolved from the first two GSTIN characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Legal name of the registered person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    /// Tax period label (a month name on both forms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    /// Financial year in `YYYY-YY` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_year: Option<String>,

    /// Date of ARN as printed (`dd/mm/yyyy`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<String>,

    /// Date of ARN parsed as a calendar date, when it is a valid date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_date_parsed: Option<NaiveDate>,
}

/// A row type of one of the extracted tables.
pub trait TableRow {
    /// Column names, label column first.
    const COLUMNS: &'static [&'static str];

    /// Text of the label column.
    fn label(&self) -> &str;

    /// Numeric columns, in `COLUMNS[1..]` order.
    fn values(&self) -> Vec<f64>;
}

/// One row of Table 3.1 (outward and reverse charge supplies).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyRow {
    pub nature_of_supplies: String,
    pub total_taxable_value: f64,
    pub integrated_tax: f64,
    pub central_tax: f64,
    pub state_ut_tax: f64,
    pub cess: f64,
}

impl TableRow for SupplyRow {
    const COLUMNS: &'static [&'static str] = &[
        "Nature of Supplies",
        "Total Taxable Value",
        "Integrated Tax",
        "Central Tax",
        "State/UT Tax",
        "Cess",
    ];

    fn label(&self) -> &str {
        &self.nature_of_supplies
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.total_taxable_value,
            self.integrated_tax,
            self.central_tax,
            self.state_ut_tax,
            self.cess,
        ]
    }
}

/// The fixed rows of Table 4 (eligible ITC), in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItcRowKind {
    Available,
    ImportOfGoods,
    ImportOfServices,
    InwardReverseCharge,
    InwardFromIsd,
    AllOtherItc,
    Reversed,
    ReversedRules,
    ReversedOthers,
    NetAvailable,
    OtherDetails,
    Reclaimed,
    Ineligible,
}

impl ItcRowKind {
    /// All kinds in the order they appear on the form.
    pub const ALL: [ItcRowKind; 13] = [
        ItcRowKind::Available,
        ItcRowKind::ImportOfGoods,
        ItcRowKind::ImportOfServices,
        ItcRowKind::InwardReverseCharge,
        ItcRowKind::InwardFromIsd,
        ItcRowKind::AllOtherItc,
        ItcRowKind::Reversed,
        ItcRowKind::ReversedRules,
        ItcRowKind::ReversedOthers,
        ItcRowKind::NetAvailable,
        ItcRowKind::OtherDetails,
        ItcRowKind::Reclaimed,
        ItcRowKind::Ineligible,
    ];

    /// Row label as printed on the form.
    pub fn label(&self) -> &'static str {
        match self {
            ItcRowKind::Available => "A. ITC Available (whether in full or part)",
            ItcRowKind::ImportOfGoods => "(1) Import of goods",
            ItcRowKind::ImportOfServices => "(2) Import of services",
            ItcRowKind::InwardReverseCharge => "(3) Inward supplies liable to reverse charge",
            ItcRowKind::InwardFromIsd => "(4) Inward supplies from ISD",
            ItcRowKind::AllOtherItc => "(5) All other ITC",
            ItcRowKind::Reversed => "B. ITC Reversed",
            ItcRowKind::ReversedRules => {
                "(1) As per rules 38,42 & 43 of CGST Rules and section 17(5)"
            }
            ItcRowKind::ReversedOthers => "(2) Others",
            ItcRowKind::NetAvailable => "C. Net ITC available (A-B)",
            ItcRowKind::OtherDetails => "D. Other Details",
            ItcRowKind::Reclaimed => {
                "(1) ITC reclaimed which was reversed under Table 4(B)(2) in earlier tax period"
            }
            ItcRowKind::Ineligible => {
                "(2) Ineligible ITC under section 16(4) & ITC restricted due to PoS rules"
            }
        }
    }
}

impl fmt::Display for ItcRowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of Table 4 (eligible ITC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItcRow {
    pub kind: ItcRowKind,
    pub details: String,
    pub integrated_tax: f64,
    pub central_tax: f64,
    pub state_ut_tax: f64,
    pub cess: f64,
    /// Whether the row was located in the document; `false` rows are zero.
    pub found: bool,
}

impl ItcRow {
    /// A zero row for a label that was not located.
    pub fn missing(kind: ItcRowKind) -> Self {
        Self::with_values(kind, [0.0; 4], false)
    }

    pub fn with_values(kind: ItcRowKind, values: [f64; 4], found: bool) -> Self {
        Self {
            kind,
            details: kind.label().to_string(),
            integrated_tax: values[0],
            central_tax: values[1],
            state_ut_tax: values[2],
            cess: values[3],
            found,
        }
    }
}

impl TableRow for ItcRow {
    const COLUMNS: &'static [&'static str] = &[
        "Details",
        "Integrated Tax",
        "Central Tax",
        "State/UT Tax",
        "Cess",
    ];

    fn label(&self) -> &str {
        &self.details
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.integrated_tax,
            self.central_tax,
            self.state_ut_tax,
            self.cess,
        ]
    }
}

/// One row of Table 6.1 (payment of tax).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub description: String,
    pub total_tax_payable: f64,
    pub tax_paid_through_itc: f64,
    pub tax_paid_in_cash: f64,
    pub interest_paid_in_cash: f64,
    pub late_fee_paid_in_cash: f64,
}

impl TableRow for PaymentRow {
    const COLUMNS: &'static [&'static str] = &[
        "Description",
        "Total Tax Payable",
        "Tax Paid Through ITC",
        "Tax Paid in Cash",
        "Interest Paid in Cash",
        "Late Fee Paid in Cash",
    ];

    fn label(&self) -> &str {
        &self.description
    }

    fn values(&self) -> Vec<f64> {
        vec![
            self.total_tax_payable,
            self.tax_paid_through_itc,
            self.tax_paid_in_cash,
            self.interest_paid_in_cash,
            self.late_fee_paid_in_cash,
        ]
    }
}

/// An extracted table tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<R> {
    /// Source file name; the join key across tables.
    pub file_name: String,
    pub rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    pub fn new(file_name: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            file_name: file_name.into(),
            rows,
        }
    }

    /// Column schema of this table, available even when it has no rows.
    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table row carrying its source file name, as accumulated across a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRow<R> {
    pub file_name: String,
    #[serde(flatten)]
    pub row: R,
}

/// The three GSTR-3B tables of a whole batch, concatenated in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTables {
    pub outward_supplies: Vec<TaggedRow<SupplyRow>>,
    pub eligible_itc: Vec<TaggedRow<ItcRow>>,
    pub tax_payment: Vec<TaggedRow<PaymentRow>>,
}

impl BatchTables {
    /// Append every row of one document's tables.
    pub fn push_document(
        &mut self,
        outward: &Table<SupplyRow>,
        itc: &Table<ItcRow>,
        payment: &Table<PaymentRow>,
    ) {
        self.outward_supplies.extend(tag_rows(outward));
        self.eligible_itc.extend(tag_rows(itc));
        self.tax_payment.extend(tag_rows(payment));
    }
}

fn tag_rows<R: Clone>(table: &Table<R>) -> impl Iterator<Item = TaggedRow<R>> + '_ {
    table.rows.iter().map(|row| TaggedRow {
        file_name: table.file_name.clone(),
        row: row.clone(),
    })
}

/// Discriminator of a combined report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "FILE INFO")]
    FileInfo,
    #[serde(rename = "Table 3.1")]
    Table31,
    #[serde(rename = "Table 4")]
    Table4,
    #[serde(rename = "Table 6.1")]
    Table61,
    #[serde(rename = "")]
    Separator,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::FileInfo => "FILE INFO",
            DataType::Table31 => "Table 3.1",
            DataType::Table4 => "Table 4",
            DataType::Table61 => "Table 6.1",
            DataType::Separator => "",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Union of the numeric columns of all three GSTR-3B tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportAmounts {
    pub total_taxable_value: f64,
    pub integrated_tax: f64,
    pub central_tax: f64,
    pub state_ut_tax: f64,
    pub cess: f64,
    pub total_tax_payable: f64,
    pub tax_paid_through_itc: f64,
    pub tax_paid_in_cash: f64,
    pub interest_paid_in_cash: f64,
    pub late_fee_paid_in_cash: f64,
}

impl ReportAmounts {
    pub const COLUMNS: [&'static str; 10] = [
        "Total Taxable Value",
        "Integrated Tax",
        "Central Tax",
        "State/UT Tax",
        "Cess",
        "Total Tax Payable",
        "Tax Paid Through ITC",
        "Tax Paid in Cash",
        "Interest Paid in Cash",
        "Late Fee Paid in Cash",
    ];

    pub fn to_array(&self) -> [f64; 10] {
        [
            self.total_taxable_value,
            self.integrated_tax,
            self.central_tax,
            self.state_ut_tax,
            self.cess,
            self.total_tax_payable,
            self.tax_paid_through_itc,
            self.tax_paid_in_cash,
            self.interest_paid_in_cash,
            self.late_fee_paid_in_cash,
        ]
    }
}

impl From<&SupplyRow> for ReportAmounts {
    fn from(row: &SupplyRow) -> Self {
        Self {
            total_taxable_value: row.total_taxable_value,
            integrated_tax: row.integrated_tax,
            central_tax: row.central_tax,
            state_ut_tax: row.state_ut_tax,
            cess: row.cess,
            ..Self::default()
        }
    }
}

impl From<&ItcRow> for ReportAmounts {
    fn from(row: &ItcRow) -> Self {
        Self {
            integrated_tax: row.integrated_tax,
            central_tax: row.central_tax,
            state_ut_tax: row.state_ut_tax,
            cess: row.cess,
            ..Self::default()
        }
    }
}

impl From<&PaymentRow> for ReportAmounts {
    fn from(row: &PaymentRow) -> Self {
        Self {
            total_tax_payable: row.total_tax_payable,
            tax_paid_through_itc: row.tax_paid_through_itc,
            tax_paid_in_cash: row.tax_paid_in_cash,
            interest_paid_in_cash: row.interest_paid_in_cash,
            late_fee_paid_in_cash: row.late_fee_paid_in_cash,
            ..Self::default()
        }
    }
}

/// One row of the flattened, document-grouped GSTR-3B report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub file_name: String,
    pub gstin: String,
    pub state: String,
    pub legal_name: String,
    pub date: String,
    pub financial_year: String,
    pub period: String,
    pub data_type: DataType,
    pub description: String,
    #[serde(flatten)]
    pub amounts: ReportAmounts,
}

impl CombinedRow {
    pub const LEADING_COLUMNS: [&'static str; 9] = [
        "File Name",
        "GSTIN",
        "State",
        "Legal Name",
        "Date",
        "Financial Year",
        "Period",
        "Data Type",
        "Description",
    ];

    /// Full header of the combined sheet.
    pub fn columns() -> Vec<&'static str> {
        Self::LEADING_COLUMNS
            .iter()
            .chain(ReportAmounts::COLUMNS.iter())
            .copied()
            .collect()
    }

    /// Blank row closing a document group.
    pub fn separator() -> Self {
        Self {
            file_name: String::new(),
            gstin: String::new(),
            state: String::new(),
            legal_name: String::new(),
            date: String::new(),
            financial_year: String::new(),
            period: String::new(),
            data_type: DataType::Separator,
            description: SEPARATOR_DESCRIPTION.to_string(),
            amounts: ReportAmounts::default(),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.data_type == DataType::Separator
    }

    /// Leading text cells, in `LEADING_COLUMNS` order.
    pub fn text_cells(&self) -> [&str; 9] {
        [
            self.file_name.as_str(),
            self.gstin.as_str(),
            self.state.as_str(),
            self.legal_name.as_str(),
            self.date.as_str(),
            self.financial_year.as_str(),
            self.period.as_str(),
            self.data_type.as_str(),
            self.description.as_str(),
        ]
    }
}

/// Figures of the GSTR-1 "Total Liability (Outward supplies other than
/// Reverse charge)" line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalLiability {
    pub taxable_value: f64,
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub cess: f64,
    /// Whether the line was located; `false` means all figures are zero.
    pub found: bool,
}

impl TotalLiability {
    pub fn to_array(&self) -> [f64; 5] {
        [self.taxable_value, self.igst, self.cgst, self.sgst, self.cess]
    }
}

/// One row of the GSTR-1 summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Row {
    pub file_name: String,
    pub details: DocumentDetails,
    pub liability: TotalLiability,
    /// Data-quality notes; never fatal.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Gstr1Row {
    pub const COLUMNS: [&'static str; 11] = [
        "File Name",
        "GSTIN",
        "State",
        "Legal Name",
        "Month",
        "Financial Year",
        "Taxable Value",
        "IGST",
        "CGST",
        "SGST",
        "Cess",
    ];

    /// Leading text cells (file name through financial year).
    pub fn text_cells(&self) -> [&str; 6] {
        let d = &self.details;
        [
            self.file_name.as_str(),
            d.gstin.as_deref().unwrap_or_default(),
            d.state.as_deref().unwrap_or_default(),
            d.legal_name.as_deref().unwrap_or_default(),
            d.period.as_deref().unwrap_or_default(),
            d.financial_year.as_deref().unwrap_or_default(),
        ]
    }
}
