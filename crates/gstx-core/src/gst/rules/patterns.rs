//! Common regex patterns for GST return extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GSTR-3B header fields (searched over the whole document text)
    pub static ref GSTR3B_GSTIN: Regex = Regex::new(
        r"\bGSTIN\b\s*[:\-]?\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref GSTR3B_LEGAL_NAME: Regex = Regex::new(
        r"Legal name of the registered person\s*[:\-]?\s*(.+)"
    ).unwrap();

    pub static ref GSTR3B_ARN_DATE: Regex = Regex::new(
        r"Date of ARN\s*[:\-]?\s*(\d[\d/]*)"
    ).unwrap();

    pub static ref GSTR3B_YEAR: Regex = Regex::new(
        r"\bYear\b\s*[:\-]?\s*(\d{4}-\d{2})"
    ).unwrap();

    pub static ref GSTR3B_PERIOD: Regex = Regex::new(
        r"\bPeriod\b\s*[:\-]?\s*([A-Za-z]+)"
    ).unwrap();

    // GSTR-1 header fields (searched over the first page with text)
    pub static ref GSTR1_GSTIN: Regex = Regex::new(
        r"GSTIN\s*[:\-]?\s*(\d{2}[A-Z0-9]{13})"
    ).unwrap();

    pub static ref GSTR1_LEGAL_NAME: Regex = Regex::new(
        r"Legal name of the registered person[ \t]*[:\-]?[ \t]*(.*)"
    ).unwrap();

    pub static ref GSTR1_TAX_PERIOD: Regex = Regex::new(
        r"\bTax period\b\s*[:\-]?\s*(\w+)"
    ).unwrap();

    pub static ref GSTR1_FINANCIAL_YEAR: Regex = Regex::new(
        r"\bFinancial year\b\s*[:\-]?\s*(\d{4}-\d{2})"
    ).unwrap();

    // GSTR-1 summary line with taxable value, IGST, CGST, SGST and cess
    pub static ref TOTAL_LIABILITY: Regex = Regex::new(
        r"Total Liability \(Outward supplies other than Reverse charge\)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)\s+([\d,]+\.\d+)"
    ).unwrap();

    // Amount-like table cell: digits with separators, optional stray marker
    pub static ref AMOUNT_CELL: Regex = Regex::new(
        r"^-?[\d,]*\d(?:\.\d+)?[EF]?$|^-$"
    ).unwrap();

    // Cell boundaries in layout-preserving text
    pub static ref CELL_SEPARATOR: Regex = Regex::new(
        r"\t+|\s{2,}|\s*\|\s*"
    ).unwrap();

    // Start of a numbered section heading such as "5. Values of exempt ..."
    pub static ref SECTION_HEADING: Regex = Regex::new(
        r"^\s*(\d+(?:\.\d+)*)\.?\s+[A-Z]"
    ).unwrap();
}
