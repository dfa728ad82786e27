//! GSTR-3B table extractors: 3.1 (outward supplies), 4 (eligible ITC) and
//! 6.1 (payment of tax).

use std::collections::HashMap;

use tracing::debug;

use super::grid::{scoped_rows, section_number, table_under_header, GridRow};
use super::rules::numeric::NumericNormalizer;
use crate::models::report::{ItcRow, ItcRowKind, PaymentRow, SupplyRow};
use crate::pdf::PdfPage;

/// Page anchors of Table 3.1; both must be present.
pub const TABLE_3_1_ANCHORS: [&str; 2] = ["3.1", "Nature of Supplies"];

/// Page anchor of Table 6.1.
pub const TABLE_6_1_ANCHOR: &str = "Payment of tax";

/// Header cell that starts Table 6.1.
pub const TABLE_6_1_HEADER: &str = "Description";

/// Line anchor that opens Table 4.
pub const TABLE_4_START: &str = "Eligible ITC";

/// Line anchors that close Table 4, besides a section 5 heading.
pub const TABLE_4_END: [&str; 2] = ["Details of amount paid", "Payment of tax"];

/// Row labels containing these are headers, not figures.
const TABLE_4_NOISE: [&str; 2] = ["Details", "Integrated"];

/// Compact form used for label matching: lowercase, no whitespace.
fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl ItcRowKind {
    /// Whether a source row label names this kind.
    pub fn matches(&self, row_label: &str) -> bool {
        compact(row_label).contains(&compact(self.label()))
    }

    /// The kind a source row label names. The first kind in form order
    /// wins when several labels are contained in the row label.
    pub fn classify(row_label: &str) -> Option<ItcRowKind> {
        ItcRowKind::ALL.into_iter().find(|kind| kind.matches(row_label))
    }
}

/// Extracts the GSTR-3B tables from a document's pages.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    normalizer: NumericNormalizer,
}

impl TableExtractor {
    pub fn new(normalizer: NumericNormalizer) -> Self {
        Self { normalizer }
    }

    /// Table 3.1. Empty when no page carries the anchors or a table.
    pub fn outward_supplies(&self, pages: &[PdfPage], notes: &mut Vec<String>) -> Vec<SupplyRow> {
        let [section, header] = TABLE_3_1_ANCHORS;
        let Some(rows) = first_anchored_table(pages, &[section, header], section, header) else {
            debug!("Table 3.1 not found");
            return Vec::new();
        };

        rows.iter()
            .skip(1)
            .map(|row| {
                let [a, b, c, d, e] = self.figures("Table 3.1", row, notes);
                SupplyRow {
                    nature_of_supplies: label_of(row),
                    total_taxable_value: a,
                    integrated_tax: b,
                    central_tax: c,
                    state_ut_tax: d,
                    cess: e,
                }
            })
            .collect()
    }

    /// Table 6.1. Empty when no page carries the anchor or a table.
    pub fn tax_payment(&self, pages: &[PdfPage], notes: &mut Vec<String>) -> Vec<PaymentRow> {
        let Some(rows) = first_anchored_table(
            pages,
            &[TABLE_6_1_ANCHOR],
            TABLE_6_1_ANCHOR,
            TABLE_6_1_HEADER,
        ) else {
            debug!("Table 6.1 not found");
            return Vec::new();
        };

        rows.iter()
            .skip(1)
            .map(|row| {
                let [a, b, c, d, e] = self.figures("Table 6.1", row, notes);
                PaymentRow {
                    description: label_of(row),
                    total_tax_payable: a,
                    tax_paid_through_itc: b,
                    tax_paid_in_cash: c,
                    interest_paid_in_cash: d,
                    late_fee_paid_in_cash: e,
                }
            })
            .collect()
    }

    /// Table 4. Always thirteen rows in form order; rows not located in
    /// the document are zero with `found == false`.
    pub fn eligible_itc(&self, pages: &[PdfPage], notes: &mut Vec<String>) -> Vec<ItcRow> {
        let rows = scoped_rows(
            pages,
            |line| line.contains(TABLE_4_START),
            is_table_4_end,
        );

        let mut located: HashMap<ItcRowKind, [f64; 4]> = HashMap::new();

        for row in &rows {
            if row.len() < 4 {
                continue;
            }
            let label = &row[0];
            if TABLE_4_NOISE.iter().any(|noise| label.contains(noise)) {
                continue;
            }

            let Some(kind) = ItcRowKind::classify(label) else {
                debug!("Unmatched Table 4 row: {}", label);
                continue;
            };

            let mut values = [0.0; 4];
            for (slot, cell) in values.iter_mut().zip(&row[1..]) {
                *slot = self.amount("Table 4", label, cell, notes);
            }
            // a later row for the same kind replaces the earlier one
            located.insert(kind, values);
        }

        debug!("Table 4: located {} of {} rows", located.len(), ItcRowKind::ALL.len());

        ItcRowKind::ALL
            .into_iter()
            .map(|kind| match located.get(&kind) {
                Some(values) => ItcRow::with_values(kind, *values, true),
                None => ItcRow::missing(kind),
            })
            .collect()
    }

    /// Five numeric columns after the label; extra cells are dropped and
    /// missing ones are zero.
    fn figures(&self, table: &str, row: &GridRow, notes: &mut Vec<String>) -> [f64; 5] {
        let label = row.first().map(String::as_str).unwrap_or_default();
        let mut values = [0.0; 5];
        for (slot, cell) in values.iter_mut().zip(row.iter().skip(1)) {
            *slot = self.amount(table, label, cell, notes);
        }
        values
    }

    /// Normalize one cell, noting unreadable cells and dropped markers.
    fn amount(&self, table: &str, label: &str, cell: &str, notes: &mut Vec<String>) -> f64 {
        let parsed = self.normalizer.classify(cell);
        if !parsed.parsed && !is_blank_cell(cell) {
            notes.push(format!("{}, {}: unreadable amount {:?} read as 0", table, label, cell));
        } else if let Some(marker) = parsed.marker {
            notes.push(format!("{}, {}: dropped '{}' from {:?}", table, label, marker, cell));
        }
        parsed.value
    }
}

/// Dashes and empty cells stand for "nothing to report".
fn is_blank_cell(cell: &str) -> bool {
    matches!(cell.trim(), "" | "-")
}

fn label_of(row: &GridRow) -> String {
    row.first().cloned().unwrap_or_default()
}

fn is_table_4_end(line: &str) -> bool {
    let next_section = section_number(line)
        .and_then(|n| n.split('.').next())
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| n >= 5);
    next_section || TABLE_4_END.iter().any(|anchor| line.contains(anchor))
}

/// First page containing all `page_anchors` that also yields a table under
/// `header_anchor`.
fn first_anchored_table(
    pages: &[PdfPage],
    page_anchors: &[&str],
    section_anchor: &str,
    header_anchor: &str,
) -> Option<Vec<GridRow>> {
    pages
        .iter()
        .filter(|page| page_anchors.iter().all(|a| page.text.contains(a)))
        .find_map(|page| {
            let table = table_under_header(&page.text, section_anchor, header_anchor);
            if table.is_some() {
                debug!("Found table under {:?} on page {}", header_anchor, page.number);
            }
            table
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{Table, TableRow};
    use crate::pdf::PdfContent;
    use pretty_assertions::assert_eq;

    fn extract_table_3_1(pages: &[PdfPage]) -> Vec<SupplyRow> {
        TableExtractor::default().outward_supplies(pages, &mut Vec::new())
    }

    fn extract_table_4(pages: &[PdfPage]) -> Vec<ItcRow> {
        TableExtractor::default().eligible_itc(pages, &mut Vec::new())
    }

    fn extract_table_6_1(pages: &[PdfPage]) -> Vec<PaymentRow> {
        TableExtractor::default().tax_payment(pages, &mut Vec::new())
    }

    const TABLE_4_PAGE: &str = "\
4. Eligible ITC
Details  Integrated Tax  Central Tax  State/UT Tax  Cess
A. ITC Available (whether in full or part)
(1) Import of goods  1,000.00  0.00  0.00  10.00
(3) Inward supplies liable to reverse charge  0.00  50.00  50.00  0.00
(5) All other ITC  2,500.50E  1,200.00  1,200.00  0.00
B. ITC Reversed
(2) Others  100.00  0.00  0.00  0.00
C. Net ITC available (A-B)  3,400.50  1,250.00  1,250.00  10.00
(2) Ineligible ITC under section 16(4) & ITC restricted due to PoS rules  7.00  0.00  0.00  0.00
5. Values of exempt, nil-rated and non-GST inward supplies
(2) Others  999.00  999.00  999.00  999.00
";

    #[test]
    fn test_table_4_fills_all_rows() {
        let content = PdfContent::from_pages(["GSTR-3B header", TABLE_4_PAGE]);
        let rows = extract_table_4(&content.pages);

        assert_eq!(rows.len(), 13);
        let kinds: Vec<ItcRowKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ItcRowKind::ALL.to_vec());

        let found: Vec<ItcRowKind> = rows.iter().filter(|r| r.found).map(|r| r.kind).collect();
        assert_eq!(
            found,
            vec![
                ItcRowKind::ImportOfGoods,
                ItcRowKind::InwardReverseCharge,
                ItcRowKind::AllOtherItc,
                ItcRowKind::ReversedOthers,
                ItcRowKind::NetAvailable,
                ItcRowKind::Ineligible,
            ]
        );

        for row in rows.iter().filter(|r| !r.found) {
            assert_eq!(row.values(), vec![0.0; 4], "{} should be zero", row.kind);
        }

        let other = &rows[5];
        assert_eq!(other.details, "(5) All other ITC");
        assert_eq!(other.values(), vec![2500.50, 1200.0, 1200.0, 0.0]);
    }

    #[test]
    fn test_table_4_stops_at_next_section() {
        let content = PdfContent::from_pages([TABLE_4_PAGE]);
        let rows = extract_table_4(&content.pages);
        let others = rows.iter().find(|r| r.kind == ItcRowKind::ReversedOthers).unwrap();
        assert_eq!(others.integrated_tax, 100.0);
    }

    #[test]
    fn test_table_4_spans_pages() {
        let content = PdfContent::from_pages([
            "4. Eligible ITC\n(1) Import of goods  1.00  2.00  3.00  4.00",
            "(2) Import of services  5.00  6.00  7.00  8.00\nPayment of tax",
        ]);
        let rows = extract_table_4(&content.pages);
        assert!(rows[1].found);
        assert!(rows[2].found);
        assert_eq!(rows[2].cess, 8.0);
    }

    #[test]
    fn test_table_4_without_anchor_is_all_zero() {
        let content = PdfContent::from_pages(["(1) Import of goods  1.00  2.00  3.00  4.00"]);
        let rows = extract_table_4(&content.pages);
        assert_eq!(rows.len(), 13);
        assert!(rows.iter().all(|r| !r.found));
    }

    #[test]
    fn test_table_4_short_rows_skipped() {
        let content = PdfContent::from_pages(["Eligible ITC\n(1) Import of goods  1.00  2.00"]);
        let rows = extract_table_4(&content.pages);
        assert!(!rows[1].found);
    }

    #[test]
    fn test_classify_first_match_wins() {
        // contains both "(2) Others" and "(1) Import of goods"; form order decides
        let label = "(1) Import of goods (2) Others";
        assert_eq!(ItcRowKind::classify(label), Some(ItcRowKind::ImportOfGoods));

        assert_eq!(
            ItcRowKind::classify("(2)  OTHERS"),
            Some(ItcRowKind::ReversedOthers)
        );
        assert_eq!(ItcRowKind::classify("(6) Something new"), None);
    }

    #[test]
    fn test_classify_ignores_case_and_spacing() {
        assert_eq!(
            ItcRowKind::classify("c. net itc AVAILABLE (A - B)"),
            Some(ItcRowKind::NetAvailable)
        );
        assert_eq!(ItcRowKind::classify("C: Net ITC available"), None);
        assert_eq!(
            ItcRowKind::classify("C.  Net ITC\u{a0}available (A-B)"),
            Some(ItcRowKind::NetAvailable)
        );
    }

    const TABLE_3_1_PAGE: &str = "\
3.1 Details of Outward supplies and inward supplies liable to reverse charge
Nature of Supplies  Total Taxable value  Integrated Tax  Central Tax  State/UT Tax  Cess
(a) Outward taxable supplies (other than zero rated, nil rated and exempted)  10,00,000.00  18,000.00  81,000.00  81,000.00  0.00
(b) Outward taxable supplies (zero rated)  50,000.00  0.00  -  -  0.00
(c) Other outward supplies (Nil rated, exempted)  1,000.00  -  -  -  -  extra  9.99
(d) Inward supplies (liable to reverse charge)  2,000.00  0.00
3.2 Of the supplies shown in 3.1 (a) above
";

    #[test]
    fn test_table_3_1() {
        let content = PdfContent::from_pages([TABLE_3_1_PAGE]);
        let rows = extract_table_3_1(&content.pages);

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            SupplyRow {
                nature_of_supplies:
                    "(a) Outward taxable supplies (other than zero rated, nil rated and exempted)"
                        .into(),
                total_taxable_value: 1_000_000.0,
                integrated_tax: 18_000.0,
                central_tax: 81_000.0,
                state_ut_tax: 81_000.0,
                cess: 0.0,
            }
        );
        // extra cells are truncated
        assert_eq!(rows[2].values(), vec![1000.0, 0.0, 0.0, 0.0, 0.0]);
        // missing cells are zero
        assert_eq!(rows[3].values(), vec![2000.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_page_tables_missing_keep_schema() {
        let content = PdfContent::from_pages(["Form GSTR-3B", "4. Eligible ITC"]);

        let outward = Table::new("a.pdf", extract_table_3_1(&content.pages));
        assert!(outward.is_empty());
        assert_eq!(
            outward.columns(),
            &[
                "Nature of Supplies",
                "Total Taxable Value",
                "Integrated Tax",
                "Central Tax",
                "State/UT Tax",
                "Cess",
            ]
        );

        let payment = Table::new("a.pdf", extract_table_6_1(&content.pages));
        assert!(payment.is_empty());
        assert_eq!(payment.columns(), PaymentRow::COLUMNS);
    }

    #[test]
    fn test_table_6_1() {
        let page = "\
6.1 Payment of tax
Description  Total tax payable  Tax paid through ITC  Tax paid in cash  Interest paid in cash  Late fee paid in cash
(A) Other than reverse charge
Integrated Tax  18,000.00  10,000.00  8,000.00  0.00  0.00
Central Tax  81,000.00  0.00  81,000.00  120.00  25.00
";
        let content = PdfContent::from_pages(["Form GSTR-3B", page]);
        let rows = extract_table_6_1(&content.pages);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "Integrated Tax");
        assert_eq!(rows[0].tax_paid_through_itc, 10_000.0);
        assert_eq!(rows[1].interest_paid_in_cash, 120.0);
        assert_eq!(rows[1].late_fee_paid_in_cash, 25.0);
    }

    #[test]
    fn test_anchored_page_without_table_falls_through() {
        let content = PdfContent::from_pages([
            "Payment of tax is due by the 20th",
            "6.1 Payment of tax\nDescription  Total tax payable\nCess  5.00",
        ]);
        let rows = extract_table_6_1(&content.pages);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Cess");
        assert_eq!(rows[0].total_tax_payable, 5.0);
    }

    #[test]
    fn test_widely_spaced_labels_keep_their_rows() {
        let extractor = TableExtractor::default();
        let content = PdfContent::from_pages([
            "4. Eligible ITC\n(5) All other  ITC  1.00  2.00  3.00  4.00",
        ]);
        let itc = extractor.eligible_itc(&content.pages, &mut Vec::new());
        let other = itc.iter().find(|r| r.kind == ItcRowKind::AllOtherItc).unwrap();
        assert!(other.found);
        assert_eq!(other.values(), vec![1.0, 2.0, 3.0, 4.0]);

        let content = PdfContent::from_pages([
            "3.1 Details of Outward supplies\nNature of Supplies  Total Taxable value  Integrated Tax\n(a) Outward  taxable supplies  500.00  90.00  0.00  0.00  0.00",
        ]);
        let supplies = extractor.outward_supplies(&content.pages, &mut Vec::new());
        assert_eq!(supplies.len(), 1);
        assert_eq!(supplies[0].nature_of_supplies, "(a) Outward taxable supplies");
        assert_eq!(supplies[0].total_taxable_value, 500.0);
        assert_eq!(supplies[0].integrated_tax, 90.0);
    }

    #[test]
    fn test_notes_markers_and_unreadable_cells() {
        let extractor = TableExtractor::default();
        let mut notes = Vec::new();

        let content = PdfContent::from_pages([TABLE_4_PAGE]);
        extractor.eligible_itc(&content.pages, &mut notes);
        assert_eq!(
            notes,
            vec![r#"Table 4, (5) All other ITC: dropped 'E' from "2,500.50E""#.to_string()]
        );

        notes.clear();
        let content = PdfContent::from_pages([TABLE_3_1_PAGE]);
        extractor.outward_supplies(&content.pages, &mut notes);
        // dashes are blanks, not unreadable figures
        assert!(notes.is_empty(), "{:?}", notes);

        let content = PdfContent::from_pages([
            "6.1 Payment of tax\nDescription  Total tax payable  Tax paid through ITC\nCess  5.00  n/a  0.00",
        ]);
        let rows = extractor.tax_payment(&content.pages, &mut notes);
        assert_eq!(rows[0].tax_paid_through_itc, 0.0);
        assert_eq!(
            notes,
            vec![r#"Table 6.1, Cess: unreadable amount "n/a" read as 0"#.to_string()]
        );
    }
}
