//! Spreadsheet export of extracted returns.

use std::fmt;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::{ExportError, Result};
use crate::gst::combine::Gstr3bBatch;
use crate::models::config::ExportConfig;
use crate::models::report::{
    CombinedRow, Gstr1Row, ItcRow, PaymentRow, SupplyRow, TableRow, TaggedRow,
};

/// Sheet names of the GSTR-1 workbook.
pub const GSTR1_SHEETS: [&str; 2] = ["All Data", "Filtered Data"];

/// Sheet names of the GSTR-3B workbook.
pub const GSTR3B_SHEETS: [&str; 5] = [
    "Combined Data",
    "General Details",
    "Table 3.1",
    "Table 4",
    "Table 6.1",
];

/// Columns of the GSTR-3B "General Details" sheet.
pub const GENERAL_DETAILS_COLUMNS: [&str; 7] = [
    "File Name",
    "GSTIN",
    "State",
    "Legal Name",
    "Date",
    "Financial Year",
    "Period",
];

/// Written in the Taxable Value column when a GSTR-1 has no liability line.
pub const NOT_FOUND: &str = "Not Found";

const AMOUNT_WIDTH: f64 = 16.0;

/// One spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Amount(f64),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Amount(value) => write!(f, "{:.2}", value),
        }
    }
}

struct Formats {
    header: Format,
    amount: Format,
}

impl Formats {
    fn new(config: &ExportConfig) -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0x2563EB))
                .set_font_color(Color::RGB(0xFFFFFF)),
            amount: Format::new()
                .set_num_format(&config.number_format)
                .set_align(FormatAlign::Right),
        }
    }
}

/// Drop characters that are not valid in sheet XML.
fn sanitize_cell(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || !(c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}')
        })
        .collect()
}

fn estimate_text_width(text: &str) -> f64 {
    (text.chars().count() as f64 * 1.2).clamp(10.0, 50.0)
}

/// Add a sheet with a bold header row followed by `rows`.
fn write_sheet<'a, I>(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: I,
    formats: &Formats,
) -> std::result::Result<(), XlsxError>
where
    I: IntoIterator<Item = Vec<Cell<'a>>>,
{
    let worksheet: &mut Worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    let mut widths: Vec<f64> = headers.iter().map(|h| estimate_text_width(h)).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }

    for (idx, cells) in rows.into_iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in cells.into_iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col as u16, sanitize_cell(text))?;
                    if let Some(width) = widths.get_mut(col) {
                        *width = width.max(estimate_text_width(text));
                    }
                }
                Cell::Amount(value) => {
                    worksheet.write_number_with_format(row, col as u16, value, &formats.amount)?;
                    if let Some(width) = widths.get_mut(col) {
                        *width = width.max(AMOUNT_WIDTH);
                    }
                }
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}

/// Cells of one GSTR-1 summary row.
pub fn gstr1_cells(row: &Gstr1Row) -> Vec<Cell<'_>> {
    let mut cells: Vec<Cell<'_>> = row.text_cells().into_iter().map(Cell::Text).collect();
    if row.liability.found {
        cells.extend(row.liability.to_array().into_iter().map(Cell::Amount));
    } else {
        cells.push(Cell::Text(NOT_FOUND));
        cells.extend([Cell::Text(""); 4]);
    }
    cells
}

/// Cells of one combined GSTR-3B row. Separator rows are blank apart from
/// their description.
pub fn combined_cells(row: &CombinedRow) -> Vec<Cell<'_>> {
    let mut cells: Vec<Cell<'_>> = row.text_cells().into_iter().map(Cell::Text).collect();
    if row.is_separator() {
        cells.extend([Cell::Text(""); 10]);
    } else {
        cells.extend(row.amounts.to_array().into_iter().map(Cell::Amount));
    }
    cells
}

fn tagged_cells<R: TableRow>(tagged: &TaggedRow<R>) -> Vec<Cell<'_>> {
    let mut cells = vec![Cell::Text(&tagged.file_name), Cell::Text(tagged.row.label())];
    cells.extend(tagged.row.values().into_iter().map(Cell::Amount));
    cells
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn tagged_headers<R: TableRow>() -> Vec<&'static str> {
    std::iter::once("File Name").chain(R::COLUMNS.iter().copied()).collect()
}

fn save(workbook: &mut Workbook, path: &Path) -> Result<()> {
    workbook.save(path).map_err(ExportError::from)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the GSTR-1 workbook: every row, then the rows passing the filters.
pub fn write_gstr1_workbook(
    path: &Path,
    all: &[Gstr1Row],
    filtered: &[Gstr1Row],
    config: &ExportConfig,
) -> Result<()> {
    let formats = Formats::new(config);
    let mut workbook = Workbook::new();

    let [all_sheet, filtered_sheet] = GSTR1_SHEETS;
    write_sheet(
        &mut workbook,
        all_sheet,
        &Gstr1Row::COLUMNS,
        all.iter().map(gstr1_cells),
        &formats,
    )
    .map_err(ExportError::from)?;
    write_sheet(
        &mut workbook,
        filtered_sheet,
        &Gstr1Row::COLUMNS,
        filtered.iter().map(gstr1_cells),
        &formats,
    )
    .map_err(ExportError::from)?;

    save(&mut workbook, path)
}

/// Write the GSTR-3B workbook: the combined report, then the details and
/// each table on its own sheet.
pub fn write_gstr3b_workbook(path: &Path, batch: &Gstr3bBatch, config: &ExportConfig) -> Result<()> {
    let formats = Formats::new(config);
    let mut workbook = Workbook::new();
    let [combined_sheet, details_sheet, outward_sheet, itc_sheet, payment_sheet] = GSTR3B_SHEETS;

    let combined = batch.combined();
    write_sheet(
        &mut workbook,
        combined_sheet,
        &CombinedRow::columns(),
        combined.iter().map(combined_cells),
        &formats,
    )
    .map_err(ExportError::from)?;

    let details = batch.details.iter().map(|(file_name, d)| {
        vec![
            Cell::Text(file_name),
            Cell::Text(text(&d.gstin)),
            Cell::Text(text(&d.state)),
            Cell::Text(text(&d.legal_name)),
            Cell::Text(text(&d.filing_date)),
            Cell::Text(text(&d.financial_year)),
            Cell::Text(text(&d.period)),
        ]
    });
    write_sheet(&mut workbook, details_sheet, &GENERAL_DETAILS_COLUMNS, details, &formats)
        .map_err(ExportError::from)?;

    let tables = &batch.tables;
    write_sheet(
        &mut workbook,
        outward_sheet,
        &tagged_headers::<SupplyRow>(),
        tables.outward_supplies.iter().map(tagged_cells),
        &formats,
    )
    .map_err(ExportError::from)?;
    write_sheet(
        &mut workbook,
        itc_sheet,
        &tagged_headers::<ItcRow>(),
        tables.eligible_itc.iter().map(tagged_cells),
        &formats,
    )
    .map_err(ExportError::from)?;
    write_sheet(
        &mut workbook,
        payment_sheet,
        &tagged_headers::<PaymentRow>(),
        tables.tax_payment.iter().map(tagged_cells),
        &formats,
    )
    .map_err(ExportError::from)?;

    save(&mut workbook, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gst::document::ReturnParser;
    use crate::models::report::{DocumentDetails, TotalLiability};
    use crate::pdf::PdfContent;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use pretty_assertions::assert_eq;

    fn header_row(workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>, sheet: &str) -> Vec<String> {
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn gstr1_row(file_name: &str, found: bool) -> Gstr1Row {
        Gstr1Row {
            file_name: file_name.to_string(),
            details: DocumentDetails {
                gstin: Some("27ABCDE1234F1Z5".to_string()),
                state: Some("Maharashtra".to_string()),
                ..DocumentDetails::default()
            },
            liability: TotalLiability {
                taxable_value: 1000.0,
                igst: 180.0,
                found,
                ..TotalLiability::default()
            },
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_gstr1_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gstr1.xlsx");
        let all = vec![gstr1_row("a.pdf", true), gstr1_row("b.pdf", false)];

        write_gstr1_workbook(&path, &all, &all[..1], &ExportConfig::default()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), GSTR1_SHEETS.map(String::from).to_vec());
        assert_eq!(header_row(&mut workbook, "All Data"), Gstr1Row::COLUMNS.map(String::from).to_vec());

        let range = workbook.worksheet_range("All Data").unwrap();
        assert_eq!(range.get_value((1, 6)), Some(&Data::Float(1000.0)));
        assert_eq!(range.get_value((2, 6)), Some(&Data::String(NOT_FOUND.to_string())));

        let filtered = workbook.worksheet_range("Filtered Data").unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_gstr3b_workbook() {
        let page = "\
GSTIN 27ABCDE1234F1Z5
Period April
3.1 Details of Outward supplies
Nature of Supplies  Total Taxable value  Integrated Tax  Central Tax  State/UT Tax  Cess
(a) Outward taxable supplies  500.00  90.00  0.00  0.00  0.00
";
        let doc = ReturnParser::new().parse_gstr3b("april.pdf", &PdfContent::from_pages([page]));
        let mut batch = Gstr3bBatch::new();
        batch.push(&doc);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gstr3b.xlsx");
        write_gstr3b_workbook(&path, &batch, &ExportConfig::default()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), GSTR3B_SHEETS.map(String::from).to_vec());

        let combined_headers: Vec<String> =
            CombinedRow::columns().into_iter().map(String::from).collect();
        assert_eq!(header_row(&mut workbook, "Combined Data"), combined_headers);
        assert_eq!(
            header_row(&mut workbook, "Table 4"),
            vec!["File Name", "Details", "Integrated Tax", "Central Tax", "State/UT Tax", "Cess"]
        );

        let combined = workbook.worksheet_range("Combined Data").unwrap();
        // header + info + one 3.1 row + 13 Table 4 rows + separator
        assert_eq!(combined.height(), 17);
        assert_eq!(combined.get_value((1, 7)), Some(&Data::String("FILE INFO".to_string())));
        assert_eq!(combined.get_value((2, 9)), Some(&Data::Float(500.0)));
        assert_eq!(
            combined.get_value((16, 8)),
            Some(&Data::String("----------------------".to_string()))
        );

        let outward = workbook.worksheet_range("Table 3.1").unwrap();
        assert_eq!(outward.get_value((1, 0)), Some(&Data::String("april.pdf".to_string())));
        assert_eq!(outward.get_value((1, 3)), Some(&Data::Float(90.0)));

        let details = workbook.worksheet_range("General Details").unwrap();
        assert_eq!(details.get_value((1, 2)), Some(&Data::String("Maharashtra".to_string())));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Amount(1234.5).to_string(), "1234.50");
        assert_eq!(Cell::Text("Goa").to_string(), "Goa");
        let cells: Vec<String> = gstr1_cells(&gstr1_row("b.pdf", false))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(cells[6..], ["Not Found", "", "", "", ""]);
    }

    #[test]
    fn test_sanitize_cell() {
        assert_eq!(sanitize_cell("ACME\u{0}\u{7} & Co\n"), "ACME & Co\n");
    }
}
