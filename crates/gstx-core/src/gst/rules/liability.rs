//! GSTR-1 total liability line.

use super::numeric::clean_numeric_value;
use super::patterns::TOTAL_LIABILITY;
use crate::models::report::TotalLiability;

/// Read the five figures of the "Total Liability (Outward supplies other
/// than Reverse charge)" line: taxable value, IGST, CGST, SGST and cess.
///
/// When the line is absent the result has `found == false` and zero figures.
pub fn extract_total_liability(text: &str) -> TotalLiability {
    let Some(caps) = TOTAL_LIABILITY.captures(text) else {
        return TotalLiability::default();
    };

    let figure = |i: usize| clean_numeric_value(caps.get(i).map(|m| m.as_str()));

    TotalLiability {
        taxable_value: figure(1),
        igst: figure(2),
        cgst: figure(3),
        sgst: figure(4),
        cess: figure(5),
        found: true,
    }
}
