//! GSTR-1 row filters.
//!
//! Each column filter is a multi-select that defaults to every value. An
//! explicit selection with no values also selects everything. Column
//! filters combine with AND.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::report::Gstr1Row;

/// Values selected for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Select the given values; no values selects everything.
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            Selection::All
        } else {
            Selection::Only(values)
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.is_empty(),
        }
    }

    /// Whether a cell passes. Absent cells only pass "select all".
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) if values.is_empty() => true,
            Selection::Only(values) => value.is_some_and(|v| values.contains(v)),
        }
    }
}

/// Filters over the GSTR-1 summary columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gstr1Filter {
    pub gstin: Selection,
    pub state: Selection,
    pub legal_name: Selection,
    pub month: Selection,
    pub financial_year: Selection,
}

impl Gstr1Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gstin(mut self, selection: Selection) -> Self {
        self.gstin = selection;
        self
    }

    pub fn with_state(mut self, selection: Selection) -> Self {
        self.state = selection;
        self
    }

    pub fn with_legal_name(mut self, selection: Selection) -> Self {
        self.legal_name = selection;
        self
    }

    pub fn with_month(mut self, selection: Selection) -> Self {
        self.month = selection;
        self
    }

    pub fn with_financial_year(mut self, selection: Selection) -> Self {
        self.financial_year = selection;
        self
    }

    /// Whether no column is restricted.
    pub fn is_unrestricted(&self) -> bool {
        [
            &self.gstin,
            &self.state,
            &self.legal_name,
            &self.month,
            &self.financial_year,
        ]
        .iter()
        .all(|s| s.is_all())
    }

    pub fn matches(&self, row: &Gstr1Row) -> bool {
        let d = &row.details;
        self.gstin.accepts(d.gstin.as_deref())
            && self.state.accepts(d.state.as_deref())
            && self.legal_name.accepts(d.legal_name.as_deref())
            && self.month.accepts(d.period.as_deref())
            && self.financial_year.accepts(d.financial_year.as_deref())
    }

    /// Rows passing every column filter, in input order.
    pub fn apply(&self, rows: &[Gstr1Row]) -> Vec<Gstr1Row> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

/// Distinct values of one column, sorted; the choices a selection offers.
pub fn distinct_values<F>(rows: &[Gstr1Row], column: F) -> Vec<String>
where
    F: Fn(&Gstr1Row) -> Option<&str>,
{
    rows.iter()
        .filter_map(|row| column(row))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The choices every column filter offers over `rows`, keyed by the
/// filter's name.
pub fn filter_choices(rows: &[Gstr1Row]) -> [(&'static str, Vec<String>); 5] {
    [
        ("gstin", distinct_values(rows, |r| r.details.gstin.as_deref())),
        ("state", distinct_values(rows, |r| r.details.state.as_deref())),
        ("legal-name", distinct_values(rows, |r| r.details.legal_name.as_deref())),
        ("month", distinct_values(rows, |r| r.details.period.as_deref())),
        ("year", distinct_values(rows, |r| r.details.financial_year.as_deref())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{DocumentDetails, TotalLiability};
    use pretty_assertions::assert_eq;

    fn row(file_name: &str, state: &str, month: &str, year: &str) -> Gstr1Row {
        Gstr1Row {
            file_name: file_name.to_string(),
            details: DocumentDetails {
                gstin: Some(format!("{}GSTIN", file_name)),
                state: Some(state.to_string()),
                period: Some(month.to_string()),
                financial_year: Some(year.to_string()),
                ..DocumentDetails::default()
            },
            liability: TotalLiability::default(),
            warnings: Vec::new(),
        }
    }

    fn rows() -> Vec<Gstr1Row> {
        vec![
            row("a", "Maharashtra", "April", "2023-24"),
            row("b", "Karnataka", "April", "2023-24"),
            row("c", "Maharashtra", "May", "2023-24"),
            row("d", "Maharashtra", "April", "2024-25"),
        ]
    }

    fn names(rows: &[Gstr1Row]) -> Vec<&str> {
        rows.iter().map(|r| r.file_name.as_str()).collect()
    }

    #[test]
    fn test_default_selects_all() {
        let filter = Gstr1Filter::new();
        assert!(filter.is_unrestricted());
        assert_eq!(filter.apply(&rows()).len(), 4);
    }

    #[test]
    fn test_empty_selection_selects_all() {
        let filter = Gstr1Filter::new()
            .with_state(Selection::Only(BTreeSet::new()))
            .with_month(Selection::only(Vec::<String>::new()));
        assert!(filter.is_unrestricted());
        assert_eq!(filter.apply(&rows()).len(), 4);
    }

    #[test]
    fn test_selections_and_together() {
        let filter = Gstr1Filter::new()
            .with_state(Selection::only(["Maharashtra"]))
            .with_month(Selection::only(["April"]));
        let all = rows();
        assert_eq!(names(&filter.apply(&all)), vec!["a", "d"]);

        let filter = filter.with_financial_year(Selection::only(["2023-24"]));
        assert_eq!(names(&filter.apply(&all)), vec!["a"]);
    }

    #[test]
    fn test_multi_value_selection() {
        let filter = Gstr1Filter::new().with_month(Selection::only(["April", "May"]));
        assert_eq!(filter.apply(&rows()).len(), 4);
    }

    #[test]
    fn test_missing_value_only_passes_all() {
        let mut missing = row("x", "Goa", "June", "2023-24");
        missing.details.legal_name = None;

        assert!(Gstr1Filter::new().matches(&missing));
        let filter = Gstr1Filter::new().with_legal_name(Selection::only(["ACME"]));
        assert!(!filter.matches(&missing));
    }

    #[test]
    fn test_distinct_values() {
        let all = rows();
        assert_eq!(
            distinct_values(&all, |r| r.details.state.as_deref()),
            vec!["Karnataka", "Maharashtra"]
        );
    }

    #[test]
    fn test_filter_choices() {
        let choices = filter_choices(&rows());
        let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["gstin", "state", "legal-name", "month", "year"]);
        assert_eq!(choices[1].1, vec!["Karnataka", "Maharashtra"]);
        assert_eq!(choices[2].1, Vec::<String>::new());
        assert_eq!(choices[4].1, vec!["2023-24", "2024-25"]);
    }
}
