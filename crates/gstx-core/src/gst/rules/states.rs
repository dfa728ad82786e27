//! GST state code lookup.
//!
//! The first two characters of a GSTIN identify the issuing state or
//! territory.

/// Name returned for codes outside the table.
pub const UNKNOWN_STATE: &str = "Unknown";

/// State codes as assigned by the GST Network.
pub static GST_STATE_CODES: [(&str, &str); 38] = [
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("26", "Dadra and Nagar Haveli and Daman and Diu"),
    ("27", "Maharashtra"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("38", "Ladakh"),
    ("97", "Other Territory"),
    ("99", "Centre Jurisdiction"),
];

/// Resolve a two-character state code to its name.
pub fn resolve_state(code: &str) -> &'static str {
    GST_STATE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_STATE)
}

/// Resolve the state encoded in the first two characters of a GSTIN.
pub fn state_for_gstin(gstin: &str) -> &'static str {
    gstin.get(..2).map_or(UNKNOWN_STATE, resolve_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_state() {
        assert_eq!(resolve_state("27"), "Maharashtra");
        assert_eq!(resolve_state("99"), "Centre Jurisdiction");
        assert_eq!(resolve_state("00"), "Unknown");
        assert_eq!(resolve_state("25"), "Unknown");
    }

    #[test]
    fn test_state_for_gstin() {
        assert_eq!(state_for_gstin("29AABCU9603R1ZM"), "Karnataka");
        assert_eq!(state_for_gstin("2"), "Unknown");
        assert_eq!(state_for_gstin(""), "Unknown");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = GST_STATE_CODES.iter().map(|(c, _)| *c).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), GST_STATE_CODES.len());
    }
}
