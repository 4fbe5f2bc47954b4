//! Currency allow-list for invoicing.

/// Static mapping of currency code to display symbol.
///
/// Built once at startup and shared through application state; both input
/// validation and invoice stamping read from this single table. The symbol is
/// always derived from the code here, never taken from the caller.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    entries: Vec<(&'static str, &'static str)>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            entries: vec![("USD", "$"), ("INR", "\u{20b9}"), ("EUR", "\u{20ac}"), ("GBP", "\u{a3}")],
        }
    }
}

impl CurrencyTable {
    /// Look up the display symbol for a currency code.
    pub fn symbol_for(&self, code: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, symbol)| *symbol)
    }

    /// Whether the code is on the allow-list.
    pub fn is_allowed(&self, code: &str) -> bool {
        self.symbol_for(code).is_some()
    }

    /// Allowed codes, for error messages.
    pub fn codes(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_symbols() {
        let table = CurrencyTable::default();
        assert_eq!(table.symbol_for("USD"), Some("$"));
        assert_eq!(table.symbol_for("EUR"), Some("€"));
        assert_eq!(table.symbol_for("INR"), Some("₹"));
        assert_eq!(table.symbol_for("GBP"), Some("£"));
    }

    #[test]
    fn unknown_code_is_rejected() {
        let table = CurrencyTable::default();
        assert!(!table.is_allowed("XYZ"));
        assert_eq!(table.symbol_for("XYZ"), None);
    }
}
