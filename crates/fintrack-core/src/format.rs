use chrono::NaiveDate;

use fintrack_domain::Settings;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;

    /// Formats with an explicit sign, income positive and expense negative.
    fn format_signed(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}", self.format_amount(amount.abs()))
        } else {
            format!("+{}", self.format_amount(amount))
        }
    }
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Prefixes amounts with a currency symbol and two decimals.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    symbol: String,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.currency.clone())
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol, amount)
    }
}

/// `strftime`-pattern date formatter, ISO by default.
#[derive(Debug, Clone)]
pub struct PatternDateFormatter {
    pattern: String,
}

impl PatternDateFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Default for PatternDateFormatter {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

impl DateFormatter for PatternDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.pattern).to_string()
    }
}
