//! Argument parsing shared by the command handlers.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use fintrack_domain::{Category, PaymentMethod, TimeFrame, TransactionKind};

use crate::cli::core::CommandError;

/// Positional arguments plus `--flag value` pairs and bare `--switch`es.
#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    flags: HashMap<String, &'a str>,
    switches: HashSet<String>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`; names listed in `switches` take no value.
    pub fn parse(args: &[&'a str], switches: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            let name = name.to_ascii_lowercase();
            if switches.contains(&name.as_str()) {
                parsed.switches.insert(name);
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| invalid(format!("flag `--{name}` needs a value")))?;
            parsed.flags.insert(name, value);
        }
        Ok(parsed)
    }

    pub fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags.get(name).copied()
    }

    pub fn switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn positional(&self, index: usize, what: &str) -> Result<&'a str, CommandError> {
        self.positional
            .get(index)
            .copied()
            .ok_or_else(|| invalid(format!("missing {what}")))
    }

    /// Positional arguments from `index` on, joined with spaces.
    pub fn rest(&self, index: usize) -> Option<String> {
        let rest = self.positional.get(index..)?;
        (!rest.is_empty()).then(|| rest.join(" "))
    }
}

pub fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

pub fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(invalid(format!("`{raw}` is not a positive amount"))),
    }
}

/// Accepts `YYYY-MM-DD` or `today`.
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("`{raw}` is not a date (expected YYYY-MM-DD)")))
}

/// Accepts `YYYY-MM` and returns the first day of that month.
pub fn parse_month(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| invalid(format!("`{raw}` is not a month (expected YYYY-MM)")))
}

pub fn parse_category(raw: &str) -> Result<Category, CommandError> {
    Category::lookup(raw).ok_or_else(|| {
        let known: Vec<&str> = Category::all().iter().map(|c| c.id()).collect();
        invalid(format!("unknown category `{raw}` (known: {})", known.join(", ")))
    })
}

pub fn parse_method(raw: &str) -> Result<PaymentMethod, CommandError> {
    PaymentMethod::lookup(raw).ok_or_else(|| {
        let known: Vec<&str> = PaymentMethod::all().iter().map(|m| m.id()).collect();
        invalid(format!("unknown payment method `{raw}` (known: {})", known.join(", ")))
    })
}

pub fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    TransactionKind::parse(raw).ok_or_else(|| invalid(format!("`{raw}` must be income or expense")))
}

pub fn parse_frame(raw: &str) -> Result<TimeFrame, CommandError> {
    TimeFrame::parse(raw).ok_or_else(|| invalid(format!("`{raw}` must be daily, weekly or monthly")))
}
