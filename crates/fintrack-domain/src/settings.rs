use serde::{Deserialize, Serialize};

use crate::category::PaymentMethod;

/// User-facing preferences stored next to the financial data.
///
/// Missing fields take their defaults when deserialised, so partially written
/// settings documents merge over the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub language: String,
    pub dark_mode: bool,
    pub currency: String,
    pub reminder_enabled: bool,
    pub cloud_sync_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_payment_method: Option<PaymentMethod>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "en".into(),
            dark_mode: false,
            currency: "$".into(),
            reminder_enabled: false,
            cloud_sync_enabled: false,
            default_payment_method: None,
        }
    }
}

impl Settings {
    /// Sets a field from its textual key, returning `false` for unknown keys or values.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key.trim().to_ascii_lowercase().as_str() {
            "language" => self.language = value.trim().to_string(),
            "currency" => self.currency = value.trim().to_string(),
            "dark_mode" | "darkmode" => match parse_flag(value) {
                Some(flag) => self.dark_mode = flag,
                None => return false,
            },
            "reminder_enabled" | "reminders" => match parse_flag(value) {
                Some(flag) => self.reminder_enabled = flag,
                None => return false,
            },
            "cloud_sync_enabled" | "cloud_sync" => match parse_flag(value) {
                Some(flag) => self.cloud_sync_enabled = flag,
                None => return false,
            },
            "default_payment_method" | "payment_method" => {
                self.default_payment_method = match value.trim() {
                    "" | "none" => None,
                    other => Some(PaymentMethod::lookup(other).unwrap_or(PaymentMethod::Other)),
                }
            }
            _ => return false,
        }
        true
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
