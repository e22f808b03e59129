//! Fixed reference tables for categories and payment methods.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a category collects income or spending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "Expense",
            CategoryKind::Income => "Income",
        };
        f.write_str(label)
    }
}

/// Closed set of transaction categories.
///
/// Serialised as its string id (`"food"`, `"travel"`, ...). Ids outside the
/// table deserialise to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Category {
    Food,
    Shopping,
    Transport,
    Entertainment,
    Utilities,
    Health,
    Housing,
    Education,
    Personal,
    Travel,
    Income,
    Savings,
    Other,
}

const ALL_CATEGORIES: [Category; 13] = [
    Category::Food,
    Category::Shopping,
    Category::Transport,
    Category::Entertainment,
    Category::Utilities,
    Category::Health,
    Category::Housing,
    Category::Education,
    Category::Personal,
    Category::Travel,
    Category::Income,
    Category::Savings,
    Category::Other,
];

impl Category {
    /// The full reference table in display order.
    pub fn all() -> &'static [Category] {
        &ALL_CATEGORIES
    }

    pub fn id(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Utilities => "utilities",
            Category::Health => "health",
            Category::Housing => "housing",
            Category::Education => "education",
            Category::Personal => "personal",
            Category::Travel => "travel",
            Category::Income => "income",
            Category::Savings => "savings",
            Category::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Shopping => "Shopping",
            Category::Transport => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Bills & Utilities",
            Category::Health => "Health & Medical",
            Category::Housing => "Housing",
            Category::Education => "Education",
            Category::Personal => "Personal Care",
            Category::Travel => "Travel",
            Category::Income => "Income",
            Category::Savings => "Savings",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Food => "restaurant",
            Category::Shopping => "shopping_bag",
            Category::Transport => "directions_car",
            Category::Entertainment => "sports_esports",
            Category::Utilities => "receipt",
            Category::Health => "local_hospital",
            Category::Housing => "home",
            Category::Education => "school",
            Category::Personal => "spa",
            Category::Travel => "flight",
            Category::Income => "attach_money",
            Category::Savings => "savings",
            Category::Other => "category",
        }
    }

    pub fn kind(self) -> CategoryKind {
        match self {
            Category::Income => CategoryKind::Income,
            _ => CategoryKind::Expense,
        }
    }

    /// Looks up a category by id, returning `None` for ids outside the table.
    pub fn lookup(id: &str) -> Option<Self> {
        let needle = id.trim();
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|category| category.id().eq_ignore_ascii_case(needle))
    }

    /// Looks up a category by id, falling back to [`Category::Other`].
    pub fn from_id(id: &str) -> Self {
        Self::lookup(id).unwrap_or(Category::Other)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_id(&value)
    }
}

impl From<Category> for &'static str {
    fn from(value: Category) -> Self {
        value.id()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Closed set of payment methods a transaction may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Check,
    Other,
}

const ALL_PAYMENT_METHODS: [PaymentMethod; 7] = [
    PaymentMethod::Cash,
    PaymentMethod::CreditCard,
    PaymentMethod::DebitCard,
    PaymentMethod::BankTransfer,
    PaymentMethod::DigitalWallet,
    PaymentMethod::Check,
    PaymentMethod::Other,
];

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &ALL_PAYMENT_METHODS
    }

    pub fn id(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::DigitalWallet => "digital_wallet",
            PaymentMethod::Check => "check",
            PaymentMethod::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::DigitalWallet => "Digital Wallet",
            PaymentMethod::Check => "Check",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "payments",
            PaymentMethod::CreditCard | PaymentMethod::DebitCard => "credit_card",
            PaymentMethod::BankTransfer => "account_balance",
            PaymentMethod::DigitalWallet => "account_balance_wallet",
            PaymentMethod::Check => "money",
            PaymentMethod::Other => "more_horiz",
        }
    }

    pub fn lookup(id: &str) -> Option<Self> {
        let needle = id.trim();
        ALL_PAYMENT_METHODS
            .iter()
            .copied()
            .find(|method| method.id().eq_ignore_ascii_case(needle))
    }

    pub fn from_id(id: &str) -> Self {
        Self::lookup(id).unwrap_or(PaymentMethod::Other)
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        PaymentMethod::from_id(&value)
    }
}

impl From<PaymentMethod> for &'static str {
    fn from(value: PaymentMethod) -> Self {
        value.id()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_ids_fall_back_to_other() {
        assert_eq!(Category::from_id("salary"), Category::Other);
        assert_eq!(Category::lookup("salary"), None);
        assert_eq!(Category::from_id("FOOD"), Category::Food);
    }

    #[test]
    fn category_serializes_as_id() {
        let json = serde_json::to_string(&Category::Utilities).unwrap();
        assert_eq!(json, "\"utilities\"");
        let parsed: Category = serde_json::from_str("\"travel\"").unwrap();
        assert_eq!(parsed, Category::Travel);
        let fallback: Category = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(fallback, Category::Other);
    }

    #[test]
    fn only_income_category_has_income_kind() {
        let income: Vec<_> = Category::all()
            .iter()
            .filter(|category| category.kind() == CategoryKind::Income)
            .collect();
        assert_eq!(income, vec![&Category::Income]);
    }

    #[test]
    fn payment_method_ids_round_trip() {
        for method in PaymentMethod::all() {
            assert_eq!(PaymentMethod::from_id(method.id()), *method);
        }
        assert_eq!(PaymentMethod::from_id("barter"), PaymentMethod::Other);
    }
}
