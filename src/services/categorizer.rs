//! Keyword categorizer
//!
//! Maps a transaction description to a category label using an ordered rule
//! table. First match wins; nothing matching yields the uncategorized label.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::models::{Ledger, Transaction};

/// A single `(keyword, category)` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Substring looked for in the description (case-insensitive)
    pub keyword: String,
    /// Category assigned on a match
    pub category: String,
}

impl CategoryRule {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
        }
    }
}

/// The rule table used when settings don't provide one
///
/// More specific phrases come before the generic ones they contain.
pub fn default_rules() -> Vec<CategoryRule> {
    [
        ("stipendio", "Salary"),
        ("emolumenti", "Salary"),
        ("pensione", "Pension"),
        ("bonifico a vostro favore", "Transfers In"),
        ("bonifico istantaneo a vostro favore", "Transfers In"),
        ("rimborso", "Refunds"),
        ("storno", "Refunds"),
        ("interessi", "Interest"),
        ("prelievo", "Cash Withdrawal"),
        ("bancomat", "Cash Withdrawal"),
        ("addebito diretto", "Utilities"),
        ("sdd", "Utilities"),
        ("enel", "Utilities"),
        ("canone", "Bank Fees"),
        ("commissioni", "Bank Fees"),
        ("imposta di bollo", "Taxes"),
        ("f24", "Taxes"),
        ("affitto", "Housing"),
        ("condominio", "Housing"),
        ("esselunga", "Groceries"),
        ("conad", "Groceries"),
        ("coop", "Groceries"),
        ("carrefour", "Groceries"),
        ("lidl", "Groceries"),
        ("ristorante", "Restaurants"),
        ("pizzeria", "Restaurants"),
        ("bar ", "Restaurants"),
        ("carburante", "Transport"),
        ("trenitalia", "Transport"),
        ("autostrade", "Transport"),
        ("farmacia", "Health"),
        ("amazon", "Shopping"),
        ("netflix", "Subscriptions"),
        ("spotify", "Subscriptions"),
        ("pagamento pos", "Card Payments"),
        ("pagamento visa", "Card Payments"),
        ("pagamento mastercard", "Card Payments"),
        ("bonifico", "Transfers Out"),
    ]
    .into_iter()
    .map(|(keyword, category)| CategoryRule::new(keyword, category))
    .collect()
}

/// Assigns categories by first-match keyword lookup
#[derive(Debug, Clone)]
pub struct Categorizer {
    /// Lowercased keyword with its category, in priority order
    rules: Vec<(String, String)>,
    uncategorized: String,
    use_bank_category: bool,
}

impl Categorizer {
    /// Create a categorizer from an ordered rule list
    pub fn new(rules: &[CategoryRule], uncategorized: impl Into<String>) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (r.keyword.to_lowercase(), r.category.clone()))
                .collect(),
            uncategorized: uncategorized.into(),
            use_bank_category: false,
        }
    }

    /// Create a categorizer configured from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.rules, settings.uncategorized_label.clone())
            .with_bank_category(settings.use_bank_category)
    }

    /// Fall back to the bank-supplied category when no rule matches
    pub fn with_bank_category(mut self, enabled: bool) -> Self {
        self.use_bank_category = enabled;
        self
    }

    /// Category of the first rule whose keyword appears in the description
    pub fn matching_rule(&self, description: &str) -> Option<&str> {
        let description = description.to_lowercase();
        self.rules
            .iter()
            .find(|(keyword, _)| description.contains(keyword.as_str()))
            .map(|(_, category)| category.as_str())
    }

    /// Pure description lookup; unmatched descriptions get the uncategorized label
    pub fn categorize(&self, description: &str) -> &str {
        self.matching_rule(description).unwrap_or(self.uncategorized.as_str())
    }

    /// Category for a transaction, honoring the bank-category fallback
    pub fn category_for(&self, txn: &Transaction) -> String {
        let bank = txn
            .bank_category
            .as_deref()
            .filter(|b| self.use_bank_category && !b.trim().is_empty());

        match (self.matching_rule(&txn.description), bank) {
            (None, Some(bank)) => bank.to_string(),
            _ => self.categorize(&txn.description).to_string(),
        }
    }

    /// Assign a category to every ledger transaction
    pub fn apply(&self, ledger: Ledger) -> Ledger {
        let categorized = ledger.map(|txn| {
            let category = self.category_for(&txn);
            txn.with_category(category)
        });

        let unmatched = categorized
            .iter()
            .filter(|t| t.category.as_deref() == Some(self.uncategorized.as_str()))
            .count();
        debug!(total = categorized.len(), unmatched, "categorized ledger");

        categorized
    }
}
