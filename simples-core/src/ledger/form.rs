//! Raw add-month input and its validation.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Annex, MonthEntry};

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{4}$").expect("month/year pattern is valid")
});

/// Every problem found in a submitted form, one message per field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid amount '{0}'")]
pub struct InvalidAmount(pub String);

/// Returns `true` for `MM/YYYY` with a month between 01 and 12.
pub fn validate_month_year(value: &str) -> bool {
    MONTH_YEAR.is_match(value.trim())
}

/// Normalizes the separators in an amount so it parses as a plain decimal.
///
/// - both `.` and `,` present: the last one is the decimal separator
///   (`1.234,56` and `1,234.56`)
/// - only `,`: a single comma not followed by exactly three digits is the
///   decimal separator (`10,5`), otherwise commas group thousands (`1,234`)
/// - only `.`: the same rule as a lone comma, so `1.500` is fifteen hundred
///   and `1.5` is one and a half
fn normalize_amount(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(position), None) => single_separator(&cleaned, ',', position),
        (None, Some(position)) => single_separator(&cleaned, '.', position),
        (None, None) => cleaned,
    }
}

/// Resolves an amount that uses only one kind of separator. A single
/// occurrence not followed by exactly three digits marks the decimals;
/// anything else groups thousands.
fn single_separator(cleaned: &str, separator: char, last: usize) -> String {
    let decimals = cleaned.len() - last - 1;
    if cleaned.matches(separator).count() == 1 && decimals != 3 {
        cleaned.replace(separator, ".")
    } else {
        cleaned.replace(separator, "")
    }
}

/// Parses a user-entered amount.
///
/// Accepts an optional `R$` prefix and either separator convention.
/// Empty or whitespace-only input is treated as 0.
pub fn parse_amount(s: &str) -> Result<Decimal, InvalidAmount> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        InvalidAmount(s.to_string())
    })
}

/// Text the user typed into the add-month form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthForm {
    pub month_year: String,
    pub revenue_without_tax_substitution: String,
    pub revenue_with_tax_substitution: String,
    pub annex: Annex,
}

impl MonthForm {
    /// Checks every field and builds the entry the form describes.
    ///
    /// Rules:
    /// - month/year must be `MM/YYYY`
    /// - both revenues must parse and be non-negative (empty means 0)
    pub fn validate(&self) -> Result<MonthEntry, ValidationError> {
        let mut messages = Vec::new();

        if !validate_month_year(&self.month_year) {
            messages.push(format!(
                "Month/year '{}' must use the MM/YYYY format",
                self.month_year.trim()
            ));
        }

        let without = Self::parse_revenue(
            "Revenue without tax substitution",
            &self.revenue_without_tax_substitution,
            &mut messages,
        );
        let with = Self::parse_revenue(
            "Revenue with tax substitution",
            &self.revenue_with_tax_substitution,
            &mut messages,
        );

        match (without, with) {
            (Some(without), Some(with)) if messages.is_empty() => Ok(MonthEntry::new(
                self.month_year.trim(),
                without,
                with,
                self.annex,
            )),
            _ => Err(ValidationError { messages }),
        }
    }

    /// Validates, and on success resets the form. On failure the form is
    /// left as typed so the user can correct it.
    pub fn submit(&mut self) -> Result<MonthEntry, ValidationError> {
        let entry = self.validate()?;
        self.clear();
        Ok(entry)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn parse_revenue(
        field: &str,
        value: &str,
        messages: &mut Vec<String>,
    ) -> Option<Decimal> {
        match parse_amount(value) {
            Ok(amount) if amount < Decimal::ZERO => {
                messages.push(format!("{field} cannot be negative"));
                None
            }
            Ok(amount) if amount > MonthEntry::MAX_REVENUE => {
                messages.push(format!(
                    "{field} cannot exceed {}",
                    MonthEntry::MAX_REVENUE
                ));
                None
            }
            Ok(amount) => Some(amount),
            Err(_) => {
                messages.push(format!("{field} must be a valid number"));
                None
            }
        }
    }
}
