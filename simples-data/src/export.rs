//! Spreadsheet export of a computed ledger.
//!
//! Amounts are written in Brazilian notation (`R$ 1.234,56`) and rates as
//! percentages (`5,30%`), both rounded half away from zero to two places.
//! Every field is quoted and rows end with `\n`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use simples_core::ComputedMonth;
use simples_core::calculations::common::round_half_up;
use thiserror::Error;
use tracing::{debug, info};

/// Column headers, in output order.
pub const EXPORT_HEADERS: [&str; 15] = [
    "Mês/Ano",
    "Receita sem ST",
    "Receita com ST",
    "Anexo",
    "Receita Total",
    "Acumulado",
    "RBT12",
    "Média 12 meses",
    "Disponível Limite Mensal",
    "Disponível Limite Anual",
    "Alíquota Efetiva",
    "% ICMS",
    "Imposto sem ST",
    "Imposto com ST",
    "Imposto Total",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid currency value '{0}'")]
    InvalidCurrency(String),

    #[error("Invalid percentage value '{0}'")]
    InvalidPercentage(String),

    #[error("Unexpected export header: {0:?}")]
    UnexpectedHeaders(Vec<String>),
}

/// Formats a number as `1.234,56`, sign first.
fn format_decimal_br(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{}", sign, with_separators, decimal_part)
}

/// Parses `1.234,56` (optionally signed) back into a decimal.
fn parse_decimal_br(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<Decimal>().ok()
}

/// `R$ 1.234,56`; negatives as `R$ -1.234,56`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use simples_data::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.565)), "R$ 1.234,57");
/// assert_eq!(format_currency(dec!(-80)), "R$ -80,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value))
}

/// A fractional rate as a percentage: `0.053` becomes `5,30%`.
pub fn format_percentage(rate: Decimal) -> String {
    format!("{}%", format_decimal_br(rate * Decimal::ONE_HUNDRED))
}

/// Inverse of [`format_currency`].
pub fn parse_brl_currency(s: &str) -> Result<Decimal, ExportError> {
    let body = s.trim();
    let body = body.strip_prefix("R$").unwrap_or(body);
    parse_decimal_br(body).ok_or_else(|| ExportError::InvalidCurrency(s.to_string()))
}

/// Inverse of [`format_percentage`]; returns the fraction.
pub fn parse_percentage(s: &str) -> Result<Decimal, ExportError> {
    s.trim()
        .strip_suffix('%')
        .and_then(parse_decimal_br)
        .map(|percent| percent / Decimal::ONE_HUNDRED)
        .ok_or_else(|| ExportError::InvalidPercentage(s.to_string()))
}

/// Formatted cells for one computed month, in [`EXPORT_HEADERS`] order.
pub fn export_row(month: &ComputedMonth) -> Vec<String> {
    vec![
        month.entry.month_year.clone(),
        format_currency(month.entry.revenue_without_tax_substitution),
        format_currency(month.entry.revenue_with_tax_substitution),
        month.entry.annex.label().to_string(),
        format_currency(month.total_revenue),
        format_currency(month.cumulative_revenue),
        format_currency(month.trailing_12_month_revenue),
        format_currency(month.trailing_12_month_average),
        format_currency(month.available_under_monthly_cap),
        format_currency(month.available_under_annual_cap),
        format_percentage(month.effective_rate),
        format_percentage(month.icms_share_percent),
        format_currency(month.tax_without_substitution),
        format_currency(month.tax_with_substitution),
        format_currency(month.total_tax_due),
    ]
}

/// Renders the header and one row per month. No terminator follows the last
/// row.
pub fn export_csv(months: &[ComputedMonth]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for month in months {
        writer.write_record(export_row(month))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    let mut document = String::from_utf8(bytes)?;
    if document.ends_with('\n') {
        document.pop();
    }

    debug!(rows = months.len(), bytes = document.len(), "ledger exported");
    Ok(document)
}

/// `simples-nacional-YYYYMMDD-HHMMSS.csv`
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("simples-nacional-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

/// Writes the export into `dir` under [`export_file_name`] and returns the
/// path written.
pub fn write_export_file(
    dir: &Path,
    months: &[ComputedMonth],
    at: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(at));
    std::fs::write(&path, export_csv(months)?)?;
    info!(path = %path.display(), rows = months.len(), "export written");
    Ok(path)
}

/// An export read back as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads a document produced by [`export_csv`].
pub fn parse_export(document: &str) -> Result<ExportDocument, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(document.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers != EXPORT_HEADERS {
        return Err(ExportError::UnexpectedHeaders(headers));
    }

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

    Ok(ExportDocument { headers, rows })
}
