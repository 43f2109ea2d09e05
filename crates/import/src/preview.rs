use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tessera_core::{AmountColumns, ColumnIndex, ColumnMapping, DateOrder, FileAnalysis, Money};

use crate::util::re;

re!(re_amount_noise, r"[^0-9,.\-()]");

/// One sample row read through a mapping, for the review screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
}

/// Reads the sample window with `mapping`'s columns and dialect. Cells that
/// do not parse are left empty rather than failing the preview.
pub fn preview(analysis: &FileAnalysis, mapping: &ColumnMapping) -> Vec<PreviewRow> {
    analysis
        .sample_rows
        .iter()
        .map(|row| preview_row(row, mapping))
        .collect()
}

fn preview_row(row: &[String], mapping: &ColumnMapping) -> PreviewRow {
    let text = |col: Option<ColumnIndex>| {
        col.and_then(|c| c.cell(row))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let money = |col: Option<ColumnIndex>| {
        col.and_then(|c| c.cell(row))
            .and_then(|s| parse_amount(s, mapping.is_european_format))
    };

    let amount = match mapping.amounts {
        AmountColumns::Signed { amount } => money(amount),
        AmountColumns::DoubleEntry { debit, credit } => match (money(debit), money(credit)) {
            (Some(d), None) => Some(d),
            (None, Some(c)) => Some(-c),
            (Some(d), Some(c)) => d.checked_sub(c),
            (None, None) => None,
        },
    };

    PreviewRow {
        date: mapping
            .date_col
            .and_then(|c| c.cell(row))
            .and_then(|s| parse_date(s, mapping.date_format)),
        description: text(mapping.desc_col),
        amount,
        category: text(mapping.category_col),
    }
}

/// Parses an amount written in the given decimal convention. Accepts
/// currency symbols, a leading or trailing minus and accounting parentheses.
pub fn parse_amount(s: &str, european: bool) -> Option<Money> {
    let cleaned = re_amount_noise().replace_all(s.trim(), "");
    let mut digits: &str = &cleaned;
    let mut negative = false;

    if let Some(inner) = digits.strip_prefix('(').and_then(|d| d.strip_suffix(')')) {
        negative = true;
        digits = inner;
    }
    if let Some(rest) = digits.strip_suffix('-') {
        negative = !negative;
        digits = rest;
    }
    if let Some(rest) = digits.strip_prefix('-') {
        negative = !negative;
        digits = rest;
    }
    if digits.is_empty() {
        return None;
    }

    let normalized = if european {
        digits.replace('.', "").replace(',', ".")
    } else {
        digits.replace(',', "")
    };
    let mut dec = Decimal::from_str(&normalized).ok()?;
    if negative {
        dec = -dec;
    }
    Some(Money::from_decimal(dec))
}

/// Parses a date whose day and month follow `order`. ISO dates are always
/// accepted; a trailing time component is ignored.
pub fn parse_date(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = s.split_whitespace().next()?;
    let formats: &[&str] = match order {
        DateOrder::DayFirst => &[
            "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d",
        ],
        DateOrder::MonthFirst => &[
            "%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%m.%d.%y", "%m.%d.%Y", "%Y-%m-%d",
        ],
    };
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
