use tessera_core::{DateOrder, ProbedDialect, Suggestions};

use crate::util::re;

re!(re_not_numeric, r"[^0-9,.\-]");
re!(re_date_separator, r"[/.\-]");

/// Confidence reported when the sample carries no evidence either way.
pub const NO_EVIDENCE_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Comma decimal separator (also used by Brazilian exports).
    European,
    /// Dot decimal separator.
    Us,
}

/// Evidence gathered from the sample rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialectSignals {
    pub european: u32,
    pub us: u32,
    /// Some date started with a number that can only be a day.
    pub day_first_date: bool,
}

impl DialectSignals {
    pub fn add(&mut self, region: Region) {
        match region {
            Region::European => self.european = self.european.saturating_add(1),
            Region::Us => self.us = self.us.saturating_add(1),
        }
    }

    pub fn conclude(&self) -> ProbedDialect {
        let total = self.european.saturating_add(self.us);
        let is_european_format = self.european > self.us;
        let confidence = if total == 0 {
            NO_EVIDENCE_CONFIDENCE
        } else {
            self.european.max(self.us) as f32 / total as f32
        };
        let date_format = if self.day_first_date || is_european_format {
            DateOrder::DayFirst
        } else {
            DateOrder::MonthFirst
        };
        ProbedDialect::new(is_european_format, date_format, confidence)
    }
}

/// Reads the decimal convention off one amount cell.
///
/// With both separators present the last one is the decimal point. A lone
/// separator only counts when at most two digits follow it; otherwise it is
/// probably grouping thousands.
pub fn classify_amount(cell: &str) -> Option<Region> {
    let cleaned = re_not_numeric().replace_all(cell, "");
    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    match (last_comma, last_dot) {
        (Some(c), Some(d)) => Some(if c > d { Region::European } else { Region::Us }),
        (Some(c), None) => short_fraction(&cleaned[c + 1..]).then_some(Region::European),
        (None, Some(d)) => short_fraction(&cleaned[d + 1..]).then_some(Region::Us),
        (None, None) => None,
    }
}

fn short_fraction(tail: &str) -> bool {
    tail.chars().filter(char::is_ascii_digit).count() <= 2
}

/// Currency markers found in a cell, at most one per region.
pub fn classify_currency(cell: &str) -> (bool, bool) {
    let european = ["€", "EUR", "R$", "BRL"].iter().any(|m| cell.contains(m));
    let us = cell
        .match_indices('$')
        .any(|(i, _)| !cell[..i].ends_with('R'));
    (european, us)
}

/// True when the first date component is above 12 and at most 31.
pub fn is_day_first_date(cell: &str) -> bool {
    re_date_separator()
        .split(cell.trim())
        .next()
        .and_then(|token| token.trim().parse::<u32>().ok())
        .is_some_and(|n| n > 12 && n <= 31)
}

pub fn collect_signals(
    rows: &[Vec<String>],
    suggestions: &Suggestions,
    delimiter: char,
    semicolon_bias: u32,
) -> DialectSignals {
    let mut signals = DialectSignals::default();
    let amount_col = suggestions.amount_bearing();

    for row in rows {
        if let Some(region) = amount_col
            .and_then(|c| c.cell(row))
            .and_then(classify_amount)
        {
            signals.add(region);
        }

        for cell in row {
            let (european, us) = classify_currency(cell);
            if european {
                signals.add(Region::European);
            }
            if us {
                signals.add(Region::Us);
            }
        }

        if suggestions
            .date
            .and_then(|c| c.cell(row))
            .is_some_and(is_day_first_date)
        {
            signals.day_first_date = true;
        }
    }

    if delimiter == ';' {
        signals.european = signals.european.saturating_add(semicolon_bias);
    }

    tracing::trace!(
        "dialect signals: european={} us={} day_first_date={}",
        signals.european,
        signals.us,
        signals.day_first_date
    );
    signals
}

/// Decides decimal separator and date order for a sample window.
pub fn probe_dialect(
    rows: &[Vec<String>],
    suggestions: &Suggestions,
    delimiter: char,
    semicolon_bias: u32,
) -> ProbedDialect {
    collect_signals(rows, suggestions, delimiter, semicolon_bias).conclude()
}
