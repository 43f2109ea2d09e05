use serde::{Deserialize, Serialize};
use std::fmt;

use crate::column::{sentinel, ColumnIndex};

/// Order of the day and month fields in a statement's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateOrder {
    #[serde(rename = "DD/MM/YYYY")]
    DayFirst,
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthFirst,
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::DayFirst => write!(f, "DD/MM/YYYY"),
            DateOrder::MonthFirst => write!(f, "MM/DD/YYYY"),
        }
    }
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DD/MM/YYYY" | "DAY_FIRST" | "DMY" => Ok(DateOrder::DayFirst),
            "MM/DD/YYYY" | "MONTH_FIRST" | "MDY" => Ok(DateOrder::MonthFirst),
            other => Err(format!("Unknown date order: '{other}'")),
        }
    }
}

/// Regional conventions inferred from a file's sample rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbedDialect {
    /// Comma is the decimal separator.
    pub is_european_format: bool,
    pub date_format: DateOrder,
    /// Agreement of the observed signals (0.0–1.0, 0.5 when nothing was seen).
    pub confidence: f32,
}

impl ProbedDialect {
    pub fn new(is_european_format: bool, date_format: DateOrder, confidence: f32) -> Self {
        Self {
            is_european_format,
            date_format,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn is_low_confidence(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }
}

impl Default for ProbedDialect {
    fn default() -> Self {
        Self::new(false, DateOrder::MonthFirst, 0.5)
    }
}

/// Semantic role a column can play in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Description,
    Debit,
    Credit,
    Amount,
    Category,
}

impl Field {
    /// Matching priority used when a header could belong to several fields.
    pub const PRIORITY: [Field; 6] = [
        Field::Date,
        Field::Description,
        Field::Debit,
        Field::Credit,
        Field::Amount,
        Field::Category,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Date => write!(f, "date"),
            Field::Description => write!(f, "description"),
            Field::Debit => write!(f, "debit"),
            Field::Credit => write!(f, "credit"),
            Field::Amount => write!(f, "amount"),
            Field::Category => write!(f, "category"),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Field::Date),
            "description" | "desc" => Ok(Field::Description),
            "debit" => Ok(Field::Debit),
            "credit" => Ok(Field::Credit),
            "amount" => Ok(Field::Amount),
            "category" => Ok(Field::Category),
            other => Err(format!("Unknown field: '{other}'")),
        }
    }
}

/// Best-guess column per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    #[serde(rename = "dateCol", with = "sentinel")]
    pub date: Option<ColumnIndex>,
    #[serde(rename = "descCol", with = "sentinel")]
    pub description: Option<ColumnIndex>,
    #[serde(rename = "debitCol", with = "sentinel")]
    pub debit: Option<ColumnIndex>,
    #[serde(rename = "creditCol", with = "sentinel")]
    pub credit: Option<ColumnIndex>,
    #[serde(rename = "amountCol", with = "sentinel")]
    pub amount: Option<ColumnIndex>,
    #[serde(rename = "categoryCol", with = "sentinel")]
    pub category: Option<ColumnIndex>,
    pub is_double_entry: bool,
}

impl Suggestions {
    pub fn get(&self, field: Field) -> Option<ColumnIndex> {
        match field {
            Field::Date => self.date,
            Field::Description => self.description,
            Field::Debit => self.debit,
            Field::Credit => self.credit,
            Field::Amount => self.amount,
            Field::Category => self.category,
        }
    }

    /// Assigns `column` to `field` unless the field already has one.
    /// Returns whether the assignment happened.
    pub fn assign(&mut self, field: Field, column: ColumnIndex) -> bool {
        let slot = match field {
            Field::Date => &mut self.date,
            Field::Description => &mut self.description,
            Field::Debit => &mut self.debit,
            Field::Credit => &mut self.credit,
            Field::Amount => &mut self.amount,
            Field::Category => &mut self.category,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(column);
        true
    }

    /// Column whose values carry the amount: debit for double-entry files,
    /// the signed amount column otherwise.
    pub fn amount_bearing(&self) -> Option<ColumnIndex> {
        if self.is_double_entry {
            self.debit
        } else {
            self.amount
        }
    }
}

/// Shape of one uploaded file. Built once per file and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub delimiter: char,
    /// Raw line index of the header row; everything before it is skipped.
    pub skip_lines: usize,
    pub fingerprint: String,
    pub suggestions: Suggestions,
    pub probed_dialect: ProbedDialect,
    pub mapping_found: bool,
    pub can_auto_import: bool,
}

impl FileAnalysis {
    /// Copy of this analysis carrying the result of a rule-store lookup.
    pub fn with_rule_match(self, mapping_found: bool, can_auto_import: bool) -> Self {
        Self {
            mapping_found,
            can_auto_import: mapping_found && can_auto_import,
            ..self
        }
    }

    pub fn header(&self, column: ColumnIndex) -> Option<&str> {
        column.cell(&self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_is_first_wins() {
        let mut s = Suggestions::default();
        assert!(s.assign(Field::Date, ColumnIndex(0)));
        assert!(!s.assign(Field::Date, ColumnIndex(4)));
        assert_eq!(s.get(Field::Date), Some(ColumnIndex(0)));
    }

    #[test]
    fn amount_bearing_follows_layout() {
        let mut s = Suggestions {
            amount: Some(ColumnIndex(2)),
            debit: Some(ColumnIndex(3)),
            ..Default::default()
        };
        assert_eq!(s.amount_bearing(), Some(ColumnIndex(2)));
        s.is_double_entry = true;
        assert_eq!(s.amount_bearing(), Some(ColumnIndex(3)));
    }

    #[test]
    fn dialect_confidence_is_clamped() {
        assert_eq!(ProbedDialect::new(true, DateOrder::DayFirst, 1.7).confidence, 1.0);
        assert_eq!(ProbedDialect::new(true, DateOrder::DayFirst, -0.2).confidence, 0.0);
    }

    #[test]
    fn default_dialect_is_no_evidence() {
        let d = ProbedDialect::default();
        assert!(!d.is_european_format);
        assert_eq!(d.date_format, DateOrder::MonthFirst);
        assert_eq!(d.confidence, 0.5);
        assert!(d.is_low_confidence(0.7));
    }

    #[test]
    fn date_order_round_trips_through_strings() {
        for order in [DateOrder::DayFirst, DateOrder::MonthFirst] {
            assert_eq!(order.to_string().parse::<DateOrder>().unwrap(), order);
        }
        assert!("YYYY/MM/DD".parse::<DateOrder>().is_err());
    }

    #[test]
    fn suggestions_serialize_with_sentinels() {
        let s = Suggestions {
            date: Some(ColumnIndex(0)),
            description: Some(ColumnIndex(1)),
            ..Default::default()
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["dateCol"], 0);
        assert_eq!(v["descCol"], 1);
        assert_eq!(v["amountCol"], -1);
        assert_eq!(v["isDoubleEntry"], false);
    }

    #[test]
    fn rule_match_never_auto_imports_unknown_shapes() {
        let analysis = FileAnalysis {
            headers: vec![],
            sample_rows: vec![],
            delimiter: ',',
            skip_lines: 0,
            fingerprint: String::new(),
            suggestions: Suggestions::default(),
            probed_dialect: ProbedDialect::default(),
            mapping_found: false,
            can_auto_import: false,
        };
        let matched = analysis.with_rule_match(false, true);
        assert!(!matched.can_auto_import);
    }
}
