use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{DateOrder, FileAnalysis};
use crate::column::{sentinel, ColumnIndex};

/// Where the money lives in a statement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One signed amount column.
    Signed { amount: Option<ColumnIndex> },
    /// Separate debit and credit columns.
    DoubleEntry {
        debit: Option<ColumnIndex>,
        credit: Option<ColumnIndex>,
    },
}

impl AmountColumns {
    pub fn is_double_entry(&self) -> bool {
        matches!(self, AmountColumns::DoubleEntry { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing date column")]
    MissingDateColumn,
    #[error("Missing description column")]
    MissingDescriptionColumn,
    #[error("Date and description both use column {0}")]
    DateEqualsDescription(ColumnIndex),
    #[error("Missing amount column")]
    MissingAmountColumn,
    #[error("Missing debit column")]
    MissingDebitColumn,
    #[error("Missing credit column")]
    MissingCreditColumn,
    #[error("Column {column} is out of range for {len} headers")]
    ColumnOutOfRange { column: ColumnIndex, len: usize },
}

/// User-confirmed mapping handed to import execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireMapping", from = "WireMapping")]
pub struct ColumnMapping {
    pub date_col: Option<ColumnIndex>,
    pub desc_col: Option<ColumnIndex>,
    pub amounts: AmountColumns,
    pub category_col: Option<ColumnIndex>,
    pub is_european_format: bool,
    pub date_format: DateOrder,
}

impl ColumnMapping {
    /// Seeds a mapping from an analysis' suggestions and probed dialect.
    pub fn from_analysis(analysis: &FileAnalysis) -> Self {
        let s = &analysis.suggestions;
        let amounts = if s.is_double_entry {
            AmountColumns::DoubleEntry {
                debit: s.debit,
                credit: s.credit,
            }
        } else {
            AmountColumns::Signed { amount: s.amount }
        };
        Self {
            date_col: s.date,
            desc_col: s.description,
            amounts,
            category_col: s.category,
            is_european_format: analysis.probed_dialect.is_european_format,
            date_format: analysis.probed_dialect.date_format,
        }
    }

    pub fn is_double_entry(&self) -> bool {
        self.amounts.is_double_entry()
    }

    /// Switches the amount layout. Columns belonging to the old layout are
    /// dropped; setting the current layout again changes nothing.
    pub fn set_double_entry(&mut self, double_entry: bool) {
        if double_entry == self.is_double_entry() {
            return;
        }
        self.amounts = if double_entry {
            AmountColumns::DoubleEntry {
                debit: None,
                credit: None,
            }
        } else {
            AmountColumns::Signed { amount: None }
        };
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        let date = self.date_col.ok_or(MappingError::MissingDateColumn)?;
        let desc = self.desc_col.ok_or(MappingError::MissingDescriptionColumn)?;
        if date == desc {
            return Err(MappingError::DateEqualsDescription(date));
        }
        match self.amounts {
            AmountColumns::Signed { amount: None } => Err(MappingError::MissingAmountColumn),
            AmountColumns::DoubleEntry { debit: None, .. } => Err(MappingError::MissingDebitColumn),
            AmountColumns::DoubleEntry { credit: None, .. } => {
                Err(MappingError::MissingCreditColumn)
            }
            _ => Ok(()),
        }
    }

    /// Like [`validate`](Self::validate), and also rejects columns past the
    /// end of a header row of `len` columns.
    pub fn validate_for(&self, len: usize) -> Result<(), MappingError> {
        self.validate()?;
        match self.columns().find(|c| c.get() >= len) {
            Some(column) => Err(MappingError::ColumnOutOfRange { column, len }),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Every column index currently set on the mapping.
    pub fn columns(&self) -> impl Iterator<Item = ColumnIndex> {
        let (amount, debit, credit) = match self.amounts {
            AmountColumns::Signed { amount } => (amount, None, None),
            AmountColumns::DoubleEntry { debit, credit } => (None, debit, credit),
        };
        [
            self.date_col,
            self.desc_col,
            amount,
            debit,
            credit,
            self.category_col,
        ]
        .into_iter()
        .flatten()
    }
}

/// Flat representation used at the serialization boundary.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMapping {
    #[serde(with = "sentinel")]
    date_col: Option<ColumnIndex>,
    #[serde(with = "sentinel")]
    desc_col: Option<ColumnIndex>,
    #[serde(with = "sentinel", default)]
    amount_col: Option<ColumnIndex>,
    #[serde(with = "sentinel", default)]
    debit_col: Option<ColumnIndex>,
    #[serde(with = "sentinel", default)]
    credit_col: Option<ColumnIndex>,
    #[serde(with = "sentinel", default)]
    category_col: Option<ColumnIndex>,
    is_double_entry: bool,
    is_european_format: bool,
    date_format: DateOrder,
}

impl From<ColumnMapping> for WireMapping {
    fn from(m: ColumnMapping) -> Self {
        let (amount_col, debit_col, credit_col) = match m.amounts {
            AmountColumns::Signed { amount } => (amount, None, None),
            AmountColumns::DoubleEntry { debit, credit } => (None, debit, credit),
        };
        Self {
            date_col: m.date_col,
            desc_col: m.desc_col,
            amount_col,
            debit_col,
            credit_col,
            category_col: m.category_col,
            is_double_entry: m.amounts.is_double_entry(),
            is_european_format: m.is_european_format,
            date_format: m.date_format,
        }
    }
}

impl From<WireMapping> for ColumnMapping {
    fn from(w: WireMapping) -> Self {
        let amounts = if w.is_double_entry {
            AmountColumns::DoubleEntry {
                debit: w.debit_col,
                credit: w.credit_col,
            }
        } else {
            AmountColumns::Signed {
                amount: w.amount_col,
            }
        };
        Self {
            date_col: w.date_col,
            desc_col: w.desc_col,
            amounts,
            category_col: w.category_col,
            is_european_format: w.is_european_format,
            date_format: w.date_format,
        }
    }
}
