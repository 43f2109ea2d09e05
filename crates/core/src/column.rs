use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based position of a column within a file's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnIndex(pub usize);

impl ColumnIndex {
    pub fn get(self) -> usize {
        self.0
    }

    /// Cell at this position in a split row, if the row is long enough.
    pub fn cell<'a>(self, row: &'a [String]) -> Option<&'a str> {
        row.get(self.0).map(String::as_str)
    }
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ColumnIndex {
    fn from(value: usize) -> Self {
        ColumnIndex(value)
    }
}

/// Wire value for an unset column.
pub const NOT_FOUND: i64 = -1;

pub fn to_sentinel(column: Option<ColumnIndex>) -> i64 {
    column.map_or(NOT_FOUND, |c| c.0 as i64)
}

/// Any negative value reads back as "not found".
pub fn from_sentinel(raw: i64) -> Option<ColumnIndex> {
    usize::try_from(raw).ok().map(ColumnIndex)
}

/// `#[serde(with = "sentinel")]` adapter that writes `Option<ColumnIndex>` as
/// a plain integer, `-1` meaning absent.
pub mod sentinel {
    use super::{from_sentinel, to_sentinel, ColumnIndex};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<ColumnIndex>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(to_sentinel(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ColumnIndex>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(from_sentinel(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Holder {
        #[serde(with = "sentinel")]
        col: Option<ColumnIndex>,
    }

    #[test]
    fn absent_column_writes_minus_one() {
        let json = serde_json::to_string(&Holder { col: None }).unwrap();
        assert_eq!(json, r#"{"col":-1}"#);
    }

    #[test]
    fn present_column_writes_position() {
        let json = serde_json::to_string(&Holder { col: Some(ColumnIndex(3)) }).unwrap();
        assert_eq!(json, r#"{"col":3}"#);
    }

    #[test]
    fn any_negative_reads_as_absent() {
        let h: Holder = serde_json::from_str(r#"{"col":-7}"#).unwrap();
        assert_eq!(h.col, None);
        let h: Holder = serde_json::from_str(r#"{"col":2}"#).unwrap();
        assert_eq!(h.col, Some(ColumnIndex(2)));
    }

    #[test]
    fn cell_lookup_is_bounds_checked() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(ColumnIndex(1).cell(&row), Some("b"));
        assert_eq!(ColumnIndex(2).cell(&row), None);
    }
}
