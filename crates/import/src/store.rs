use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessera_core::{ColumnMapping, FileAnalysis};

use crate::fingerprint::fingerprint_digest;

/// A mapping the user confirmed for some header shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMapping {
    pub mapping: ColumnMapping,
    /// The user allowed later files with this shape to skip review.
    pub auto_import: bool,
}

/// Remembers confirmed mappings by fingerprint.
pub trait MappingStore {
    fn lookup(&self, fingerprint: &str) -> Option<StoredMapping>;
    fn remember(&mut self, fingerprint: &str, stored: StoredMapping);
}

/// Process-local store keyed by fingerprint digest.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    entries: HashMap<String, StoredMapping>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MappingStore for InMemoryMappingStore {
    fn lookup(&self, fingerprint: &str) -> Option<StoredMapping> {
        self.entries.get(&fingerprint_digest(fingerprint)).cloned()
    }

    fn remember(&mut self, fingerprint: &str, stored: StoredMapping) {
        self.entries.insert(fingerprint_digest(fingerprint), stored);
    }
}

/// Marks `analysis` with what the store knows about its shape.
///
/// A stored mapping that no longer fits the header row is reported as found
/// but never allows auto-import.
pub fn apply_store<S: MappingStore + ?Sized>(
    analysis: FileAnalysis,
    store: &S,
) -> (FileAnalysis, Option<ColumnMapping>) {
    if analysis.headers.is_empty() {
        return (analysis, None);
    }
    match store.lookup(&analysis.fingerprint) {
        Some(stored) => {
            let fits = stored.mapping.validate_for(analysis.headers.len()).is_ok();
            tracing::debug!(
                "known header shape (auto_import={}, fits={})",
                stored.auto_import,
                fits
            );
            let analysis = analysis.with_rule_match(true, stored.auto_import && fits);
            (analysis, Some(stored.mapping))
        }
        None => (analysis.with_rule_match(false, false), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use tessera_core::{AmountColumns, ColumnIndex};

    const FILE: &str = "Date,Description,Amount\n01/02/2024,Coffee,3.50\n";

    fn confirmed(analysis: &FileAnalysis, auto_import: bool) -> StoredMapping {
        StoredMapping {
            mapping: ColumnMapping::from_analysis(analysis),
            auto_import,
        }
    }

    #[test]
    fn unknown_shape_is_not_found() {
        let store = InMemoryMappingStore::new();
        let analysis = Analyzer::default().analyze(FILE);
        let (analysis, mapping) = apply_store(analysis, &store);
        assert!(!analysis.mapping_found);
        assert!(!analysis.can_auto_import);
        assert!(mapping.is_none());
    }

    #[test]
    fn remembered_shape_enables_auto_import() {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze(FILE);
        let mut store = InMemoryMappingStore::new();
        store.remember(&first.fingerprint, confirmed(&first, true));
        assert_eq!(store.len(), 1);

        // Same headers in different case, different rows.
        let second = analyzer.analyze("DATE,DESCRIPTION,AMOUNT\n01/05/2024,Tea,2.10\n");
        let (second, mapping) = apply_store(second, &store);
        assert!(second.mapping_found);
        assert!(second.can_auto_import);
        assert_eq!(mapping.unwrap().date_col, Some(ColumnIndex(0)));
    }

    #[test]
    fn found_without_auto_import_still_needs_review() {
        let analysis = Analyzer::default().analyze(FILE);
        let mut store = InMemoryMappingStore::new();
        store.remember(&analysis.fingerprint, confirmed(&analysis, false));
        let (analysis, _) = apply_store(analysis, &store);
        assert!(analysis.mapping_found);
        assert!(!analysis.can_auto_import);
    }

    #[test]
    fn stale_mapping_never_auto_imports() {
        let analysis = Analyzer::default().analyze(FILE);
        let mut stored = confirmed(&analysis, true);
        stored.mapping.amounts = AmountColumns::Signed {
            amount: Some(ColumnIndex(7)),
        };
        let mut store = InMemoryMappingStore::new();
        store.remember(&analysis.fingerprint, stored);
        let (analysis, _) = apply_store(analysis, &store);
        assert!(analysis.mapping_found);
        assert!(!analysis.can_auto_import);
    }

    #[test]
    fn empty_file_never_matches() {
        let mut store = InMemoryMappingStore::new();
        let empty = Analyzer::default().analyze("");
        store.remember(&empty.fingerprint, confirmed(&empty, true));
        let (analysis, mapping) = apply_store(empty, &store);
        assert!(!analysis.mapping_found);
        assert!(mapping.is_none());
    }
}
