use tessera_core::{ColumnIndex, Suggestions};

use crate::locale::LocalePack;

/// Suggests a column per field by scanning headers left to right.
///
/// Each header goes to the first rule in the pack that matches it. A field
/// keeps the first column it was given; a later header claimed by an
/// already-assigned field stays unassigned.
pub fn suggest_columns(headers: &[String], pack: &LocalePack) -> Suggestions {
    let mut suggestions = Suggestions::default();

    for (i, header) in headers.iter().enumerate() {
        let Some(field) = pack.classify(header) else {
            continue;
        };
        if !suggestions.assign(field, ColumnIndex(i)) {
            tracing::trace!("header {i} ({header:?}) matches {field}, already assigned");
        }
    }

    suggestions.is_double_entry = suggestions.debit.is_some() && suggestions.credit.is_some();
    suggestions
}
