pub mod analyze;
pub mod config;
pub mod delimiter;
pub mod dialect;
pub mod fingerprint;
pub mod flow;
pub mod header;
pub mod locale;
pub mod preview;
pub mod store;
pub mod suggest;
pub(crate) mod util;

pub use analyze::Analyzer;
pub use config::{AnalyzerConfig, ConfigError};
pub use delimiter::{detect_delimiter, DelimiterGuess};
pub use dialect::{probe_dialect, DialectSignals, Region};
pub use fingerprint::{fingerprint, fingerprint_digest};
pub use flow::{FlowError, FlowState, ReviewFlow};
pub use header::{locate_header, HeaderRow};
pub use locale::{FieldRule, LocalePack};
pub use preview::{preview, PreviewRow};
pub use store::{apply_store, InMemoryMappingStore, MappingStore, StoredMapping};
pub use suggest::suggest_columns;

pub mod inference {
    use crate::*;
    use tessera_core::FileAnalysis;

    /// Analyzes `text` with the default limits and built-in vocabulary.
    pub fn analyze(text: &str) -> FileAnalysis {
        Analyzer::default().analyze(text)
    }

    pub fn analyze_with_config(text: &str, config: AnalyzerConfig) -> FileAnalysis {
        Analyzer::new(config).analyze(text)
    }

    /// Analyzes `text` and marks it with what `store` remembers about its shape.
    pub fn analyze_with_store<S: MappingStore + ?Sized>(
        text: &str,
        store: &S,
    ) -> (FileAnalysis, Option<tessera_core::ColumnMapping>) {
        apply_store(analyze(text), store)
    }
}
