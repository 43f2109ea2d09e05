use tessera_core::FileAnalysis;

use crate::config::AnalyzerConfig;
use crate::delimiter::detect_in_text;
use crate::dialect::probe_dialect;
use crate::fingerprint::fingerprint;
use crate::header::locate_header;
use crate::locale::LocalePack;
use crate::suggest::suggest_columns;

/// Runs the whole inference pipeline over the decoded text of one file.
///
/// The analyzer never fails: degenerate input produces empty headers, a comma
/// delimiter and a no-evidence dialect.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    pack: LocalePack,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let pack = config.locale_pack();
        Self { config, pack }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn locale(&self) -> &LocalePack {
        &self.pack
    }

    pub fn analyze(&self, text: &str) -> FileAnalysis {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let guess = detect_in_text(text);
        tracing::debug!(
            "delimiter {:?} ({} occurrences in first line)",
            guess.delimiter,
            guess.count
        );

        let header = locate_header(
            text,
            guess.delimiter,
            &self.pack,
            self.config.header_scan_limit,
            self.config.sample_row_limit,
        );
        let suggestions = suggest_columns(&header.headers, &self.pack);
        let probed_dialect = probe_dialect(
            &header.sample_rows,
            &suggestions,
            guess.delimiter,
            self.config.semicolon_bias,
        );
        let fingerprint = fingerprint(&header.headers);

        tracing::debug!(
            "analysis: {} headers, european={}, date_format={}, confidence={:.2}",
            header.headers.len(),
            probed_dialect.is_european_format,
            probed_dialect.date_format,
            probed_dialect.confidence
        );

        FileAnalysis {
            headers: header.headers,
            sample_rows: header.sample_rows,
            delimiter: guess.delimiter,
            skip_lines: header.skip_lines,
            fingerprint,
            suggestions,
            probed_dialect,
            mapping_found: false,
            can_auto_import: false,
        }
    }

    /// Whether `analysis` needs the user to confirm its dialect.
    pub fn needs_dialect_confirmation(&self, analysis: &FileAnalysis) -> bool {
        analysis
            .probed_dialect
            .is_low_confidence(self.config.low_confidence_threshold)
    }
}
