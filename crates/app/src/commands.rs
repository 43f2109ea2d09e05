use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tessera_core::{ColumnIndex, ColumnMapping, Field, FileAnalysis};
use tessera_import::{fingerprint_digest, preview, Analyzer, AnalyzerConfig, PreviewRow};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analysis: FileAnalysis,
    pub needs_dialect_confirmation: bool,
    pub mapping: ColumnMapping,
    pub mapping_error: Option<String>,
    pub preview: Vec<PreviewRow>,
}

pub fn load_analyzer(config: Option<&Path>) -> anyhow::Result<Analyzer> {
    let config = match config {
        Some(path) => AnalyzerConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    Ok(Analyzer::new(config))
}

/// Reads a statement from disk. Invalid UTF-8 is replaced rather than
/// rejected; the analysis only needs the header shape.
pub fn read_statement(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    tracing::info!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(text)
}

pub fn analyze_text(text: &str, analyzer: &Analyzer) -> AnalysisReport {
    let analysis = analyzer.analyze(text);
    let mapping = ColumnMapping::from_analysis(&analysis);
    let mapping_error = mapping
        .validate_for(analysis.headers.len())
        .err()
        .map(|e| e.to_string());
    let preview = preview(&analysis, &mapping);

    AnalysisReport {
        needs_dialect_confirmation: analyzer.needs_dialect_confirmation(&analysis),
        analysis,
        mapping,
        mapping_error,
        preview,
    }
}

pub fn analyze_file(path: &Path, analyzer: &Analyzer) -> anyhow::Result<AnalysisReport> {
    let text = read_statement(path)?;
    Ok(analyze_text(&text, analyzer))
}

pub fn fingerprint_file(path: &Path, analyzer: &Analyzer) -> anyhow::Result<(String, String)> {
    let text = read_statement(path)?;
    let analysis = analyzer.analyze(&text);
    let digest = fingerprint_digest(&analysis.fingerprint);
    Ok((analysis.fingerprint, digest))
}

fn field_for(analysis: &FileAnalysis, column: ColumnIndex) -> Option<Field> {
    Field::PRIORITY
        .into_iter()
        .find(|f| analysis.suggestions.get(*f) == Some(column))
}

/// Human-readable summary of a report.
pub fn render_summary(report: &AnalysisReport) -> String {
    let a = &report.analysis;
    let mut out = String::new();

    out.push_str(&format!(
        "delimiter: {:?}  header line: {}\n",
        a.delimiter, a.skip_lines
    ));
    out.push_str("columns:\n");
    for (i, header) in a.headers.iter().enumerate() {
        let field = field_for(a, ColumnIndex(i)).map_or("-".to_string(), |f| f.to_string());
        out.push_str(&format!("  [{i}] {header} -> {field}\n"));
    }

    let d = &a.probed_dialect;
    out.push_str(&format!(
        "dialect: {} decimals, {} dates, confidence {:.2}{}\n",
        if d.is_european_format { "comma" } else { "dot" },
        d.date_format,
        d.confidence,
        if report.needs_dialect_confirmation {
            " (needs confirmation)"
        } else {
            ""
        }
    ));
    out.push_str(&format!(
        "layout: {}\n",
        if report.mapping.is_double_entry() {
            "debit/credit"
        } else {
            "signed amount"
        }
    ));
    match &report.mapping_error {
        None => out.push_str("mapping: valid\n"),
        Some(e) => out.push_str(&format!("mapping: invalid ({e})\n")),
    }
    out.push_str(&format!("fingerprint: {}\n", a.fingerprint));

    if !report.preview.is_empty() {
        out.push_str("preview:\n");
        for row in &report.preview {
            out.push_str(&format!(
                "  {} | {} | {}\n",
                row.date.map_or("?".to_string(), |d| d.to_string()),
                row.description.as_deref().unwrap_or("?"),
                row.amount.map_or("?".to_string(), |m| m.to_string()),
            ));
        }
    }
    out
}
