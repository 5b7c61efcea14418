//! Command handlers
//!
//!     Each handler reads its input, does its work through the format registry and returns the
//!     text to print. Nothing here writes to stdout, so handlers stay easy to test.

use proofflow_babel::formats::treeviz::to_treeviz_str_with_params;
use proofflow_babel::{Format, FormatError, FormatRegistry};
use proofflow_config::{ConfigError, ProofFlowConfig};
use proofflow_parser::flow::ast::{AreaId, AreaType, IdCounter, Position, ProofFlowDocument};
use proofflow_parser::flow::extraction::{extract_document, EditorNode};
use proofflow_parser::flow::parsing::Dialect;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `file://` URI of `path`, percent-encoded
pub fn uri_for(path: &Path) -> String {
    let absolute = fs::canonicalize(path)
        .or_else(|_| std::env::current_dir().map(|dir| dir.join(path)))
        .unwrap_or_else(|_| path.to_path_buf());
    match Url::from_file_path(&absolute) {
        Ok(url) => url.to_string(),
        Err(()) => absolute.display().to_string(),
    }
}

/// Parse the file at `path` with `from`, or with the dialect its extension selects
fn load(
    registry: &FormatRegistry,
    config: &ProofFlowConfig,
    path: &Path,
    from: Option<&str>,
) -> Result<ProofFlowDocument, CliError> {
    let format = match from {
        Some(name) => registry.get(name)?,
        None => registry.for_path(path, config.output.pure_lean)?,
    };
    let source = read(path)?;
    let doc = registry.parse(&uri_for(path), &source, format.name(), &mut IdCounter::new())?;
    debug!(path = %path.display(), format = format.name(), areas = doc.areas().len(), "loaded");
    Ok(doc)
}

pub fn convert(
    config: &ProofFlowConfig,
    path: &Path,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<String, CliError> {
    let registry = FormatRegistry::with_defaults();
    let doc = load(&registry, config, path, from)?;
    let target = to
        .map(str::to_string)
        .unwrap_or_else(|| config.output.default_format.name().to_string());
    info!(path = %path.display(), to = %target, "converting");
    Ok(registry.serialize(&doc, &target)?)
}

pub fn inspect(
    config: &ProofFlowConfig,
    path: &Path,
    from: Option<&str>,
    format: &str,
    show_ranges: bool,
) -> Result<String, CliError> {
    let registry = FormatRegistry::with_defaults();
    let doc = load(&registry, config, path, from)?;
    if format == "treeviz" {
        let mut params = HashMap::new();
        if show_ranges {
            params.insert("show-ranges".to_string(), "true".to_string());
        }
        return Ok(to_treeviz_str_with_params(&doc, &params));
    }
    Ok(registry.serialize(&doc, format)?)
}

/// One row of the `ranges` table
#[derive(Debug, Serialize)]
pub struct RangeRow {
    pub id: AreaId,
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub start: Position,
    pub end: Position,
    pub span: (usize, usize),
}

pub fn range_rows(doc: &ProofFlowDocument) -> Vec<RangeRow> {
    doc.iter_all()
        .filter_map(|area| {
            let range = area.range()?;
            Some(RangeRow {
                id: area.id(),
                area_type: area.area_type(),
                start: range.start,
                end: range.end,
                span: (range.span.start, range.span.end),
            })
        })
        .collect()
}

pub fn ranges(
    config: &ProofFlowConfig,
    path: &Path,
    from: Option<&str>,
    json: bool,
) -> Result<String, CliError> {
    let registry = FormatRegistry::with_defaults();
    let doc = load(&registry, config, path, from)?;
    let rows = range_rows(&doc);
    if json {
        let mut out = serde_json::to_string_pretty(&rows)?;
        out.push('\n');
        return Ok(out);
    }
    let mut out = format!("{:>4}  {:<12} {:>9}  {:>9}  {}\n", "id", "type", "start", "end", "bytes");
    for row in rows {
        out.push_str(&format!(
            "{:>4}  {:<12} {:>9}  {:>9}  {}..{}\n",
            row.id.get(),
            row.area_type.to_string(),
            row.start.to_string(),
            row.end.to_string(),
            row.span.0,
            row.span.1
        ));
    }
    Ok(out)
}

pub fn extract(
    config: &ProofFlowConfig,
    snapshot: &Path,
    dialect: Option<&str>,
) -> Result<String, CliError> {
    let dialect = match dialect {
        Some(name) => name.parse::<Dialect>().map_err(CliError::Usage)?,
        None => config.output.default_format,
    };
    let root: EditorNode = serde_json::from_str(&read(snapshot)?)?;
    let doc = extract_document(
        &root,
        uri_for(snapshot),
        dialect.output_config(),
        &mut IdCounter::new(),
    );
    debug!(areas = doc.areas().len(), dialect = dialect.name(), "extracted snapshot");
    Ok(doc.to_source())
}

pub fn formats() -> String {
    let registry = FormatRegistry::with_defaults();
    let mut out = String::new();
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        out.push_str(&format!(
            "{:<10} {:<6} {}\n",
            name,
            capabilities(format),
            format.description()
        ));
    }
    out
}

fn capabilities(format: &dyn Format) -> &'static str {
    match (format.supports_parsing(), format.supports_serialization()) {
        (true, true) => "rw",
        (true, false) => "r",
        (false, true) => "w",
        (false, false) => "-",
    }
}
