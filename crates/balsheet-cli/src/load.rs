//! # Document Loading
//!
//! Reads a balance-sheet document from disk into a `serde_json::Value`.
//! Files ending in `.yaml`/`.yml` are parsed as YAML; everything else as JSON.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::PipelineError;

/// Load and parse the document at `path`.
///
/// # Errors
///
/// `SourceNotFound` when the file does not exist, `DocumentLoad` when it
/// cannot be read or is not valid JSON/YAML.
pub fn load_document(path: &Path) -> Result<Value, PipelineError> {
    let shown = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            tracing::error!(path = %shown, "balance sheet file not found");
            PipelineError::SourceNotFound {
                path: shown.clone(),
            }
        } else {
            tracing::error!(path = %shown, error = %e, "cannot read balance sheet file");
            PipelineError::DocumentLoad {
                path: shown.clone(),
                reason: format!("cannot read file: {e}"),
            }
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parsed = match ext {
        "yaml" | "yml" => {
            serde_yaml::from_str::<Value>(&content).map_err(|e| format!("invalid YAML: {e}"))
        }
        _ => serde_json::from_str::<Value>(&content).map_err(|e| format!("invalid JSON: {e}")),
    };

    parsed.map_err(|reason| {
        tracing::error!(path = %shown, %reason, "cannot parse balance sheet file");
        PipelineError::DocumentLoad {
            path: shown,
            reason,
        }
    })
}
