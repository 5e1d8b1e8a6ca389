// file: src/exporter/json.rs
// description: summary export as plain text or json with run metadata

use crate::error::{Result, SummarizeError};
use crate::models::Summary;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ExportFormat {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SummarizeError::Validation(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportedSummary<'a> {
    pub exported_at: String,
    #[serde(flatten)]
    pub summary: &'a Summary,
}

#[derive(Debug, Clone)]
pub struct SummaryExporter {
    format: ExportFormat,
    pretty: bool,
}

impl SummaryExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn render(&self, summary: &Summary) -> Result<String> {
        match self.format {
            ExportFormat::Text => Ok(summary.text.clone()),
            ExportFormat::Json => {
                let exported = ExportedSummary {
                    exported_at: Utc::now().to_rfc3339(),
                    summary,
                };
                let json = if self.pretty {
                    serde_json::to_string_pretty(&exported)?
                } else {
                    serde_json::to_string(&exported)?
                };
                Ok(json)
            }
        }
    }

    /// Writes the rendered summary, creating parent directories as needed.
    pub fn write(&self, summary: &Summary, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SummarizeError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut content = self.render(summary)?;
        if !content.ends_with('\n') {
            content.push('\n');
        }

        fs::write(path, content).map_err(|source| SummarizeError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Summary written to {}", path.display());
        Ok(path.to_path_buf())
    }
}
