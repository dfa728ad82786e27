//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gst::rules::numeric::DEFAULT_STRAY_MARKERS;

/// Main configuration for the gstx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstxConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field and table extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export artifact configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to scan per document (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length below which a document is reported as having no
    /// text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Stray letters the portal's table renderer appends to amounts.
    pub stray_markers: Vec<char>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            stray_markers: DEFAULT_STRAY_MARKERS.to_vec(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default output path for GSTR-1 runs.
    pub gstr1_path: PathBuf,

    /// Default output path for GSTR-3B runs.
    pub gstr3b_path: PathBuf,

    /// Excel number format applied to amount cells.
    pub number_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gstr1_path: PathBuf::from("GSTR1_Extracted.xlsx"),
            gstr3b_path: PathBuf::from("GSTR3B_Extracted.xlsx"),
            number_format: "#,##0.00".to_string(),
        }
    }
}

impl GstxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
