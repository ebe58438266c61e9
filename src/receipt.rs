//! Install receipt generation and metadata.
//!
//! Each installed prefix gets an `INSTALL_RECEIPT.json` recording which
//! descriptor produced it, the exact commands that ran, and when. Receipts
//! let `list` show provenance and let `uninstall` confirm a directory is one
//! of ours before removing it.

use crate::formula::Formula;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const RECEIPT_FILE: &str = "INSTALL_RECEIPT.json";

/// Record of one completed install
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub installer_version: String,
    pub name: String,
    pub version: String,
    pub source_url: String,
    pub sha1: String,
    pub build_dependency: String,
    /// Steps exactly as executed, prefix already substituted.
    pub install_steps: Vec<String>,
    pub installed_at: DateTime<Utc>,
}

impl InstallReceipt {
    /// Create a receipt for a formula installed into `prefix`
    pub fn new(formula: &Formula, prefix: &Path) -> Self {
        Self {
            installer_version: format!("still/{}", env!("CARGO_PKG_VERSION")),
            name: formula.name.clone(),
            version: formula.version.clone(),
            source_url: formula.url.clone(),
            sha1: formula.sha1.clone(),
            build_dependency: formula.build_dependency.clone(),
            install_steps: formula.substituted_steps(prefix),
            installed_at: Utc::now(),
        }
    }

    /// Read an existing receipt from an install prefix
    pub fn read(prefix: &Path) -> Result<Self> {
        let receipt_path = prefix.join(RECEIPT_FILE);
        let contents = fs::read_to_string(&receipt_path)
            .with_context(|| format!("Failed to read receipt: {}", receipt_path.display()))?;

        let receipt: Self =
            serde_json::from_str(&contents).context("Failed to parse INSTALL_RECEIPT.json")?;

        Ok(receipt)
    }

    /// Write the receipt into an install prefix
    pub fn write(&self, prefix: &Path) -> Result<()> {
        let receipt_path = prefix.join(RECEIPT_FILE);
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize install receipt")?;

        fs::write(&receipt_path, json)
            .with_context(|| format!("Failed to write receipt: {}", receipt_path.display()))?;

        Ok(())
    }
}
