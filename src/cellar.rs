//! Keg layout - where installed versions live and how to read them back

use crate::receipt::InstallReceipt;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Detect the stillhouse root on this system
pub fn detect_root() -> PathBuf {
    // First check environment variable
    if let Ok(root) = std::env::var("STILL_PREFIX") {
        return PathBuf::from(root);
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".still")
}

/// Get the Cellar directory path
pub fn cellar_path() -> PathBuf {
    detect_root().join("Cellar")
}

/// Default install prefix for one formula version
pub fn keg_path(name: &str, version: &str) -> PathBuf {
    cellar_path().join(name).join(version)
}

/// An installed keg in the Cellar
#[derive(Debug, Clone)]
pub struct InstalledKeg {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    pub receipt: Option<InstallReceipt>,
}

impl InstalledKeg {
    /// Create from a Cellar version directory
    pub fn from_path(name: String, version: String, path: PathBuf) -> Self {
        let receipt = InstallReceipt::read(&path).ok();
        Self {
            name,
            version,
            path,
            receipt,
        }
    }
}

/// Read all installed kegs from the Cellar
pub fn list_installed() -> Result<Vec<InstalledKeg>> {
    let cellar = cellar_path();

    if !cellar.exists() {
        return Ok(vec![]);
    }

    let mut kegs = Vec::new();

    for entry in fs::read_dir(&cellar)
        .with_context(|| format!("Failed to read Cellar: {}", cellar.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        // Skip hidden files
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }

        for version_entry in fs::read_dir(entry.path())? {
            let version_entry = version_entry?;
            let version = version_entry.file_name().to_string_lossy().to_string();

            if version.starts_with('.') {
                continue;
            }

            kegs.push(InstalledKeg::from_path(
                name.clone(),
                version,
                version_entry.path(),
            ));
        }
    }

    kegs.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| compare_versions(&a.version, &b.version))
    });

    Ok(kegs)
}

/// Check whether a specific formula version is installed
pub fn is_installed(name: &str, version: &str) -> bool {
    keg_path(name, version).is_dir()
}

/// Compare two version strings semantically
pub fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let a_parts: Vec<u32> = a.split('.').filter_map(|s| s.parse::<u32>().ok()).collect();
    let b_parts: Vec<u32> = b.split('.').filter_map(|s| s.parse::<u32>().ok()).collect();

    for i in 0..a_parts.len().max(b_parts.len()) {
        let a_part = a_parts.get(i).unwrap_or(&0);
        let b_part = b_parts.get(i).unwrap_or(&0);
        match a_part.cmp(b_part) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }

    // Fall back to lexicographic
    a.cmp(b)
}
