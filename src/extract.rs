//! Source tarball extraction into a build directory.
//!
//! Release tarballs are gzip-compressed tar archives containing a single
//! top-level directory named `{name}-{version}`:
//!
//! ```text
//! Input:  libxo-1.3.0.tar.gz
//! Unpack: <build dir>/libxo-1.3.0/
//!   configure
//!   Makefile.in
//!   libxo/
//! ```
//!
//! Extraction happens into a caller-owned build directory (a tempdir during
//! installs), never into the prefix; only the install steps write there.

use crate::formula::Formula;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Extract a verified source tarball and return the path to the source tree.
pub fn extract_source(formula: &Formula, archive_path: &Path, build_dir: &Path) -> Result<PathBuf> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let decompressor = GzDecoder::new(file);
    let mut archive = Archive::new(decompressor);

    archive
        .unpack(build_dir)
        .with_context(|| format!("Failed to extract archive to: {}", build_dir.display()))?;

    // The tree is normally {name}-{version}; fall back to any {name}-* entry
    // in case the tarball's directory carries a suffix.
    let expected = build_dir.join(formula.source_dir_name());
    let source_tree = if expected.is_dir() {
        expected
    } else {
        let prefix = format!("{}-", formula.name);
        fs::read_dir(build_dir)
            .with_context(|| format!("Failed to read build dir: {}", build_dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Extraction failed: no {} source tree under {}",
                    formula.source_dir_name(),
                    build_dir.display()
                )
            })?
    };

    Ok(source_tree)
}
