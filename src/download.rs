//! Source tarball download with caching, progress tracking, and SHA-1 verification.

use crate::error::{Result, StillError};
use crate::formula::Formula;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Download cache directory
pub fn cache_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache/still/downloads")
}

/// Compute the SHA-1 digest of a file as lowercase hex
pub async fn file_sha1(file_path: &Path) -> Result<String> {
    use sha1::{Digest, Sha1};
    use tokio::io::AsyncReadExt;

    let mut file = fs::File::open(file_path).await?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify an archive on disk against a formula's expected digest.
///
/// Returns `ChecksumMismatch` without touching the file otherwise.
pub async fn verify_archive(formula: &Formula, archive_path: &Path) -> Result<()> {
    let actual = file_sha1(archive_path).await?;
    if actual != formula.sha1 {
        return Err(StillError::ChecksumMismatch {
            name: format!("{}-{}", formula.name, formula.version),
            expected: formula.sha1.clone(),
            actual,
        });
    }
    Ok(())
}

/// Download a formula's source tarball into the cache and verify its digest.
///
/// A cached archive that already matches is reused as-is; a cached archive
/// that fails verification is deleted and re-downloaded. A fresh download
/// that fails verification is deleted before the error is returned.
pub async fn fetch_source(formula: &Formula, progress: Option<&MultiProgress>) -> Result<PathBuf> {
    let cache = cache_dir();
    fs::create_dir_all(&cache).await?;

    let output_path = cache.join(formula.archive_filename());

    // Check if already downloaded and verified
    if output_path.exists() {
        match verify_archive(formula, &output_path).await {
            Ok(()) => {
                tracing::debug!(path = %output_path.display(), "using cached archive");
                return Ok(output_path);
            }
            Err(StillError::ChecksumMismatch { .. }) => {
                // Stale or corrupt cache entry, re-download
                fs::remove_file(&output_path).await?;
            }
            Err(e) => return Err(e),
        }
    }

    // Create progress bar
    let pb = if let Some(mp) = progress {
        let pb = mp.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .map_err(|e| StillError::Other(e.into()))?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("⬇ {}-{}", formula.name, formula.version));
        Some(pb)
    } else {
        None
    };

    // Download
    let client = reqwest::Client::new();
    let mut response = client.get(&formula.url).send().await?.error_for_status()?;

    if let Some(pb) = &pb {
        if let Some(total) = response.content_length() {
            pb.set_length(total);
        }
    }

    let mut file = fs::File::create(&output_path).await?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        if let Some(pb) = &pb {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("✓ {}-{}", formula.name, formula.version));
    }

    // Verify digest
    if let Err(e) = verify_archive(formula, &output_path).await {
        fs::remove_file(&output_path).await?;
        return Err(e);
    }

    Ok(output_path)
}

/// Download several formulae in parallel
pub async fn fetch_sources(formulae: &[Formula]) -> Result<Vec<(String, PathBuf)>> {
    let mp = MultiProgress::new();
    let mut tasks = Vec::new();

    for formula in formulae {
        let formula = formula.clone();
        let mp = mp.clone();

        let task = tokio::spawn(async move {
            let result = fetch_source(&formula, Some(&mp)).await;
            (formula.version.clone(), result)
        });

        tasks.push(task);
    }

    let mut results = Vec::new();
    for task in tasks {
        let (version, result) = task
            .await
            .map_err(|e| StillError::Other(anyhow::anyhow!("download task panicked: {e}")))?;
        match result {
            Ok(path) => results.push((version, path)),
            Err(e) => return Err(e),
        }
    }

    Ok(results)
}
