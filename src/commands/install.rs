use crate::cellar;
use crate::deps;
use crate::download;
use crate::error::{Result, StillError};
use crate::extract;
use crate::formula::{self, Formula};
use crate::receipt::InstallReceipt;
use crate::steps;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Run the install pipeline for an already-fetched archive.
///
/// Stages run strictly in order: verify the archive digest, resolve the
/// build dependency, extract into a throwaway build directory, run the
/// install steps with `prefix` substituted, then write the receipt. A
/// corrupt archive fails before dependency resolution; a missing dependency
/// fails before any step executes.
pub async fn install_archive(
    formula: &Formula,
    archive_path: &Path,
    prefix: &Path,
) -> Result<PathBuf> {
    download::verify_archive(formula, archive_path).await?;

    let dep_path = deps::resolve_build_dependency(&formula.build_dependency)?;
    tracing::debug!(
        dependency = %formula.build_dependency,
        path = %dep_path.display(),
        "build dependency resolved"
    );

    let build_dir = tempfile::tempdir()?;
    let source_tree = extract::extract_source(formula, archive_path, build_dir.path())?;

    steps::run_install_steps(formula, prefix, &source_tree)?;

    std::fs::create_dir_all(prefix)?;
    InstallReceipt::new(formula, prefix).write(prefix)?;

    Ok(prefix.to_path_buf())
}

pub async fn install(
    versions: &[String],
    formula_file: Option<&Path>,
    prefix_override: Option<&Path>,
    force: bool,
) -> Result<()> {
    // Resolve every requested version before touching the network
    let mut requested = Vec::new();
    if let Some(file) = formula_file {
        requested.push(Formula::load(file)?);
    }
    for version in versions {
        requested.push(formula::resolve(version)?);
    }

    let mut to_install = Vec::new();
    for formula in requested {
        if prefix_override.is_none()
            && !force
            && cellar::is_installed(&formula.name, &formula.version)
        {
            println!(
                "  {} {} {} already installed (use {} to rebuild)",
                "ℹ".cyan(),
                formula.name.bold(),
                formula.version,
                "--force".dimmed()
            );
            continue;
        }
        to_install.push(formula);
    }

    if to_install.is_empty() {
        println!("Nothing to install");
        return Ok(());
    }

    if prefix_override.is_some() && to_install.len() > 1 {
        return Err(StillError::Other(anyhow::anyhow!(
            "--prefix can only be used with a single version"
        )));
    }

    println!(
        "Installing {} formulae from source...",
        to_install.len().to_string().bold()
    );

    // Fetch and verify all archives up front, in parallel
    let downloaded = download::fetch_sources(&to_install).await?;

    for (formula, (_, archive_path)) in to_install.iter().zip(&downloaded) {
        let prefix = match prefix_override {
            Some(path) => path.to_path_buf(),
            None => cellar::keg_path(&formula.name, &formula.version),
        };

        println!(
            "  Building {} {} → {}",
            formula.name.cyan(),
            formula.version.bold(),
            prefix.display().to_string().dimmed()
        );

        install_archive(formula, archive_path, &prefix).await?;

        println!(
            "  {} Installed {} {}",
            "✓".green(),
            formula.name.bold().green(),
            formula.version.dimmed()
        );
    }

    println!(
        "{} Installed {} formulae",
        "✓".green().bold(),
        to_install.len().to_string().bold()
    );

    Ok(())
}

pub fn uninstall(versions: &[String]) -> Result<()> {
    for version in versions {
        let formula = formula::resolve(version)?;
        let keg = cellar::keg_path(&formula.name, &formula.version);

        if !keg.is_dir() {
            println!(
                "  {} {} {} is not installed",
                "⚠".yellow(),
                formula.name.bold(),
                formula.version
            );
            continue;
        }

        // Only remove directories we have a receipt for
        if InstallReceipt::read(&keg).is_err() {
            return Err(StillError::Other(anyhow::anyhow!(
                "{} has no install receipt; refusing to remove it",
                keg.display()
            )));
        }

        std::fs::remove_dir_all(&keg)?;

        // Drop the formula directory once its last version is gone
        if let Some(parent) = keg.parent()
            && std::fs::read_dir(parent).map(|mut d| d.next().is_none()).unwrap_or(false)
        {
            std::fs::remove_dir(parent)?;
        }

        println!(
            "  {} Uninstalled {} {}",
            "✓".green(),
            formula.name.bold(),
            formula.version.dimmed()
        );
    }

    Ok(())
}
