use crate::download;
use crate::error::Result;
use crate::formula;
use colored::Colorize;

/// Fetch and verify source tarballs without installing them
pub async fn fetch(versions: &[String]) -> Result<()> {
    let mut formulae = Vec::new();
    for version in versions {
        formulae.push(formula::resolve(version)?);
    }

    let results = download::fetch_sources(&formulae).await?;

    println!(
        "{} Downloaded {} archives to {}",
        "✓".green(),
        results.len().to_string().bold(),
        download::cache_dir().display().to_string().dimmed()
    );
    for (version, path) in results {
        println!(
            "  {} {}",
            version.bold().green(),
            path.display().to_string().dimmed()
        );
    }

    Ok(())
}
