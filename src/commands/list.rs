use crate::cellar;
use crate::error::Result;
use crate::formula;
use colored::Colorize;

/// List catalog releases, or only installed kegs with `--installed`
pub fn list(installed_only: bool) -> Result<()> {
    if installed_only {
        let kegs = cellar::list_installed()?;
        if kegs.is_empty() {
            println!("No formulae installed");
            return Ok(());
        }
        for keg in kegs {
            match &keg.receipt {
                Some(receipt) => println!(
                    "{} {} {}",
                    keg.name.bold(),
                    keg.version,
                    format!("(installed {})", receipt.installed_at.format("%Y-%m-%d"))
                        .dimmed()
                ),
                None => println!("{} {} {}", keg.name.bold(), keg.version, "(no receipt)".dimmed()),
            }
        }
        return Ok(());
    }

    for f in formula::catalog() {
        if cellar::is_installed(&f.name, &f.version) {
            println!("{} {} {}", f.name.bold(), f.version, "✓".green());
        } else {
            println!("{} {}", f.name.bold(), f.version);
        }
    }

    Ok(())
}
