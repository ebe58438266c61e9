use crate::cellar;
use crate::error::Result;
use crate::formula;
use colored::Colorize;

/// Show a descriptor's metadata and install recipe
pub fn info(version: &str) -> Result<()> {
    let f = formula::resolve(version)?;

    println!("{} {}", f.name.bold().green(), f.version.bold());
    println!("{}: {}", "homepage".cyan(), f.homepage);
    println!("{}: {}", "url".cyan(), f.url);
    println!("{}: {}", "sha1".cyan(), f.sha1.dimmed());
    println!(
        "{}: {} {}",
        "build dependency".cyan(),
        f.build_dependency,
        "(build-time only)".dimmed()
    );

    println!("{}:", "install steps".cyan());
    for (index, step) in f.install_steps.iter().enumerate() {
        println!("  {}. {}", index + 1, step);
    }

    if cellar::is_installed(&f.name, &f.version) {
        let keg = cellar::keg_path(&f.name, &f.version);
        println!(
            "{} Installed at {}",
            "✓".green(),
            keg.display().to_string().dimmed()
        );
    }

    Ok(())
}
