use crate::error::{Result, StillError};
use crate::formula::{self, Formula, PREFIX_PLACEHOLDER};
use crate::steps::split_command;
use colored::Colorize;

/// Validate one descriptor, returning human-readable issues
pub fn audit_formula(f: &Formula) -> Vec<String> {
    let mut issues = Vec::new();

    if f.install_steps.is_empty() {
        issues.push("install steps are empty".to_string());
    }
    for (index, step) in f.install_steps.iter().enumerate() {
        if split_command(step).is_empty() {
            issues.push(format!("step {index} is blank"));
        }
    }
    if !f
        .install_steps
        .first()
        .is_some_and(|s| s.contains(PREFIX_PLACEHOLDER))
    {
        issues.push(format!("configure step does not reference {PREFIX_PLACEHOLDER}"));
    }

    if f.sha1.len() != 40 || !f.sha1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    {
        issues.push("sha1 is not a 40-char lowercase hex digest".to_string());
    }

    if !f.url.starts_with("https://") || !f.url.ends_with(".tar.gz") {
        issues.push("url is not an https .tar.gz release link".to_string());
    }
    if !f.homepage.starts_with("http") {
        issues.push("homepage is not a URL".to_string());
    }
    if f.build_dependency.trim().is_empty() {
        issues.push("build dependency is empty".to_string());
    }

    issues
}

/// Audit every catalog descriptor
pub fn audit() -> Result<()> {
    let mut failures = 0;

    for f in formula::catalog() {
        let issues = audit_formula(&f);
        if issues.is_empty() {
            println!("{} {} {}", "✓".green(), f.name.bold(), f.version);
        } else {
            failures += 1;
            println!("{} {} {}", "✗".red(), f.name.bold(), f.version);
            for issue in issues {
                println!("    {issue}");
            }
        }
    }

    if failures > 0 {
        return Err(StillError::Other(anyhow::anyhow!(
            "{failures} descriptors failed audit"
        )));
    }

    Ok(())
}
