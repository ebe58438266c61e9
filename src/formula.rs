//! Formula descriptors for libxo releases.
//!
//! A [`Formula`] is the unit this tool consumes: four pieces of release
//! metadata (homepage, tarball URL, SHA-1 digest, build dependency) plus an
//! ordered list of install step templates. Each published libxo release ships
//! as its own immutable descriptor; new releases are new descriptors, never
//! edits to old ones.
//!
//! The built-in catalog covers the seven releases that were published with a
//! formula file (0.1.6 through 1.3.0). Descriptors for other releases can be
//! loaded from JSON files with [`Formula::load`].
//!
//! # Install step templates
//!
//! Steps are whitespace-separated command templates. The token `${prefix}` is
//! replaced with the install prefix before execution:
//!
//! ```
//! use stillhouse::formula;
//!
//! let f = formula::find("1.3.0").unwrap();
//! let steps = f.substituted_steps(std::path::Path::new("/opt/still/Cellar/libxo/1.3.0"));
//! assert!(steps[0].starts_with("./configure"));
//! assert!(steps[0].ends_with("--prefix=/opt/still/Cellar/libxo/1.3.0"));
//! ```

use crate::error::{Result, StillError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Placeholder substituted with the install prefix in step templates.
pub const PREFIX_PLACEHOLDER: &str = "${prefix}";

const LIBXO_HOMEPAGE: &str = "https://github.com/Juniper/libxo";

/// A release formula: metadata plus the ordered install recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    pub version: String,
    pub homepage: String,
    /// Release tarball URL.
    pub url: String,
    /// Legacy SHA-1 digest of the tarball, lowercase hex.
    pub sha1: String,
    /// Single package required at build time only.
    pub build_dependency: String,
    /// Ordered command templates; may contain `${prefix}`.
    pub install_steps: Vec<String>,
}

impl Formula {
    /// Load a descriptor from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let formula: Self = serde_json::from_str(&contents)?;
        Ok(formula)
    }

    /// Tarball filename, derived from the last URL segment.
    pub fn archive_filename(&self) -> String {
        self.url
            .rsplit('/')
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}.tar.gz", self.name, self.version))
    }

    /// Expected name of the top-level directory inside the tarball.
    pub fn source_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Install steps with `${prefix}` substituted.
    pub fn substituted_steps(&self, prefix: &Path) -> Vec<String> {
        let prefix = prefix.to_string_lossy();
        self.install_steps
            .iter()
            .map(|step| step.replace(PREFIX_PLACEHOLDER, &prefix))
            .collect()
    }
}

fn configure_step(disable_silent_rules: bool) -> String {
    if disable_silent_rules {
        format!(
            "./configure --disable-dependency-tracking --disable-silent-rules --prefix={}",
            PREFIX_PLACEHOLDER
        )
    } else {
        format!(
            "./configure --disable-dependency-tracking --prefix={}",
            PREFIX_PLACEHOLDER
        )
    }
}

fn libxo(version: &str, url: &str, sha1: &str, install_steps: Vec<String>) -> Formula {
    Formula {
        name: "libxo".to_string(),
        version: version.to_string(),
        homepage: LIBXO_HOMEPAGE.to_string(),
        url: url.to_string(),
        sha1: sha1.to_string(),
        build_dependency: "libtool".to_string(),
        install_steps,
    }
}

/// All known libxo release descriptors, oldest first.
///
/// URLs and digests are carried verbatim from the published formula files,
/// including the 0.1.6 URL that predates the `/download/` path segment. The
/// 0.1.6 recipe ran `make install` as one shell command; later releases split
/// it into discrete steps.
pub fn catalog() -> Vec<Formula> {
    vec![
        libxo(
            "0.1.6",
            "https://github.com/Juniper/libxo/releases/0.1.6/libxo-0.1.6.tar.gz",
            "dc9c6616c7b1364356ec7f90f6440fcb617f68e0",
            vec![configure_step(false), "make install".to_string()],
        ),
        libxo(
            "0.4.7",
            "https://github.com/Juniper/libxo/releases/download/0.4.7/libxo-0.4.7.tar.gz",
            "ffcb87f051e3dd05cbc63b381f733b2fe95e191c",
            vec![
                configure_step(false),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
        libxo(
            "0.6.2",
            "https://github.com/Juniper/libxo/releases/download/0.6.2/libxo-0.6.2.tar.gz",
            "74c740928c07527b8278ec2e9af94ab01651b3dd",
            vec![
                configure_step(true),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
        libxo(
            "0.6.3",
            "https://github.com/Juniper/libxo/releases/download/0.6.3/libxo-0.6.3.tar.gz",
            "d2ffcadf73ae2f26bd93bd5ec4dd6fb212874a15",
            vec![
                configure_step(true),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
        libxo(
            "0.7.1",
            "https://github.com/Juniper/libxo/releases/download/0.7.1/libxo-0.7.1.tar.gz",
            "fbc929b0716d989a8199cc0ed72a5a356c9ca8df",
            vec![
                configure_step(true),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
        libxo(
            "1.1.0",
            "https://github.com/Juniper/libxo/releases/download/1.1.0/libxo-1.1.0.tar.gz",
            "d5b78c51794e9d551d42dceaddb21ffad3e1b1bd",
            vec![
                configure_step(true),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
        libxo(
            "1.3.0",
            "https://github.com/Juniper/libxo/releases/download/1.3.0/libxo-1.3.0.tar.gz",
            "0cceb5f35fb057db31d44fadf85123dd81a051c2",
            vec![
                configure_step(true),
                "make".to_string(),
                "install".to_string(),
            ],
        ),
    ]
}

/// Look up a catalog descriptor by exact version string.
pub fn find(version: &str) -> Option<Formula> {
    catalog().into_iter().find(|f| f.version == version)
}

/// The newest catalog descriptor.
pub fn latest() -> Formula {
    catalog().pop().expect("catalog is never empty")
}

/// Closest catalog version to a mistyped argument, if any is plausible.
pub fn suggest(version: &str) -> Option<String> {
    catalog()
        .iter()
        .map(|f| (strsim::jaro_winkler(version, &f.version), f.version.clone()))
        .filter(|(score, _)| *score > 0.7)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, version)| version)
}

/// Resolve a CLI version argument: `latest`, an exact version, or an error
/// carrying a did-you-mean suggestion.
pub fn resolve(version: &str) -> Result<Formula> {
    if version == "latest" {
        return Ok(latest());
    }
    find(version).ok_or_else(|| match suggest(version) {
        Some(close) => StillError::VersionNotFound(format!("{version} (did you mean {close}?)")),
        None => StillError::VersionNotFound(version.to_string()),
    })
}
