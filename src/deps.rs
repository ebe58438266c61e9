//! Build dependency resolution.
//!
//! A formula declares a single build-time dependency (libtool, for every
//! libxo release). The host is expected to provide it; this module only
//! checks that it is actually reachable before any build step runs.

use crate::error::{Result, StillError};
use std::path::{Path, PathBuf};

// Homebrew-style opt prefixes probed when the tool is not on PATH.
const OPT_ROOTS: &[&str] = &["/opt/homebrew/opt", "/usr/local/opt"];

/// Locate a build dependency's executable.
///
/// Checks `PATH` first, then the conventional Homebrew opt prefixes, so a
/// keg-only libtool still resolves. Returns `DependencyUnavailable` if the
/// tool cannot be found anywhere.
pub fn resolve_build_dependency(name: &str) -> Result<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Ok(path);
    }

    for root in OPT_ROOTS {
        let candidate = Path::new(root).join(name).join("bin").join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(StillError::DependencyUnavailable(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_tool_on_path() {
        // sh is on PATH on every supported platform
        let path = resolve_build_dependency("sh").unwrap();
        assert!(path.is_file() || path.is_symlink());
    }

    #[test]
    fn test_missing_tool_is_unavailable() {
        let err = resolve_build_dependency("definitely-not-a-real-tool-0xf00").unwrap_err();
        match err {
            StillError::DependencyUnavailable(name) => {
                assert_eq!(name, "definitely-not-a-real-tool-0xf00");
            }
            other => panic!("expected DependencyUnavailable, got {other:?}"),
        }
    }
}
