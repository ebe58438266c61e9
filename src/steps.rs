//! Install step execution.
//!
//! Steps run strictly in order inside the extracted source tree; step N+1
//! only runs if step N exited 0. The first failure aborts the whole install.
//! Templates are whitespace-split into argv after prefix substitution (the
//! recipes carry no quoting).

use crate::error::{Result, StillError};
use crate::formula::Formula;
use std::path::Path;
use std::process::Command;

/// Split a substituted step template into argv.
pub fn split_command(step: &str) -> Vec<String> {
    step.split_whitespace().map(str::to_string).collect()
}

/// Run a formula's install steps in sequence inside `source_tree`.
///
/// `prefix` is the host-supplied install target substituted into the step
/// templates. Fails with `BuildStepFailed` on the first non-zero exit and
/// `BuildStepSpawn` if a step's executable cannot be launched.
pub fn run_install_steps(formula: &Formula, prefix: &Path, source_tree: &Path) -> Result<()> {
    for (index, step) in formula.substituted_steps(prefix).iter().enumerate() {
        let argv = split_command(step);
        let Some((program, args)) = argv.split_first() else {
            return Err(StillError::Other(anyhow::anyhow!(
                "install step {index} is empty"
            )));
        };

        tracing::debug!(index, command = %step, "running install step");

        let status = Command::new(program)
            .args(args)
            .current_dir(source_tree)
            .status()
            .map_err(|source| StillError::BuildStepSpawn {
                index,
                command: step.clone(),
                source,
            })?;

        if !status.success() {
            return Err(StillError::BuildStepFailed {
                index,
                command: step.clone(),
                code: status.code().unwrap_or(-1),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn fake_formula(install_steps: Vec<String>) -> Formula {
        Formula {
            name: "fake".to_string(),
            version: "0.0.1".to_string(),
            homepage: "https://example.invalid".to_string(),
            url: "https://example.invalid/fake-0.0.1.tar.gz".to_string(),
            sha1: "0000000000000000000000000000000000000000".to_string(),
            build_dependency: "sh".to_string(),
            install_steps,
        }
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("./configure --disable-dependency-tracking --prefix=/opt/keg"),
            vec!["./configure", "--disable-dependency-tracking", "--prefix=/opt/keg"]
        );
        assert_eq!(split_command("make install"), vec!["make", "install"]);
    }

    #[test]
    fn test_steps_run_in_order_with_prefix() {
        let tree = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();
        script(
            tree.path(),
            "configure",
            r#"prefix=""
for arg in "$@"; do
  case "$arg" in --prefix=*) prefix="${arg#--prefix=}";; esac
done
mkdir -p "$prefix/bin"
printf 'one\n' > "$prefix/bin/marker"
"#,
        );
        script(tree.path(), "finish", r#"printf 'two\n' >> configure.log"#);

        let formula = fake_formula(vec![
            "./configure --prefix=${prefix}".to_string(),
            "./finish".to_string(),
        ]);

        run_install_steps(&formula, prefix.path(), tree.path()).unwrap();
        assert!(prefix.path().join("bin/marker").is_file());
        assert!(tree.path().join("configure.log").is_file());
    }

    #[test]
    fn test_failure_aborts_remaining_steps() {
        let tree = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();
        script(tree.path(), "ok", "touch ran-first");
        script(tree.path(), "bad", "exit 3");
        script(tree.path(), "never", "touch ran-last");

        let formula = fake_formula(vec![
            "./ok".to_string(),
            "./bad".to_string(),
            "./never".to_string(),
        ]);

        let err = run_install_steps(&formula, prefix.path(), tree.path()).unwrap_err();
        match err {
            StillError::BuildStepFailed {
                index,
                command,
                code,
            } => {
                assert_eq!(index, 1);
                assert_eq!(command, "./bad");
                assert_eq!(code, 3);
            }
            other => panic!("expected BuildStepFailed, got {other:?}"),
        }

        assert!(tree.path().join("ran-first").is_file());
        assert!(!tree.path().join("ran-last").exists());
    }

    #[test]
    fn test_unlaunchable_step_is_spawn_error() {
        let tree = tempfile::tempdir().unwrap();
        let prefix = tempfile::tempdir().unwrap();

        let formula = fake_formula(vec!["./does-not-exist".to_string()]);
        let err = run_install_steps(&formula, prefix.path(), tree.path()).unwrap_err();
        assert!(matches!(err, StillError::BuildStepSpawn { index: 0, .. }));
    }
}
