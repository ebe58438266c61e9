// End-to-end pipeline tests against synthetic source archives.
//
// These build a small tar.gz with an executable configure script standing in
// for the autotools tree, so the whole verify → resolve → extract → build
// sequence runs offline.

use flate2::Compression;
use flate2::write::GzEncoder;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use stillhouse::commands::install::install_archive;
use stillhouse::error::StillError;
use stillhouse::formula::Formula;
use stillhouse::receipt::InstallReceipt;

const CONFIGURE: &str = r#"#!/bin/sh
prefix=""
for arg in "$@"; do
  case "$arg" in
    --prefix=*) prefix="${arg#--prefix=}" ;;
  esac
done
[ -n "$prefix" ] || exit 2
mkdir -p "$prefix/bin"
printf 'fake xo\n' > "$prefix/bin/xo"
"#;

/// Write a tar.gz holding `{dir}/configure` and return (path, sha1)
fn write_source_archive(dir: &Path, tree_name: &str) -> (PathBuf, String) {
    let archive_path = dir.join(format!("{tree_name}.tar.gz"));
    let file = fs::File::create(&archive_path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut header = tar::Header::new_gnu();
    header.set_size(CONFIGURE.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(
            &mut header,
            format!("{tree_name}/configure"),
            CONFIGURE.as_bytes(),
        )
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap();

    let mut hasher = Sha1::new();
    hasher.update(fs::read(&archive_path).unwrap());
    (archive_path, format!("{:x}", hasher.finalize()))
}

fn test_formula(sha1: &str, build_dependency: &str) -> Formula {
    Formula {
        name: "fakexo".to_string(),
        version: "1.0.0".to_string(),
        homepage: "https://example.invalid/fakexo".to_string(),
        url: "https://example.invalid/fakexo-1.0.0.tar.gz".to_string(),
        sha1: sha1.to_string(),
        build_dependency: build_dependency.to_string(),
        install_steps: vec!["./configure --prefix=${prefix}".to_string()],
    }
}

#[tokio::test]
async fn install_pipeline_leaves_artifact_and_receipt() {
    let dir = tempfile::tempdir().unwrap();
    let (archive, sha1) = write_source_archive(dir.path(), "fakexo-1.0.0");
    let formula = test_formula(&sha1, "sh");

    let prefix = dir.path().join("prefix");
    install_archive(&formula, &archive, &prefix).await.unwrap();

    assert_eq!(
        fs::read_to_string(prefix.join("bin/xo")).unwrap(),
        "fake xo\n"
    );

    let receipt = InstallReceipt::read(&prefix).unwrap();
    assert_eq!(receipt.name, "fakexo");
    assert_eq!(receipt.sha1, sha1);
    assert!(receipt.install_steps[0].ends_with(&format!("--prefix={}", prefix.display())));
}

#[tokio::test]
async fn corrupted_archive_fails_before_dependency_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let (archive, sha1) = write_source_archive(dir.path(), "fakexo-1.0.0");

    // Flip the archive after computing the expected digest
    let mut bytes = fs::read(&archive).unwrap();
    bytes[0] ^= 0xff;
    fs::write(&archive, &bytes).unwrap();

    // The declared dependency is unresolvable; if the pipeline reached
    // dependency resolution we would see that error instead.
    let formula = test_formula(&sha1, "definitely-not-a-real-tool-0xf00");

    let prefix = dir.path().join("prefix");
    let err = install_archive(&formula, &archive, &prefix).await.unwrap_err();
    assert!(
        matches!(err, StillError::ChecksumMismatch { .. }),
        "got {err:?}"
    );
    assert!(!prefix.exists());
}

#[tokio::test]
async fn unresolvable_dependency_stops_before_any_step() {
    let dir = tempfile::tempdir().unwrap();
    let (archive, sha1) = write_source_archive(dir.path(), "fakexo-1.0.0");
    let formula = test_formula(&sha1, "definitely-not-a-real-tool-0xf00");

    let prefix = dir.path().join("prefix");
    let err = install_archive(&formula, &archive, &prefix).await.unwrap_err();
    assert!(
        matches!(err, StillError::DependencyUnavailable(_)),
        "got {err:?}"
    );

    // No step ran: the configure script never created the artifact
    assert!(!prefix.exists());
}

#[tokio::test]
async fn failing_step_surfaces_index_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let (archive, sha1) = write_source_archive(dir.path(), "fakexo-1.0.0");

    let mut formula = test_formula(&sha1, "sh");
    // configure refuses to run without --prefix
    formula.install_steps = vec!["./configure".to_string()];

    let prefix = dir.path().join("prefix");
    let err = install_archive(&formula, &archive, &prefix).await.unwrap_err();
    match err {
        StillError::BuildStepFailed { index, code, .. } => {
            assert_eq!(index, 0);
            assert_eq!(code, 2);
        }
        other => panic!("expected BuildStepFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn digest_verification_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (archive, sha1) = write_source_archive(dir.path(), "fakexo-1.0.0");
    let formula = test_formula(&sha1, "sh");

    // Verifying the same bytes twice succeeds twice and leaves the file alone
    stillhouse::download::verify_archive(&formula, &archive)
        .await
        .unwrap();
    stillhouse::download::verify_archive(&formula, &archive)
        .await
        .unwrap();
    assert_eq!(
        stillhouse::download::file_sha1(&archive).await.unwrap(),
        sha1
    );
}
