//! Runs the `nupack` binary against fixture trees.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>Demo</id>
    <version>0.3.0</version>
    <authors>Jane Doe</authors>
    <description>CLI fixture</description>
  </metadata>
  <files>
    <file src="bin\*.dll" target="lib\net45" />
  </files>
</package>"#;

fn nupack() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nupack"));
    cmd.env_remove("NUGET_SOURCE").env_remove("NUGET_API_KEY");
    cmd
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    fs::write(dir.path().join("Demo.nuspec"), NUSPEC).unwrap();
    fs::create_dir(dir.path().join("bin")).unwrap();
    fs::write(dir.path().join("bin/demo.dll"), b"MZ").unwrap();
    dir
}

fn entry_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_help_command() {
    let output = nupack().arg("--help").output().expect("failed to run nupack");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("pack"));
    assert!(stdout.contains("push"));
}

#[test]
fn test_version_command() {
    let output = nupack().arg("--version").output().expect("failed to run nupack");
    assert!(output.status.success());
}

#[test]
fn test_pack_writes_package() {
    let dir = fixture();
    let out = dir.path().join("out");

    let output = nupack()
        .arg("pack")
        .arg(dir.path().join("Demo.nuspec"))
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("failed to run nupack");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let package = out.join("Demo.0.3.0.nupkg");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Demo.0.3.0.nupkg"));
    let names = entry_names(&package);
    assert!(names.contains(&"Demo.nuspec".to_string()));
    assert!(names.contains(&"lib/net45/demo.dll".to_string()));
    assert!(names.contains(&"[Content_Types].xml".to_string()));
}

#[test]
fn test_pack_rejects_incomplete_manifest() {
    let dir = TempDir::new().unwrap();
    let nuspec = dir.path().join("Bad.nuspec");
    fs::write(
        &nuspec,
        "<package><metadata><id>Bad</id><version>1.0.0</version></metadata></package>",
    )
    .unwrap();

    let output = nupack()
        .arg("pack")
        .arg(&nuspec)
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("failed to run nupack");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid manifest"));
    assert!(!dir.path().join("Bad.1.0.0.nupkg").exists());
}

#[test]
fn test_push_without_source_fails() {
    let dir = TempDir::new().unwrap();
    let package = dir.path().join("Demo.0.3.0.nupkg");
    fs::write(&package, b"PK").unwrap();

    let output = nupack()
        .arg("push")
        .arg(&package)
        .output()
        .expect("failed to run nupack");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No package source specified"));
}
