//! CLI integration tests for ccinvoke.
//!
//! These tests run the real binary. Each test gets its own working
//! directory and HOME so no user configuration leaks in.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the ccinvoke binary command, isolated to `dir`.
fn ccinvoke(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccinvoke").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("USERPROFILE", dir)
        .env_remove("CCINVOKE_COMPILER");
    cmd
}

/// Create a temporary directory for test runs.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// ccinvoke args
// ============================================================================

#[test]
fn test_args_gcc_dialect() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args([
            "args",
            "--dialect",
            "gcc",
            "-I",
            "/usr/include/foo",
            "-D",
            "DEBUG=1",
            "main.cc",
        ])
        .assert()
        .success()
        .stdout("-I\n/usr/include/foo\n-DDEBUG=1\nmain.cc\n");
}

#[test]
fn test_args_msvc_dialect() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args(["args", "--dialect", "msvc", "-I", r"C:\inc", "main.cpp"])
        .assert()
        .success()
        .stdout("/I\nC:\\inc\nmain.cpp\n");
}

#[test]
fn test_args_raw_flags_keep_order() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args([
            "args", "--dialect", "clang", "--arg", "-Wall", "--arg", "-O2", "-c", "-o", "main.o",
            "main.c",
        ])
        .assert()
        .success()
        .stdout("-Wall\n-O2\n-c\n-o\nmain.o\nmain.c\n");
}

#[test]
fn test_args_quoted_line() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args(["args", "--dialect", "gcc", "--quoted", "-I", "/opt/my inc", "main.c"])
        .assert()
        .success()
        .stdout("-I '/opt/my inc' main.c\n");
}

#[test]
fn test_args_invalid_spec_fails() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args(["args", "--dialect", "gcc", "-o", "out.o", "a.c", "b.c"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid compile specification"))
        .stderr(predicate::str::contains("single output file"));
}

#[test]
fn test_args_requires_sources() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args(["args", "--dialect", "gcc"])
        .assert()
        .failure();
}

#[test]
fn test_project_config_selects_dialect() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join(".ccinvoke")).unwrap();
    fs::write(
        tmp.path().join(".ccinvoke/config.toml"),
        "[compiler]\ndialect = \"msvc\"\n",
    )
    .unwrap();

    ccinvoke(tmp.path())
        .args(["args", "-c", "main.c"])
        .assert()
        .success()
        .stdout("/c\nmain.c\n");
}

#[test]
fn test_cli_dialect_overrides_config() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join(".ccinvoke")).unwrap();
    fs::write(
        tmp.path().join(".ccinvoke/config.toml"),
        "[compiler]\ndialect = \"msvc\"\n",
    )
    .unwrap();

    ccinvoke(tmp.path())
        .args(["args", "--dialect", "gcc", "-c", "main.c"])
        .assert()
        .success()
        .stdout("-c\nmain.c\n");
}

// ============================================================================
// ccinvoke render
// ============================================================================

#[test]
fn test_render_posix_option_file() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args([
            "render",
            "--dialect",
            "gcc",
            "-I",
            "/opt/my inc",
            "-D",
            "MSG=it's",
            "main.c",
        ])
        .assert()
        .success()
        .stdout("-I\n'/opt/my inc'\n'-DMSG=it'\\''s'\nmain.c\n");
}

#[test]
fn test_render_windows_option_file() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args([
            "render",
            "--dialect",
            "msvc",
            "-I",
            r"C:\Program Files\sdk\",
            "main.cpp",
        ])
        .assert()
        .success()
        .stdout("/I\n\"C:\\Program Files\\sdk\\\\\"\nmain.cpp\n");
}

#[test]
fn test_render_writes_file() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args(["render", "--dialect", "gcc", "--write", "out/args.rsp", "main.c"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    assert_eq!(
        fs::read_to_string(tmp.path().join("out/args.rsp")).unwrap(),
        "main.c\n"
    );
}

#[test]
fn test_render_dialect_flag_overrides_configured_style() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join(".ccinvoke")).unwrap();
    fs::write(
        tmp.path().join(".ccinvoke/config.toml"),
        "[compiler]\ndialect = \"msvc\"\nstyle = \"windows\"\n",
    )
    .unwrap();

    ccinvoke(tmp.path())
        .args(["render", "--dialect", "gcc", "-I", "/opt/my inc", "main.c"])
        .assert()
        .success()
        .stdout("-I\n'/opt/my inc'\nmain.c\n");
}

// ============================================================================
// ccinvoke compdb
// ============================================================================

#[test]
fn test_compdb_one_entry_per_source() {
    let tmp = temp_dir();

    ccinvoke(tmp.path())
        .args([
            "compdb",
            "--compiler",
            "/usr/bin/gcc",
            "-I",
            "inc",
            "-c",
            "a.c",
            "b.c",
        ])
        .assert()
        .success();

    let db = fs::read_to_string(tmp.path().join("compile_commands.json")).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&db).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["file"], "a.c");
    assert_eq!(entries[1]["file"], "b.c");
    assert_eq!(
        entries[1]["arguments"],
        serde_json::json!(["/usr/bin/gcc", "-I", "inc", "-c", "b.c"])
    );
    assert!(entries[0].get("output").is_none());
}

// ============================================================================
// ccinvoke compile
// ============================================================================

#[test]
fn test_compile_missing_compiler() {
    let tmp = temp_dir();
    let missing = tmp.path().join("no-such-compiler");

    ccinvoke(tmp.path())
        .args(["compile", "--dialect", "gcc", "--compiler"])
        .arg(&missing)
        .arg("main.c")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not run compiler"));
}

#[cfg(unix)]
mod stub {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Write an executable `sh` script standing in for a compiler.
    pub fn compiler(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_compile_forwards_output() {
        let tmp = temp_dir();
        let cc = compiler(
            tmp.path(),
            "gcc",
            r#"echo "compiling $*"; echo "main.c:1: warning: unused" >&2; exit 0"#,
        );

        ccinvoke(tmp.path())
            .args(["compile", "-c", "--compiler"])
            .arg(&cc)
            .arg("main.c")
            .assert()
            .success()
            .stdout("compiling -c main.c\n")
            .stderr(predicate::str::contains("main.c:1: warning: unused"));
    }

    #[test]
    fn test_compile_failure_exit_code() {
        let tmp = temp_dir();
        let cc = compiler(
            tmp.path(),
            "gcc",
            r#"echo "main.c:3:1: error: expected ';'" >&2; exit 3"#,
        );

        ccinvoke(tmp.path())
            .args(["compile", "--compiler"])
            .arg(&cc)
            .arg("main.c")
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("main.c:3:1: error: expected ';'"))
            .stderr(predicate::str::contains("compilation failed for main.c"));
    }

    #[test]
    fn test_compile_through_option_file() {
        let tmp = temp_dir();
        let rsp_dir = tmp.path().join("rsp");
        fs::create_dir(&rsp_dir).unwrap();
        let cc = compiler(
            tmp.path(),
            "gcc",
            r#"for a in "$@"; do case "$a" in @*) cat "${a#@}";; *) echo "direct $a";; esac; done"#,
        );

        ccinvoke(tmp.path())
            .args(["compile", "--spill", "always", "-I", "/opt/my inc", "--compiler"])
            .arg(&cc)
            .arg("--option-file-dir")
            .arg(&rsp_dir)
            .arg("main.c")
            .assert()
            .success()
            .stdout("-I\n'/opt/my inc'\nmain.c\n");

        assert_eq!(fs::read_dir(&rsp_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_keep_option_files_after_failure() {
        let tmp = temp_dir();
        let rsp_dir = tmp.path().join("rsp");
        fs::create_dir(&rsp_dir).unwrap();
        let cc = compiler(tmp.path(), "gcc", "exit 1");

        ccinvoke(tmp.path())
            .args(["compile", "--spill", "always", "--keep-option-files", "--compiler"])
            .arg(&cc)
            .arg("--option-file-dir")
            .arg(&rsp_dir)
            .arg("main.c")
            .assert()
            .failure()
            .code(1);

        let kept: Vec<_> = fs::read_dir(&rsp_dir).unwrap().collect();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_compile_separate_units() {
        let tmp = temp_dir();
        let cc = compiler(tmp.path(), "gcc", r#"echo "unit $*""#);

        let assert = ccinvoke(tmp.path())
            .args(["compile", "-j", "2", "-c", "--compiler"])
            .arg(&cc)
            .args(["a.c", "b.c"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Finished 2 units"));

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        assert_eq!(stdout, "unit -c a.c\nunit -c b.c\n");
    }
}
