//! Test fixtures for common test scenarios.
//!
//! Pre-built compile specifications and stub compilers that behave like a
//! real compiler as far as the driver can observe.

use std::path::{Path, PathBuf};

use crate::core::spec::CompileSpec;

/// A single-source spec with one include and one define.
pub fn simple_spec(source: &str) -> CompileSpec {
    CompileSpec::builder([source])
        .include_dir("/usr/include/foo")
        .define("DEBUG", Some("1"))
        .build()
        .expect("fixture spec is valid")
}

/// Write an executable shell script standing in for a compiler.
#[cfg(unix)]
pub fn write_stub_compiler(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub compiler");
    let mut perms = std::fs::metadata(&path)
        .expect("stat stub compiler")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub compiler");
    path
}

/// A stub compiler that prints every argument it received on its own line,
/// expanding `@file` references, then exits with `exit_code`.
///
/// The expansion uses `sh` quoting rules, which agree with the GNU rules
/// for tokens without backslashes or newlines.
#[cfg(unix)]
pub fn echo_args_compiler(dir: &Path, exit_code: i32) -> PathBuf {
    let body = format!(
        r#"for arg in "$@"; do
  case "$arg" in
    @*)
      eval "set -- $(tr '\n' ' ' < "${{arg#@}}")"
      for inner in "$@"; do printf '%s\n' "$inner"; done
      ;;
    *)
      printf '%s\n' "$arg"
      ;;
  esac
done
if [ {code} -ne 0 ]; then
  echo "stub: error: compilation failed" >&2
fi
exit {code}"#,
        code = exit_code
    );
    write_stub_compiler(dir, &format!("stub-cc-{}", exit_code), &body)
}
