//! GCC/Clang argument dialect.
//!
//! Token order:
//! `[target] [-x lang] (-I dir)* (-Dname[=value])* [-fPIC] args* [-c] [-o out] sources*`

use crate::core::spec::{CompileSpec, Output, SpecError};

use super::{ArgCollector, Dialect};

pub(super) fn translate(spec: &CompileSpec, family: Dialect) -> Result<ArgCollector, SpecError> {
    let mut cmd = ArgCollector::new();

    // Target architecture
    if let Some(target) = spec.target() {
        cmd = cmd.arg(target_flag(target, family));
    }

    // Forced language
    if let Some(lang) = spec.language() {
        cmd = cmd.arg("-x").arg(lang.as_str());
    }

    // Include directories
    for dir in spec.include_dirs() {
        cmd = cmd.arg("-I").path(dir);
    }

    // Defines
    for (name, value) in spec.defines() {
        match value {
            Some(v) => cmd = cmd.arg(format!("-D{}={}", name, v)),
            None => cmd = cmd.arg(format!("-D{}", name)),
        }
    }

    if spec.position_independent() {
        cmd = cmd.arg("-fPIC");
    }

    // Custom flags
    cmd = cmd.args(spec.args().iter().cloned());

    if spec.compile_only() {
        cmd = cmd.arg("-c");
    }

    // Output
    match spec.output() {
        Some(Output::File(path)) => {
            cmd = cmd.arg("-o").path(path);
        }
        Some(Output::Directory(dir)) => {
            // gcc has no object-directory switch, so only one object can be named
            let [source] = spec.sources() else {
                return Err(SpecError::OutputDirectoryUnsupported {
                    dialect: family.as_str(),
                    count: spec.sources().len(),
                });
            };
            cmd = cmd.arg("-o").path(&family.object_path(dir, source));
        }
        None => {}
    }

    // Inputs
    for source in spec.sources() {
        cmd = cmd.path(source);
    }

    Ok(cmd)
}

/// Map an architecture tag to this family's flag.
fn target_flag(target: &str, family: Dialect) -> String {
    if family == Dialect::Clang {
        return format!("--target={}", target);
    }

    match target {
        "x86" | "i386" | "i486" | "i586" | "i686" => "-m32".to_string(),
        "x86_64" | "amd64" | "x64" => "-m64".to_string(),
        other => format!("-march={}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::Language;

    fn tokens(spec: &CompileSpec, family: Dialect) -> Vec<String> {
        translate(spec, family).unwrap().into_tokens()
    }

    #[test]
    fn test_full_order() {
        let spec = CompileSpec::builder(["src/main.c"])
            .target("x86_64")
            .language(Language::C)
            .include_dir("include")
            .define("NDEBUG", None)
            .define("VERSION", Some("\"1.0\""))
            .position_independent(true)
            .args(["-O2", "-Wall"])
            .compile_only(true)
            .output_file("build/main.o")
            .build()
            .unwrap();

        assert_eq!(
            tokens(&spec, Dialect::Gcc),
            [
                "-m64",
                "-x",
                "c",
                "-I",
                "include",
                "-DNDEBUG",
                "-DVERSION=\"1.0\"",
                "-fPIC",
                "-O2",
                "-Wall",
                "-c",
                "-o",
                "build/main.o",
                "src/main.c",
            ]
        );
    }

    #[test]
    fn test_clang_target_triple() {
        let spec = CompileSpec::builder(["a.c"])
            .target("aarch64-unknown-linux-gnu")
            .build()
            .unwrap();
        assert_eq!(
            tokens(&spec, Dialect::Clang),
            ["--target=aarch64-unknown-linux-gnu", "a.c"]
        );
    }

    #[test]
    fn test_gcc_target_flags() {
        assert_eq!(target_flag("i686", Dialect::Gcc), "-m32");
        assert_eq!(target_flag("amd64", Dialect::Gcc), "-m64");
        assert_eq!(target_flag("armv7-a", Dialect::Gcc), "-march=armv7-a");
    }

    #[test]
    fn test_output_dir_single_source() {
        let spec = CompileSpec::builder(["src/util.cpp"])
            .output_dir("obj")
            .compile_only(true)
            .build()
            .unwrap();

        let expected = std::path::Path::new("obj").join("util.o").to_string_lossy().into_owned();
        assert_eq!(
            tokens(&spec, Dialect::Gcc),
            ["-c", "-o", expected.as_str(), "src/util.cpp"]
        );
    }

    #[test]
    fn test_output_dir_many_sources_rejected() {
        let spec = CompileSpec::builder(["a.c", "b.c"])
            .output_dir("obj")
            .build()
            .unwrap();

        let err = translate(&spec, Dialect::Gcc).unwrap_err();
        assert_eq!(
            err,
            SpecError::OutputDirectoryUnsupported {
                dialect: "gcc",
                count: 2
            }
        );
    }

    #[test]
    fn test_define_value_with_spaces_is_one_token() {
        let spec = CompileSpec::builder(["a.c"])
            .define("MSG", Some("hello world"))
            .build()
            .unwrap();
        assert_eq!(tokens(&spec, Dialect::Gcc), ["-DMSG=hello world", "a.c"]);
    }
}
