//! MSVC argument dialect.
//!
//! Token order:
//! `[/TC|/TP] (/I dir)* (/Dname[=value])* args* [/c] [/Fo<out>] sources*`

use crate::core::spec::{CompileSpec, Language, Output};

use super::ArgCollector;

pub(super) fn translate(spec: &CompileSpec) -> ArgCollector {
    let mut cmd = ArgCollector::new();

    if let Some(target) = spec.target() {
        // The architecture is fixed by which cl.exe runs.
        tracing::debug!("ignoring target `{}` for msvc", target);
    }

    // Forced language
    match spec.language() {
        Some(Language::C) => cmd = cmd.arg("/TC"),
        Some(Language::Cxx) => cmd = cmd.arg("/TP"),
        None => {}
    }

    // Include directories
    for dir in spec.include_dirs() {
        cmd = cmd.arg("/I").path(dir);
    }

    // Defines
    for (name, value) in spec.defines() {
        match value {
            Some(v) => cmd = cmd.arg(format!("/D{}={}", name, v)),
            None => cmd = cmd.arg(format!("/D{}", name)),
        }
    }

    // Custom flags
    cmd = cmd.args(spec.args().iter().cloned());

    if spec.compile_only() {
        cmd = cmd.arg("/c");
    }

    // Output
    match spec.output() {
        Some(Output::File(path)) => {
            cmd = cmd.arg(format!("/Fo{}", path.display()));
        }
        Some(Output::Directory(dir)) => {
            // A trailing separator makes cl.exe treat /Fo as a directory
            let dir = dir.display().to_string();
            if dir.ends_with('\\') || dir.ends_with('/') {
                cmd = cmd.arg(format!("/Fo{}", dir));
            } else {
                cmd = cmd.arg(format!("/Fo{}\\", dir));
            }
        }
        None => {}
    }

    // Inputs
    for source in spec.sources() {
        cmd = cmd.path(source);
    }

    cmd
}
