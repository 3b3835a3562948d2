//! `ccinvoke compdb` command

use anyhow::{Context, Result};

use ccinvoke::builder::compile_commands::write_compile_commands;
use ccinvoke::CompileError;

use crate::cli::CompdbArgs;

pub fn execute(args: CompdbArgs) -> Result<()> {
    let driver = super::driver(&args.compiler)?;
    let directory = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    // One entry per translation unit, each naming only its own source
    let mut commands = Vec::new();
    for spec in args.spec.unit_specs().map_err(CompileError::from)? {
        commands.extend(driver.compile_commands(&spec, &directory)?);
    }

    write_compile_commands(&args.db, &commands)?;
    eprintln!(
        "       Wrote {} ({} entries)",
        args.db.display(),
        commands.len()
    );

    Ok(())
}
