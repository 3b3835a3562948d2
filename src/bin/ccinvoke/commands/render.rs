//! `ccinvoke render` command

use anyhow::Result;

use ccinvoke::util::fs::write_string;
use ccinvoke::CompileError;

use crate::cli::RenderArgs;

pub fn execute(args: RenderArgs) -> Result<()> {
    let driver = super::driver(&args.compiler)?;
    let spec = args.spec.to_spec().map_err(CompileError::from)?;
    let tokens = driver.arguments(&spec)?;
    let contents = driver.style().render_file(&tokens);

    match args.write {
        Some(path) => {
            write_string(&path, &contents)?;
            eprintln!(
                "       Wrote {} ({} tokens, {} style)",
                path.display(),
                tokens.len(),
                driver.style()
            );
        }
        None => print!("{}", contents),
    }

    Ok(())
}
