//! `ccinvoke args` command

use anyhow::Result;

use ccinvoke::CompileError;

use crate::cli::ArgsArgs;

pub fn execute(args: ArgsArgs) -> Result<()> {
    let driver = super::driver(&args.compiler)?;
    let spec = args.spec.to_spec().map_err(CompileError::from)?;
    let tokens = driver.arguments(&spec)?;

    if args.quoted {
        let style = driver.style();
        let line: Vec<String> = tokens.iter().map(|t| style.quote(t)).collect();
        println!("{}", line.join(" "));
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(())
}
