pub mod args;
pub mod compdb;
pub mod compile;
pub mod render;

use anyhow::{Context, Result};

use ccinvoke::util::config::{global_config_path, load_config, project_config_path};
use ccinvoke::CommandLineCompiler;

use crate::cli::CompilerArgs;

/// Build a driver from the config files overlaid with command-line flags.
pub fn driver(flags: &CompilerArgs) -> Result<CommandLineCompiler> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let global = global_config_path().unwrap_or_default();
    let mut config = load_config(&global, &project_config_path(&cwd));
    flags.apply_to(&mut config);

    let driver = config.driver();
    tracing::debug!(
        "using {} ({} dialect, {} option files)",
        driver.executable().display(),
        driver.dialect(),
        driver.style()
    );
    Ok(driver)
}
