//! Parallel compilation of independent units.
//!
//! Each [`CompileSpec`] is its own unit of work. Units run on a rayon pool.
//! A compiler that runs and fails is recorded in the report. Any error from
//! the driver itself stops the batch: units not yet started are skipped.
//! The driver only returns fatal errors, so nothing is dropped.

use rayon::prelude::*;

use crate::builder::driver::{CommandLineCompiler, InvocationResult};
use crate::builder::errors::CompileError;
use crate::core::spec::CompileSpec;

/// Results of a batch in which every unit ran.
#[derive(Debug)]
pub struct BatchReport {
    /// One result per spec, in input order
    pub results: Vec<InvocationResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &InvocationResult> {
        self.results.iter().filter(|r| r.success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &InvocationResult> {
        self.results.iter().filter(|r| !r.success())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Compile every spec, running up to `jobs` compilers at once.
///
/// `jobs = None` uses rayon's default (one per CPU).
pub fn compile_all(
    compiler: &CommandLineCompiler,
    specs: &[CompileSpec],
    jobs: Option<usize>,
) -> Result<BatchReport, CompileError> {
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(j) = jobs {
        pool = pool.num_threads(j.max(1));
    }

    let run = || -> Result<Vec<InvocationResult>, CompileError> {
        specs.par_iter().map(|spec| compiler.compile(spec)).collect()
    };

    tracing::info!("Compiling {} units", specs.len());

    let results = match pool.build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!("failed to build thread pool, using the global one: {}", e);
            run()
        }
    }?;

    let report = BatchReport { results };
    if !report.is_success() {
        tracing::info!(
            "{} of {} units failed",
            report.failure_count(),
            report.results.len()
        );
    }
    Ok(report)
}
