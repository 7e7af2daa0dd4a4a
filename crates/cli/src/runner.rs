//! Boots an image and drives the engine to completion.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use larum_vm::{BuiltinTable, ExecutionEngine, ExecutionEngineLimits};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads settings, boots the image and runs it until HALT or FAULT.
///
/// Errors are returned only for problems that stop the image from starting:
/// bad settings or a rejected boot image. A fault during execution is left
/// on the returned engine.
pub fn run(args: &CliArgs, output: Box<dyn Write>) -> Result<ExecutionEngine> {
    let settings = args.settings().with_context(|| match &args.config {
        Some(path) => format!("invalid settings in {}", path.display()),
        None => "invalid settings".to_string(),
    })?;
    debug!(?settings, "vm settings");

    let limits = ExecutionEngineLimits::from(&settings);
    let mut engine =
        ExecutionEngine::with_output(Arc::new(BuiltinTable::standard()), limits, output);

    let size = engine
        .boot_file(&args.image)
        .with_context(|| format!("cannot boot {}", args.image.display()))?;
    info!(
        image = %args.image.display(),
        words = size,
        capacity = limits.ram_size,
        "boot image loaded"
    );

    let state = engine.execute();
    info!(?state, steps = engine.steps(), "execution finished");
    Ok(engine)
}
