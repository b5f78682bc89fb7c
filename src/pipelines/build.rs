use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::builder::{self, BuildConfiguration};

use super::common::Session;

/// Native stage only.
pub fn execute_native_pipeline(session: &Session, output: Option<PathBuf>) -> Result<()> {
    let start_time = Instant::now();
    let layout = session.layout_with_output(output);

    let artifact = builder::build_native(session.platform, &layout, &session.runner)
        .context("Native library build failed")?;

    match artifact {
        Some(path) => println!(
            "{} Native build completed in {:.2}s → {}",
            "[DONE]".green().bold(),
            start_time.elapsed().as_secs_f64(),
            path.display()
        ),
        None => println!(
            "{} Nothing to build on {}",
            "[DONE]".green().bold(),
            session.platform
        ),
    }

    Ok(())
}

/// Managed publish only. Assumes the native library is already in the output.
pub fn execute_publish_pipeline(
    session: &Session,
    output: Option<PathBuf>,
    restore: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let layout = session.layout_with_output(output);

    builder::publish_managed(session.platform, &layout, restore, &session.runner)
        .context("Managed publish failed")?;

    println!(
        "{} Publish completed in {:.2}s → {}",
        "[DONE]".green().bold(),
        start_time.elapsed().as_secs_f64(),
        layout.output.display()
    );

    Ok(())
}

/// Execute the full build pipeline
///
/// Flow:
/// 1. Create the build output directory
/// 2. Native library (Linux/macOS): toolchain check, cmake, make, make test, copy
/// 3. Managed publish with the platform's configuration
pub fn execute_build_pipeline(
    session: &Session,
    output: Option<PathBuf>,
    restore: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let layout = session.layout_with_output(output);

    println!(
        "{} Building {} for {} [{}]",
        "[PSBUILD]".green().bold(),
        layout.config.project.name,
        session.platform,
        BuildConfiguration::for_platform(session.platform)
    );

    builder::build_all(session.platform, &layout, restore, &session.runner)
        .context("Build failed")?;

    println!(
        "{} Build completed in {:.2}s → {}",
        "[DONE]".green().bold(),
        start_time.elapsed().as_secs_f64(),
        layout.output.display()
    );

    Ok(())
}
