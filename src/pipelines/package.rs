use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;

use crate::packager::{self, PackageRequest};

use super::common::Session;

pub fn execute_package_pipeline(
    session: &Session,
    version: Option<String>,
    iteration: u32,
) -> Result<()> {
    let start_time = Instant::now();
    let request = PackageRequest { version, iteration };

    println!(
        "{} Packaging {} from {}",
        "[PSBUILD]".green().bold(),
        session.layout.config.project.name,
        session.layout.output.display()
    );

    let package_path =
        packager::package(session.platform, &session.layout, &request, &session.runner)
            .context("Packaging failed")?;

    println!(
        "{} Package completed in {:.2}s → {}",
        "[DONE]".green().bold(),
        start_time.elapsed().as_secs_f64(),
        package_path.display()
    );

    Ok(())
}
