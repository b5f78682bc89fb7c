use anyhow::{Context, Result};
use colored::*;

use crate::platform::Platform;
use crate::runner::Runner;
use crate::toolchain::{
    managed_requirements, native_requirements, package_requirements, require_tools,
};

use super::common::Session;

/// Validate every stage's toolchain for the host platform, stage by stage.
pub fn execute_check_pipeline(session: &Session) -> Result<()> {
    check_environment(session.platform, &session.runner, session.debug)?;

    println!(
        "{} Environment check passed for {}",
        "[OK]".green().bold(),
        session.platform
    );

    Ok(())
}

/// Walk native, managed, then package requirements for `platform`.
///
/// Stages with nothing to check are skipped. Stops at the first missing
/// tool; on success returns the names of the stages that were validated.
pub fn check_environment(
    platform: Platform,
    runner: &dyn Runner,
    debug: bool,
) -> Result<Vec<&'static str>> {
    let stages = [
        ("native", native_requirements(platform)),
        ("managed", managed_requirements(platform)),
        ("package", package_requirements(platform)),
    ];

    let mut passed = Vec::with_capacity(stages.len());
    for (stage, tools) in stages {
        if tools.is_empty() {
            if debug {
                println!(
                    "{} No {} toolchain needed on {}",
                    "[DEBUG]".dimmed(),
                    stage,
                    platform
                );
            }
            continue;
        }

        require_tools(runner, tools)
            .with_context(|| format!("Environment validation failed for the {stage} stage"))?;

        let names: Vec<_> = tools.iter().map(|t| t.name).collect();
        println!("{} {}: {}", "[OK]".green().bold(), stage, names.join(", "));
        passed.push(stage);
    }

    Ok(passed)
}
