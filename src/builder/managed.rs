use super::Builder;
use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::runner::{Invocation, Runner};
use crate::toolchain::{managed_requirements, require_tools};
use std::fmt;
use std::path::PathBuf;

/// `dotnet publish` configuration, chosen by platform alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildConfiguration {
    Linux,
    Debug,
}

impl BuildConfiguration {
    pub fn for_platform(platform: Platform) -> Self {
        if platform.is_unix() {
            BuildConfiguration::Linux
        } else {
            BuildConfiguration::Debug
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildConfiguration::Linux => "Linux",
            BuildConfiguration::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Managed host builder (dotnet CLI).
pub struct ManagedBuilder<'a> {
    platform: Platform,
    layout: &'a Layout,
    restore: bool,
}

impl<'a> ManagedBuilder<'a> {
    pub fn new(platform: Platform, layout: &'a Layout, restore: bool) -> Self {
        Self {
            platform,
            layout,
            restore,
        }
    }

    pub fn configuration(&self) -> BuildConfiguration {
        BuildConfiguration::for_platform(self.platform)
    }

    pub fn restore_invocation(&self) -> Invocation {
        Invocation::new("dotnet")
            .arg("restore")
            .arg(&self.layout.root)
    }

    pub fn publish_invocation(&self) -> Invocation {
        Invocation::new("dotnet")
            .arg("publish")
            .arg("--output")
            .arg(&self.layout.output)
            .arg("--configuration")
            .arg(self.configuration().as_str())
            .arg("--framework")
            .arg(&self.layout.config.managed.framework)
            .arg(&self.layout.managed_project)
    }
}

fn run_dotnet(runner: &dyn Runner, invocation: &Invocation) -> Result<()> {
    let exit = runner
        .run(invocation)
        .map_err(|e| BuildError::PublishFailure(format!("failed to spawn dotnet: {e}")))?;
    if !exit.success() {
        return Err(BuildError::PublishFailure(format!(
            "`{invocation}` failed with {exit}"
        )));
    }
    Ok(())
}

impl Builder for ManagedBuilder<'_> {
    fn check_env(&self, runner: &dyn Runner) -> Result<()> {
        require_tools(runner, managed_requirements(self.platform))
    }

    fn build(&self, runner: &dyn Runner) -> Result<()> {
        if self.restore {
            run_dotnet(runner, &self.restore_invocation())?;
        }
        run_dotnet(runner, &self.publish_invocation())
    }

    /// Locate the published host executable.
    fn find_output(&self) -> Result<PathBuf> {
        let exe = self.layout.published_executable(self.platform);
        if exe.exists() {
            Ok(exe)
        } else {
            Err(BuildError::MissingBuildOutput { path: exe })
        }
    }
}
