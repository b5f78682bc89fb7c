use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::runner::Runner;

/// An executable a stage needs, and how to get it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: &'static str,
    pub hint: &'static str,
}

impl ToolRequirement {
    pub const fn new(name: &'static str, hint: &'static str) -> Self {
        Self { name, hint }
    }
}

const DOTNET_HINT: &str = "see https://dotnet.github.io/getting-started/";

const LINUX_NATIVE: &[ToolRequirement] = &[
    ToolRequirement::new("cmake", "sudo apt-get install cmake"),
    ToolRequirement::new("g++", "sudo apt-get install g++"),
];

const MACOS_NATIVE: &[ToolRequirement] = &[
    ToolRequirement::new("cmake", "brew install cmake"),
    ToolRequirement::new("g++", "xcode-select --install"),
];

const MANAGED: &[ToolRequirement] = &[ToolRequirement::new("dotnet", DOTNET_HINT)];

const LINUX_PACKAGE: &[ToolRequirement] =
    &[ToolRequirement::new("fpm", "sudo gem install fpm")];

const MACOS_PACKAGE: &[ToolRequirement] = &[ToolRequirement::new("fpm", "gem install fpm")];

/// Tools required to build `libpsl-native`. Empty on Windows.
pub fn native_requirements(platform: Platform) -> &'static [ToolRequirement] {
    match platform {
        Platform::Linux => LINUX_NATIVE,
        Platform::MacOs => MACOS_NATIVE,
        Platform::Windows => &[],
    }
}

pub fn managed_requirements(_platform: Platform) -> &'static [ToolRequirement] {
    MANAGED
}

/// Tools required to produce a system package. Empty on Windows.
pub fn package_requirements(platform: Platform) -> &'static [ToolRequirement] {
    match platform {
        Platform::Linux => LINUX_PACKAGE,
        Platform::MacOs => MACOS_PACKAGE,
        Platform::Windows => &[],
    }
}

/// Check each requirement in order and stop at the first missing one.
///
/// Only one tool is ever reported; fixing it and re-running surfaces the next.
pub fn require_tools(runner: &dyn Runner, tools: &[ToolRequirement]) -> Result<()> {
    for tool in tools {
        if runner.locate(tool.name).is_none() {
            return Err(BuildError::MissingDependency {
                name: tool.name.to_string(),
                hint: tool.hint.to_string(),
            });
        }
    }
    Ok(())
}
