use crate::error::{BuildError, Result};
use crate::platform::Platform;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "psbuild.toml";

/// Project configuration.
/// Mirrors `psbuild.toml` at the repository root; every field has a default.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    pub native: NativeConfig,
    pub managed: ManagedConfig,
    pub package: PackageMetadata,
    pub launch: LaunchConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectInfo {
    /// Package name, also used for the install share directory.
    pub name: String,
    /// Executable file name (without extension) inside the build output.
    pub executable: String,
    /// Build output directory, relative to the root.
    pub output: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "powershell".into(),
            executable: "powershell".into(),
            output: "bin".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct NativeConfig {
    /// CMake project directory of the native library.
    pub dir: String,
    /// Library base name; `psl-native` yields `libpsl-native.so`.
    pub library: String,
    pub build_type: String,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            dir: "src/libpsl-native".into(),
            library: "psl-native".into(),
            build_type: "Debug".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ManagedConfig {
    /// Entry-point project handed to `dotnet publish`.
    pub project: String,
    pub framework: String,
}

impl Default for ManagedConfig {
    fn default() -> Self {
        Self {
            project: "src/Microsoft.PowerShell.Linux.Host".into(),
            framework: "netstandardapp1.5".into(),
        }
    }
}

/// Static identity metadata passed to fpm.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct PackageMetadata {
    pub maintainer: String,
    pub vendor: String,
    pub url: String,
    pub license: String,
    pub description: String,
    pub category: String,
    /// Launcher script installed into the executable path.
    pub launcher: String,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            maintainer: "Andrew Schwartzmeyer <andschwa@microsoft.com>".into(),
            vendor: "Microsoft <mageng@microsoft.com>".into(),
            url: "https://github.com/PowerShell/PowerShell".into(),
            license: "Unlicensed".into(),
            description: "PowerShell is an automation and configuration management platform.\n\
                          It consists of a cross-platform command-line shell and associated scripting language."
                .into(),
            category: "shells".into(),
            launcher: "package/powershell".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Default binary directory for `psbuild launch`, relative to the root.
    pub bin_dir: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            bin_dir: "binFull".into(),
        }
    }
}

/// Load `psbuild.toml` from `root`, falling back to defaults when absent.
///
/// A present but malformed file is an error rather than a silent default.
pub fn load(root: &Path) -> Result<ProjectConfig> {
    let config_path = root.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(BuildError::io(&config_path))?;
    parse(&content).map_err(|message| BuildError::Config {
        path: config_path,
        message,
    })
}

fn parse(content: &str) -> std::result::Result<ProjectConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Absolute locations every stage works with, resolved once from the root.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    pub output: PathBuf,
    pub native_dir: PathBuf,
    pub managed_project: PathBuf,
    pub launcher: PathBuf,
    pub git_dir: PathBuf,
    pub config: ProjectConfig,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        let root = root.into();
        Self {
            output: root.join(&config.project.output),
            native_dir: root.join(&config.native.dir),
            managed_project: root.join(&config.managed.project),
            launcher: root.join(&config.package.launcher),
            git_dir: root.join(".git"),
            root,
            config,
        }
    }

    /// Override the build output directory (`--output`).
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        if let Some(dir) = output {
            self.output = if dir.is_absolute() {
                dir
            } else {
                self.root.join(dir)
            };
        }
        self
    }

    /// Where the native build system leaves the shared library.
    pub fn native_artifact(&self, platform: Platform) -> PathBuf {
        self.native_dir
            .join("src")
            .join(self.native_library_file(platform))
    }

    pub fn native_library_file(&self, platform: Platform) -> String {
        format!(
            "lib{}.{}",
            self.config.native.library,
            platform.shared_library_extension()
        )
    }

    pub fn executable_name(&self, platform: Platform) -> String {
        format!(
            "{}{}",
            self.config.project.executable,
            platform.executable_suffix()
        )
    }

    /// The published host executable inside the build output.
    pub fn published_executable(&self, platform: Platform) -> PathBuf {
        self.output.join(self.executable_name(platform))
    }
}
