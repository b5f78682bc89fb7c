use crate::builder::{Builder, ManagedBuilder};
use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::runner::{Invocation, Runner};
use crate::toolchain::{package_requirements, require_tools};
use colored::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Install prefix for the published tree inside the package.
const SHARE_DIR: &str = "/usr/local/share";
/// Install location for the launcher script.
const BIN_DIR: &str = "/usr/local/bin/";

/// fpm output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Deb,
    OsxPkg,
}

impl PackageFormat {
    /// `None` on Windows: no package format is produced there.
    pub fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            Platform::Linux => Some(PackageFormat::Deb),
            Platform::MacOs => Some(PackageFormat::OsxPkg),
            Platform::Windows => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageFormat::Deb => "deb",
            PackageFormat::OsxPkg => "osxpkg",
        }
    }

    pub fn runtime_dependencies(self) -> &'static [&'static str] {
        match self {
            PackageFormat::Deb => &["libunwind8", "libicu52"],
            PackageFormat::OsxPkg => &[],
        }
    }

    pub fn build_dependencies(self) -> &'static [&'static str] {
        match self {
            PackageFormat::Deb => &["dotnet", "cmake", "g++"],
            PackageFormat::OsxPkg => &[],
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asks for: an optional explicit version and the iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub version: Option<String>,
    pub iteration: u32,
}

impl Default for PackageRequest {
    fn default() -> Self {
        Self {
            version: None,
            iteration: 1,
        }
    }
}

/// Everything fpm is told about the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
    pub iteration: u32,
    pub maintainer: String,
    pub vendor: String,
    pub url: String,
    pub license: String,
    pub description: String,
    pub category: String,
    pub depends: Vec<String>,
    pub build_depends: Vec<String>,
    pub format: PackageFormat,
    /// `(source, destination)` pairs handed to fpm's `dir` input.
    pub mappings: Vec<(PathBuf, String)>,
}

impl PackageSpec {
    pub fn new(layout: &Layout, format: PackageFormat, version: String, iteration: u32) -> Self {
        let meta = &layout.config.package;
        let name = layout.config.project.name.clone();
        let share = format!("{SHARE_DIR}/{name}/");
        Self {
            version,
            iteration,
            maintainer: meta.maintainer.clone(),
            vendor: meta.vendor.clone(),
            url: meta.url.clone(),
            license: meta.license.clone(),
            description: meta.description.clone(),
            category: meta.category.clone(),
            depends: format
                .runtime_dependencies()
                .iter()
                .map(|d| d.to_string())
                .collect(),
            build_depends: format
                .build_dependencies()
                .iter()
                .map(|d| d.to_string())
                .collect(),
            format,
            mappings: vec![
                (layout.output.clone(), share),
                (layout.launcher.clone(), BIN_DIR.to_string()),
            ],
            name,
        }
    }

    /// The single fpm invocation producing the package.
    pub fn fpm_invocation(&self, cwd: &Path) -> Invocation {
        let mut inv = Invocation::new("fpm")
            .args(["--force", "--verbose"])
            .args(["--name", self.name.as_str()])
            .args(["--version", self.version.as_str()])
            .args(["--iteration", self.iteration.to_string().as_str()])
            .args(["--maintainer", self.maintainer.as_str()])
            .args(["--vendor", self.vendor.as_str()])
            .args(["--url", self.url.as_str()])
            .args(["--license", self.license.as_str()])
            .args(["--description", self.description.as_str()])
            .args(["--category", self.category.as_str()]);

        for dep in &self.depends {
            inv = inv.args(["--depends", dep.as_str()]);
        }
        for dep in &self.build_depends {
            inv = inv.args(["--deb-build-depends", dep.as_str()]);
        }

        inv = inv.args(["-t", self.format.as_str(), "-s", "dir"]);
        for (source, dest) in &self.mappings {
            inv = inv.arg(mapping_arg(source, dest));
        }
        inv.current_dir(cwd)
    }

    /// File name fpm gives the package it writes.
    pub fn file_name(&self) -> String {
        match self.format {
            PackageFormat::Deb => format!(
                "{}_{}-{}_{}.deb",
                self.name,
                self.version,
                self.iteration,
                deb_arch(std::env::consts::ARCH)
            ),
            PackageFormat::OsxPkg => format!("{}-{}.pkg", self.name, self.version),
        }
    }
}

/// `source=dest`; directory sources keep a trailing slash so fpm copies
/// their contents rather than the directory itself.
fn mapping_arg(source: &Path, dest: &str) -> String {
    let mut src = source.display().to_string();
    if source.is_dir() && !src.ends_with('/') {
        src.push('/');
    }
    format!("{src}={dest}")
}

fn deb_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "i386",
        other => other,
    }
}

/// Resolve the package version: explicit value first, then the latest git tag.
///
/// A single leading `v` is dropped from the tag (`v1.2.3` becomes `1.2.3`).
pub fn resolve_version(
    explicit: Option<&str>,
    git_dir: &Path,
    runner: &dyn Runner,
) -> Result<String> {
    if let Some(version) = explicit.map(str::trim) {
        if version.is_empty() {
            return Err(BuildError::VersionUnresolved(
                "explicit version is empty".into(),
            ));
        }
        return Ok(version.to_string());
    }

    let describe = Invocation::new("git")
        .arg(format!("--git-dir={}", git_dir.display()))
        .args(["describe", "--tags", "--abbrev=0"]);
    let captured = runner
        .capture(&describe)
        .map_err(|e| BuildError::VersionUnresolved(format!("failed to run git: {e}")))?;
    if !captured.exit.success() {
        return Err(BuildError::VersionUnresolved(format!(
            "`{describe}` failed with {}: {}",
            captured.exit,
            captured.stderr.trim()
        )));
    }

    let tag = captured.stdout.trim();
    let version = tag.strip_prefix('v').unwrap_or(tag);
    if version.is_empty() {
        return Err(BuildError::VersionUnresolved(
            "no tag found; pass --version explicitly".into(),
        ));
    }
    Ok(version.to_string())
}

/// Mirror owner permission bits onto group and other (`chmod -R go=u`).
///
/// Symlinks are left alone. Errors name the entry that could not be updated.
#[cfg(unix)]
pub fn normalize_permissions(root: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let meta = std::fs::symlink_metadata(root).map_err(BuildError::io(root))?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }

    let mode = meta.permissions().mode();
    let wanted = mirror_owner_bits(mode);
    if wanted != mode {
        std::fs::set_permissions(root, std::fs::Permissions::from_mode(wanted))
            .map_err(BuildError::io(root))?;
    }

    if meta.is_dir() {
        for entry in std::fs::read_dir(root).map_err(BuildError::io(root))? {
            let entry = entry.map_err(BuildError::io(root))?;
            normalize_permissions(&entry.path())?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn normalize_permissions(_root: &Path) -> Result<()> {
    Ok(())
}

pub fn mirror_owner_bits(mode: u32) -> u32 {
    let owner = (mode >> 6) & 0o7;
    (mode & !0o077) | (owner << 3) | owner
}

/// Produce a system package from an already published build output.
///
/// Never triggers a build; fails with `MissingBuildOutput` instead.
pub fn package(
    platform: Platform,
    layout: &Layout,
    request: &PackageRequest,
    runner: &dyn Runner,
) -> Result<PathBuf> {
    let format = PackageFormat::for_platform(platform).ok_or(BuildError::PlatformUnsupported {
        operation: "Building packages",
        platform,
    })?;

    require_tools(runner, package_requirements(platform))?;

    let exe = ManagedBuilder::new(platform, layout, false).find_output()?;
    println!("{} Packaging {}", "[INFO]".cyan(), exe.display());

    normalize_permissions(&layout.output)?;

    let version = resolve_version(request.version.as_deref(), &layout.git_dir, runner)?;
    let spec = PackageSpec::new(layout, format, version, request.iteration);
    println!(
        "{} Creating {} package {} {}-{}",
        "[INFO]".cyan(),
        spec.format,
        spec.name,
        spec.version,
        spec.iteration
    );

    let fpm = spec.fpm_invocation(&layout.root);
    let exit = runner
        .run(&fpm)
        .map_err(|e| BuildError::PackagingFailure(format!("failed to spawn fpm: {e}")))?;
    if !exit.success() {
        return Err(BuildError::PackagingFailure(format!("fpm exited with {exit}")));
    }

    let produced = layout.root.join(spec.file_name());
    if !produced.exists() {
        println!(
            "{} fpm succeeded but {} was not found; check its output above",
            "[WARN]".yellow(),
            produced.display()
        );
    }
    Ok(produced)
}
