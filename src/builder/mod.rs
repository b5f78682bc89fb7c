use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::runner::Runner;
use colored::*;
use std::fs;
use std::path::PathBuf;

pub mod managed;
pub mod native;

pub use managed::{BuildConfiguration, ManagedBuilder};
pub use native::NativeBuilder;

/// Build stage interface.
///
/// This trait defines the lifecycle every stage follows: verify the
/// toolchain, drive it, then locate what it was supposed to produce.
pub trait Builder {
    /// Stage 1: environment pre-check.
    ///
    /// Fails with `MissingDependency` naming the first tool that is not on `PATH`.
    fn check_env(&self, runner: &dyn Runner) -> Result<()>;

    /// Stage 2: build execution.
    ///
    /// # Side effects
    /// - Spawns external toolchains and blocks until they exit.
    /// - Writes intermediate artifacts and, for publish, into the layout's output.
    fn build(&self, runner: &dyn Runner) -> Result<()>;

    /// Stage 3: artifact resolution.
    ///
    /// Confirms the expected artifact exists; a successful exit code alone
    /// is not trusted.
    fn find_output(&self) -> Result<PathBuf>;
}

/// Build `libpsl-native` and copy it into the build output.
///
/// Returns `None` on Windows, where there is no native library and no
/// toolchain is touched.
pub fn build_native(
    platform: Platform,
    layout: &Layout,
    runner: &dyn Runner,
) -> Result<Option<PathBuf>> {
    if platform.is_windows() {
        println!(
            "{} Skipping native library build on {}",
            "[INFO]".cyan(),
            platform
        );
        return Ok(None);
    }

    let builder = NativeBuilder::new(platform, layout);
    builder.check_env(runner)?;

    println!(
        "{} Building {}",
        "[INFO]".cyan(),
        layout.native_library_file(platform)
    );
    builder.build(runner)?;
    let artifact = builder.find_output()?;

    fs::create_dir_all(&layout.output).map_err(BuildError::io(&layout.output))?;
    let dest = layout.output.join(layout.native_library_file(platform));
    fs::copy(&artifact, &dest).map_err(BuildError::io(&dest))?;

    println!("{} Copied {} to {}", "[INFO]".cyan(), artifact.display(), dest.display());
    Ok(Some(dest))
}

/// Publish the managed host into `layout.output`.
pub fn publish_managed(
    platform: Platform,
    layout: &Layout,
    restore: bool,
    runner: &dyn Runner,
) -> Result<()> {
    let builder = ManagedBuilder::new(platform, layout, restore);
    builder.check_env(runner)?;

    println!(
        "{} Publishing {} (configuration={}) to {}",
        "[INFO]".cyan(),
        layout.config.project.name,
        builder.configuration(),
        layout.output.display()
    );
    builder.build(runner)
}

/// Full build: native library first, then the managed publish.
///
/// The order is fixed because publish republishes the whole output tree,
/// which must already hold the native library.
pub fn build_all(
    platform: Platform,
    layout: &Layout,
    restore: bool,
    runner: &dyn Runner,
) -> Result<Option<PathBuf>> {
    fs::create_dir_all(&layout.output).map_err(BuildError::io(&layout.output))?;
    let native = build_native(platform, layout, runner)?;
    publish_managed(platform, layout, restore, runner)?;
    Ok(native)
}
