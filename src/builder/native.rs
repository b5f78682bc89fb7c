use super::Builder;
use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::runner::{Invocation, Runner};
use crate::scoped::DirGuard;
use crate::toolchain::{native_requirements, require_tools};
use std::path::PathBuf;

/// `libpsl-native` builder
///
/// Drives CMake and make inside the library's source directory. Only
/// meaningful on Linux and macOS.
pub struct NativeBuilder<'a> {
    platform: Platform,
    layout: &'a Layout,
}

impl<'a> NativeBuilder<'a> {
    pub fn new(platform: Platform, layout: &'a Layout) -> Self {
        Self { platform, layout }
    }

    /// Configure, compile, then run the library's own test suite.
    pub fn steps(&self) -> Vec<Invocation> {
        vec![
            Invocation::new("cmake").args([
                format!("-DCMAKE_BUILD_TYPE={}", self.layout.config.native.build_type),
                ".".to_string(),
            ]),
            Invocation::new("make").arg("-j"),
            Invocation::new("make").arg("test"),
        ]
    }

    fn failure(&self, reason: String) -> BuildError {
        BuildError::CompilationFailure {
            artifact: self.layout.native_artifact(self.platform),
            reason,
        }
    }
}

impl Builder for NativeBuilder<'_> {
    fn check_env(&self, runner: &dyn Runner) -> Result<()> {
        require_tools(runner, native_requirements(self.platform))
    }

    /// Runs every step inside the native directory.
    ///
    /// The previous working directory is restored when the guard drops,
    /// including when a step fails.
    fn build(&self, runner: &dyn Runner) -> Result<()> {
        let _cwd = DirGuard::enter(&self.layout.native_dir).map_err(|e| {
            self.failure(format!(
                "cannot enter {}: {e}",
                self.layout.native_dir.display()
            ))
        })?;

        for step in self.steps() {
            let exit = runner
                .run(&step)
                .map_err(|e| self.failure(format!("failed to spawn {}: {e}", step.program)))?;
            if !exit.success() {
                return Err(self.failure(format!("`{step}` failed with {exit}")));
            }
        }

        Ok(())
    }

    fn find_output(&self) -> Result<PathBuf> {
        let artifact = self.layout.native_artifact(self.platform);
        if artifact.is_file() {
            Ok(artifact)
        } else {
            Err(self.failure("build reported success but the library was not produced".into()))
        }
    }
}
