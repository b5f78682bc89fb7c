use crate::platform::Platform;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Failure taxonomy shared by every build stage.
///
/// All variants are fatal; the pipeline never retries or rolls back.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build dependency '{name}' not found in PATH. Install it with: {hint}")]
    MissingDependency { name: String, hint: String },

    #[error("Compilation of {} failed: {reason}", artifact.display())]
    CompilationFailure { artifact: PathBuf, reason: String },

    #[error("dotnet publish failed: {0}")]
    PublishFailure(String),

    #[error("No published executable found at {}. Run `psbuild build` first.", path.display())]
    MissingBuildOutput { path: PathBuf },

    #[error("fpm failed: {0}")]
    PackagingFailure(String),

    #[error("Failed to launch {}: {source}", path.display())]
    LaunchFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} is not supported on {platform}")]
    PlatformUnsupported {
        operation: &'static str,
        platform: Platform,
    },

    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    #[error("unable to resolve package version: {0}")]
    VersionUnresolved(String),

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Attach the path an I/O operation was working on, for use with `map_err`.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> BuildError {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
