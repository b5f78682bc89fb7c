pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod packager;
pub mod pipelines;
pub mod platform;
pub mod runner;
pub mod scoped;
pub mod templates;
pub mod toolchain;

pub use error::{BuildError, Result};
pub use platform::Platform;

/// Serializes unit tests that touch the working directory or environment.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
