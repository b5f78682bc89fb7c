//! RAII guards for process-wide state: the working directory and environment variables.
//!
//! Both are restored in `Drop`, so every exit path (early `?` return, panic
//! unwinding, normal completion) leaves the process as it was found.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Changes the working directory and restores the previous one on drop.
#[derive(Debug)]
pub struct DirGuard {
    previous: PathBuf,
}

impl DirGuard {
    pub fn enter(dir: impl AsRef<Path>) -> io::Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir.as_ref())?;
        Ok(Self { previous })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        // Nothing sensible to do if the old directory vanished meanwhile.
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Environment variables owned by one launch.
///
/// Each `set` records the variable; dropping the session removes all of them.
#[derive(Debug, Default)]
pub struct EnvSession {
    owned: Vec<OsString>,
}

impl EnvSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<OsString>) {
        env::set_var(key, value.into());
        self.owned.push(OsString::from(key));
    }
}

impl Drop for EnvSession {
    fn drop(&mut self) {
        for key in self.owned.drain(..) {
            env::remove_var(&key);
        }
    }
}
