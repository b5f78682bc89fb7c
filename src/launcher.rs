use crate::config::Layout;
use crate::error::{BuildError, Result};
use crate::platform::Platform;
use crate::scoped::EnvSession;
use crate::templates::{developer_runtime_config, runtime_config_name};
use colored::*;
use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command};

/// Points the runtime at the development binaries.
pub const DEVPATH: &str = "DEVPATH";
/// Disables use of precompiled (NGEN) images.
pub const ZAP_DISABLE: &str = "COMPLUS_ZapDisable";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub bin_dir: PathBuf,
    /// When false, `-noprofile` is passed ahead of `args`.
    pub load_profile: bool,
    pub zap_disable: bool,
    /// Run in the current console and wait for the child to exit.
    pub no_new_window: bool,
    pub args: Vec<String>,
}

impl LaunchOptions {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            load_profile: false,
            zap_disable: false,
            no_new_window: false,
            args: Vec::new(),
        }
    }

    pub fn argument_list(&self) -> Vec<String> {
        let mut list = Vec::with_capacity(self.args.len() + 1);
        if !self.load_profile {
            list.push("-noprofile".to_string());
        }
        list.extend(self.args.iter().cloned());
        list
    }
}

#[derive(Debug)]
pub enum Launched {
    /// Left running; the caller owns the handle.
    Detached(Child),
    /// Waited on; `None` when killed by a signal.
    Exited(Option<i32>),
}

/// Start a development build of the host.
///
/// `DEVPATH` (and `COMPLUS_ZapDisable` when requested) live only for the
/// duration of this call: the session drops on every return path, after
/// the child has inherited them.
pub fn launch(platform: Platform, layout: &Layout, options: &LaunchOptions) -> Result<Launched> {
    let mut session = EnvSession::new();
    session.set(DEVPATH, options.bin_dir.clone());
    if options.zap_disable {
        session.set(ZAP_DISABLE, "1");
    }

    let exe_name = layout.executable_name(platform);
    let config_path = options.bin_dir.join(runtime_config_name(&exe_name));
    if !config_path.exists() {
        fs::write(&config_path, developer_runtime_config()).map_err(|source| {
            BuildError::LaunchFailure {
                path: config_path.clone(),
                source,
            }
        })?;
        println!(
            "{} Generated {}",
            "[INFO]".cyan(),
            config_path.display()
        );
    }

    let exe = options.bin_dir.join(&exe_name);
    let mut cmd = Command::new(&exe);
    cmd.args(options.argument_list());
    console_mode(&mut cmd, options.no_new_window);

    println!("{} Launching {}", "[INFO]".cyan(), exe.display());
    let mut child = cmd.spawn().map_err(|source| BuildError::LaunchFailure {
        path: exe.clone(),
        source,
    })?;

    if options.no_new_window {
        let status = child
            .wait()
            .map_err(|source| BuildError::LaunchFailure { path: exe, source })?;
        return Ok(Launched::Exited(status.code()));
    }

    Ok(Launched::Detached(child))
}

#[cfg(windows)]
fn console_mode(cmd: &mut Command, no_new_window: bool) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

    if !no_new_window {
        cmd.creation_flags(CREATE_NEW_CONSOLE);
    }
}

#[cfg(not(windows))]
fn console_mode(_cmd: &mut Command, _no_new_window: bool) {}
