use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::launcher::{self, LaunchOptions, Launched};

use super::common::Session;

/// Raw `launch` flags as parsed from the command line.
pub struct LaunchArgs {
    pub load_profile: bool,
    pub zap_disable: bool,
    pub bin_dir: Option<PathBuf>,
    pub no_new_window: bool,
    pub args: Vec<String>,
}

pub fn execute_launch_pipeline(session: &Session, args: LaunchArgs) -> Result<()> {
    let layout = &session.layout;
    let bin_dir = match args.bin_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => layout.root.join(dir),
        None => layout.root.join(&layout.config.launch.bin_dir),
    };

    let options = LaunchOptions {
        bin_dir,
        load_profile: args.load_profile,
        zap_disable: args.zap_disable,
        no_new_window: args.no_new_window,
        args: args.args,
    };

    if session.debug {
        println!(
            "{} Arguments: {}",
            "[DEBUG]".dimmed(),
            options.argument_list().join(" ")
        );
    }

    match launcher::launch(session.platform, layout, &options).context("Dev launch failed")? {
        Launched::Detached(child) => println!(
            "{} Started process {}",
            "[DONE]".green().bold(),
            child.id()
        ),
        Launched::Exited(Some(code)) => {
            println!("{} Process exited with code {}", "[DONE]".green().bold(), code)
        }
        Launched::Exited(None) => println!(
            "{} Process terminated by signal",
            "[WARN]".yellow()
        ),
    }

    Ok(())
}
