use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::config::{self, Layout};
use crate::platform::{self, Platform};
use crate::runner::SystemRunner;

/// Per-invocation context shared by every pipeline.
pub struct Session {
    pub platform: Platform,
    pub layout: Layout,
    pub runner: SystemRunner,
    pub debug: bool,
}

impl Session {
    /// Detect the platform, load `psbuild.toml` and resolve the layout.
    pub fn open(root: &Path, debug: bool) -> Result<Self> {
        let root = std::path::absolute(root)
            .with_context(|| format!("Invalid repository root: {}", root.display()))?;
        let platform = platform::detect().context("Platform detection failed")?;
        let config = config::load(&root).context("Failed to load configuration")?;

        if debug {
            println!(
                "{} Platform: {}, root: {}",
                "[DEBUG]".dimmed(),
                platform,
                root.display()
            );
        }

        Ok(Self {
            platform,
            layout: Layout::new(root, config),
            runner: SystemRunner::new(debug),
            debug,
        })
    }

    /// Layout with the `--output` override applied.
    pub fn layout_with_output(&self, output: Option<PathBuf>) -> Layout {
        self.layout.clone().with_output(output)
    }
}
