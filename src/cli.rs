use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface of the build orchestrator.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Repository root holding the sources and `psbuild.toml`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Print every external command before running it
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// All supported subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Build libpsl-native and copy it into the build output (Linux/macOS only)
    Native {
        /// Build output directory; defaults to `bin` under the root
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Publish the managed host into the build output
    Publish {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run `dotnet restore` before publishing
        #[arg(long, default_value_t = false)]
        restore: bool,
    },

    /// Build the native library, then publish the managed host
    Build {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run `dotnet restore` before publishing
        #[arg(long, default_value_t = false)]
        restore: bool,
    },

    /// Create a deb (Linux) or osxpkg (macOS) package from the build output
    Package {
        /// Package version; defaults to the latest git tag without its leading `v`
        #[arg(long)]
        version: Option<String>,

        /// Package iteration for rebuilds of the same version
        #[arg(long, default_value_t = 1)]
        iteration: u32,
    },

    /// Start a development build with DEVPATH pointing at its binaries
    Launch {
        /// Load the user profile (by default `-noprofile` is passed)
        #[arg(long, default_value_t = false)]
        load_profile: bool,

        /// Set COMPLUS_ZapDisable to bypass precompiled images
        #[arg(long, default_value_t = false)]
        zap_disable: bool,

        /// Directory holding the binaries; defaults to `binFull` under the root
        #[arg(long)]
        bin_dir: Option<PathBuf>,

        /// Stay in this console and wait for the process to exit
        #[arg(long, default_value_t = false)]
        no_new_window: bool,

        /// Arguments passed through to the launched executable
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Verify every toolchain the host platform needs
    Check,
}
