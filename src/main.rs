use anyhow::Result;
use clap::Parser;
use colored::*;
use psbuild::cli::{Cli, Commands};
use psbuild::pipelines::{self, Session};

/// CLI entry point
///
/// - Parses arguments
/// - Reports top-level errors without a Rust backtrace
/// - Dispatches to the requested pipeline
fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let session = Session::open(&cli.root, cli.debug)?;

    match cli.command {
        Commands::Native { output } => pipelines::execute_native_pipeline(&session, output),
        Commands::Publish { output, restore } => {
            pipelines::execute_publish_pipeline(&session, output, restore)
        }
        Commands::Build { output, restore } => {
            pipelines::execute_build_pipeline(&session, output, restore)
        }
        Commands::Package { version, iteration } => {
            pipelines::execute_package_pipeline(&session, version, iteration)
        }
        Commands::Launch {
            load_profile,
            zap_disable,
            bin_dir,
            no_new_window,
            args,
        } => pipelines::execute_launch_pipeline(
            &session,
            pipelines::LaunchArgs {
                load_profile,
                zap_disable,
                bin_dir,
                no_new_window,
                args,
            },
        ),
        Commands::Check => pipelines::execute_check_pipeline(&session),
    }
}
