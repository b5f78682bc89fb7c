mod build;
mod check;
mod common;
mod launch;
mod package;

pub use build::{execute_build_pipeline, execute_native_pipeline, execute_publish_pipeline};
pub use check::{check_environment, execute_check_pipeline};
pub use common::Session;
pub use launch::{execute_launch_pipeline, LaunchArgs};
pub use package::execute_package_pipeline;
