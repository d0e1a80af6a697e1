use std::process::ExitCode;

use anyhow::{Context, Result};
use hookpack_cli::{current_output_style, init_logging, render_error, OutputStyle};
use hookpack_core::InstallerConfig;
use hookpack_installer::{forward, locate_binary, resolve_layout};
use tracing::debug;

fn main() -> ExitCode {
    let style = current_output_style();

    match run(style) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", render_error(style, &format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(style: OutputStyle) -> Result<i32> {
    let config = InstallerConfig::from_env()?;
    init_logging(config.log_filter.as_deref(), style == OutputStyle::Rich)?;

    let layout = resolve_layout(&config)?;
    let located = locate_binary(&config, &layout)?;
    debug!(
        binary = %located.local_path.display(),
        origin = located.origin.as_str(),
        "forwarding arguments"
    );
    forward(&located.local_path, std::env::args_os().skip(1))
        .with_context(|| format!("failed to run {}", located.local_path.display()))
}
