use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use hookpack_cli::{
    current_output_style, format_outcome_lines, init_logging, render_error, DownloadProgress,
    LoadedConfig, OutputStyle, PostinstallArgs,
};
use hookpack_installer::{resolve_layout, run_postinstall, PostinstallOutcome};
use tracing::{debug, info};

fn main() -> ExitCode {
    let cli = PostinstallArgs::parse();
    let style = current_output_style();

    match run(&cli, style) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", render_error(style, &format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &PostinstallArgs, style: OutputStyle) -> Result<ExitCode> {
    let config = match cli.load_config(|key| std::env::var(key).ok())? {
        LoadedConfig::Skip(_) => return Ok(ExitCode::SUCCESS),
        LoadedConfig::Run(config) => config,
    };
    init_logging(config.log_filter.as_deref(), style == OutputStyle::Rich)?;

    let layout = resolve_layout(&config)?;
    debug!(root = %layout.root().display(), dry_run = cli.dry_run, "starting postinstall");
    let mut progress = DownloadProgress::new(style, "downloading");
    let outcome = run_postinstall(&config, &layout, cli.dry_run, |downloaded, total| {
        progress.update(downloaded, total)
    });
    if let Some(summary) = progress.finish() {
        eprintln!("{summary}");
    }
    let outcome = outcome?;
    info!(exit_code = outcome.exit_code(), "postinstall finished");

    for line in format_outcome_lines(&outcome, style) {
        match outcome {
            PostinstallOutcome::Acquired(_) => println!("{line}"),
            _ => eprintln!("{line}"),
        }
    }

    Ok(match outcome.exit_code() {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
