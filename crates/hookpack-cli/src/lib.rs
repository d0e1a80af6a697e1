mod args;
mod logging;
mod render;

pub use args::{LoadedConfig, PostinstallArgs, StrategyArg};
pub use logging::{build_filter, init_logging, DEFAULT_LOG_FILTER};
pub use render::{
    current_output_style, format_outcome_lines, render_error, render_status_line, render_warning,
    resolve_output_style, DownloadProgress, OutputStyle,
};

#[cfg(test)]
mod tests;
