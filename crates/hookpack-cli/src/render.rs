use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use hookpack_installer::PostinstallOutcome;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn resolve_output_style(stderr_is_tty: bool, no_color: bool) -> OutputStyle {
    if stderr_is_tty && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub fn current_output_style() -> OutputStyle {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    resolve_output_style(std::io::stderr().is_terminal(), no_color)
}

pub fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

pub fn render_warning(style: OutputStyle, message: &str) -> String {
    render_labelled(style, "warning", warning_style(), message)
}

pub fn render_error(style: OutputStyle, message: &str) -> String {
    render_labelled(style, "error", error_style(), message)
}

/// Lines to show for a finished postinstall run. Successful and skipped
/// runs stay quiet; the installed binary prints its own output.
pub fn format_outcome_lines(outcome: &PostinstallOutcome, style: OutputStyle) -> Vec<String> {
    match outcome {
        PostinstallOutcome::Skipped { .. } | PostinstallOutcome::Installed(_) => Vec::new(),
        PostinstallOutcome::Acquired(result) => vec![render_status_line(
            style,
            "ok",
            &format!(
                "{} binary ready at {}",
                result.origin.as_str(),
                result.local_path.display()
            ),
        )],
        PostinstallOutcome::HookInstallFailed { binary, code } => {
            let status = match code {
                Some(code) => format!("exited with status {code}"),
                None => "was terminated by a signal".to_string(),
            };
            vec![render_error(
                style,
                &format!("{} install -f {status}", binary.display()),
            )]
        }
        PostinstallOutcome::SpawnWarning { message, .. } => {
            vec![render_warning(style, message)]
        }
    }
}

/// Byte progress for one download, drawn only in rich mode.
pub struct DownloadProgress {
    style: OutputStyle,
    label: String,
    downloaded: u64,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl DownloadProgress {
    pub fn new(style: OutputStyle, label: &str) -> Self {
        Self {
            style,
            label: label.to_string(),
            downloaded: 0,
            progress_bar: None,
            started_at: Instant::now(),
        }
    }

    pub fn update(&mut self, downloaded: u64, total: Option<u64>) {
        self.downloaded = downloaded;
        if self.style == OutputStyle::Plain {
            return;
        }

        let progress_bar = self
            .progress_bar
            .get_or_insert_with(|| start_progress_bar(&self.label, total));
        if let Some(total) = total {
            progress_bar.set_length(total.max(1));
        }
        progress_bar.set_position(downloaded);
    }

    /// Clears the bar and returns a summary line if anything was drawn.
    pub fn finish(mut self) -> Option<String> {
        let progress_bar = self.progress_bar.take()?;
        progress_bar.finish_and_clear();
        Some(render_progress_summary(
            &self.label,
            self.downloaded,
            self.started_at.elapsed(),
        ))
    }
}

fn start_progress_bar(label: &str, total: Option<u64>) -> ProgressBar {
    let progress_bar = match total {
        Some(total) => ProgressBar::new(total.max(1)),
        None => ProgressBar::new_spinner(),
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.cyan.bold} {msg:<12} [{bar:20.cyan/blue}] {bytes:>10}/{total_bytes:10} {elapsed_precise}",
    ) {
        progress_bar.set_style(style.tick_chars("|/-\\ ").progress_chars("=>-"));
    }
    progress_bar.set_message(label.to_string());
    progress_bar.enable_steady_tick(Duration::from_millis(80));
    progress_bar
}

pub(crate) fn render_progress_summary(label: &str, bytes: u64, elapsed: Duration) -> String {
    format!(
        "{} {} complete in {}",
        colorize(progress_label_style(), label),
        HumanBytes(bytes),
        format_elapsed(elapsed)
    )
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

fn render_labelled(style: OutputStyle, label: &str, label_style: Style, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("{label}: {message}"),
        OutputStyle::Rich => format!("{}: {message}", colorize(label_style, label)),
    }
}

fn warning_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightYellow.into()))
        .effects(Effects::BOLD)
}

fn error_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
