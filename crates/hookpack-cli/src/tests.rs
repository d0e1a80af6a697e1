use super::*;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hookpack_core::{InstallerConfig, InstallerError, StrategyPreference};
use hookpack_installer::{AcquisitionResult, Origin, PostinstallOutcome};

use crate::render::{format_elapsed, render_progress_summary};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    }
}

#[test]
fn resolve_output_style_uses_rich_on_tty() {
    assert_eq!(resolve_output_style(true, false), OutputStyle::Rich);
}

#[test]
fn resolve_output_style_uses_plain_when_stderr_is_not_tty() {
    assert_eq!(resolve_output_style(false, false), OutputStyle::Plain);
}

#[test]
fn resolve_output_style_honours_no_color() {
    assert_eq!(resolve_output_style(true, true), OutputStyle::Plain);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "bundled binary ready"),
        "bundled binary ready"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "bundled binary ready"),
        "[OK] bundled binary ready"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "other", "pending"),
        "[..] pending"
    );
}

#[test]
fn render_error_plain_has_stable_prefix() {
    assert_eq!(
        render_error(OutputStyle::Plain, "download failed"),
        "error: download failed"
    );
    assert_eq!(
        render_warning(OutputStyle::Plain, "spawn failed"),
        "warning: spawn failed"
    );
}

#[test]
fn render_error_rich_colours_only_the_label() {
    let line = render_error(OutputStyle::Rich, "download failed");
    assert!(line.contains("error"));
    assert!(line.ends_with(": download failed"));
    assert!(line.contains('\u{1b}'));
}

#[test]
fn format_outcome_lines_are_empty_for_quiet_outcomes() {
    let skipped = PostinstallOutcome::Skipped {
        reason: "CI is set".to_string(),
    };
    assert!(format_outcome_lines(&skipped, OutputStyle::Plain).is_empty());

    let installed = PostinstallOutcome::Installed(AcquisitionResult {
        local_path: PathBuf::from("/pkg/bin/lefthook"),
        origin: Origin::Downloaded,
    });
    assert!(format_outcome_lines(&installed, OutputStyle::Rich).is_empty());
}

#[test]
fn format_outcome_lines_reports_dry_run_path() {
    let outcome = PostinstallOutcome::Acquired(AcquisitionResult {
        local_path: PathBuf::from("/pkg/bin/lefthook"),
        origin: Origin::Downloaded,
    });
    assert_eq!(
        format_outcome_lines(&outcome, OutputStyle::Plain),
        vec!["downloaded binary ready at /pkg/bin/lefthook".to_string()]
    );
}

#[test]
fn format_outcome_lines_reports_failed_hook_install() {
    let outcome = PostinstallOutcome::HookInstallFailed {
        binary: PathBuf::from("/pkg/bin/lefthook"),
        code: Some(3),
    };
    assert_eq!(
        format_outcome_lines(&outcome, OutputStyle::Plain),
        vec!["error: /pkg/bin/lefthook install -f exited with status 3".to_string()]
    );

    let killed = PostinstallOutcome::HookInstallFailed {
        binary: PathBuf::from("/pkg/bin/lefthook"),
        code: None,
    };
    assert!(format_outcome_lines(&killed, OutputStyle::Plain)[0].ends_with("terminated by a signal"));
}

#[test]
fn format_outcome_lines_keeps_spawn_warning_text() {
    let outcome = PostinstallOutcome::SpawnWarning {
        binary: PathBuf::from("/pkg/bin/lefthook"),
        message: "'lefthook install' command failed. Try running it manually.".to_string(),
    };
    assert_eq!(
        format_outcome_lines(&outcome, OutputStyle::Plain),
        vec![
            "warning: 'lefthook install' command failed. Try running it manually.".to_string()
        ]
    );
}

#[test]
fn download_progress_plain_draws_nothing() {
    let mut progress = DownloadProgress::new(OutputStyle::Plain, "downloading");
    progress.update(10, Some(100));
    progress.update(100, Some(100));
    assert_eq!(progress.finish(), None);
}

#[test]
fn progress_summary_reports_bytes_and_elapsed() {
    let line = render_progress_summary("downloading", 2048, Duration::from_millis(1250));
    assert!(line.contains("downloading"));
    assert!(line.contains("KiB"));
    assert!(line.ends_with("complete in 1.250s"));
}

#[test]
fn format_elapsed_pads_milliseconds() {
    assert_eq!(format_elapsed(Duration::from_millis(3007)), "3.007s");
}

#[test]
fn postinstall_args_parse_flags() {
    let args = PostinstallArgs::try_parse_from([
        "hookpack-postinstall",
        "--strategy",
        "download",
        "--install-root",
        "/pkg",
        "--dry-run",
    ])
    .expect("flags must parse");
    assert_eq!(args.strategy, Some(StrategyArg::Download));
    assert_eq!(args.install_root, Some(PathBuf::from("/pkg")));
    assert!(args.dry_run);
}

#[test]
fn postinstall_args_reject_unknown_strategy() {
    let result =
        PostinstallArgs::try_parse_from(["hookpack-postinstall", "--strategy", "docker"]);
    assert!(result.is_err());
}

#[test]
fn postinstall_args_override_environment_config() {
    let args = PostinstallArgs::try_parse_from([
        "hookpack-postinstall",
        "--strategy",
        "bundled",
        "--install-root",
        "/pkg",
    ])
    .expect("flags must parse");
    let mut config = InstallerConfig {
        strategy: StrategyPreference::Download,
        install_root: Some(PathBuf::from("/elsewhere")),
        ..InstallerConfig::default()
    };
    args.apply(&mut config);
    assert_eq!(config.strategy, StrategyPreference::Bundled);
    assert_eq!(config.install_root, Some(PathBuf::from("/pkg")));
}

#[test]
fn postinstall_args_without_flags_keep_environment_config() {
    let args = PostinstallArgs::try_parse_from(["hookpack-postinstall"]).expect("must parse");
    let mut config = InstallerConfig {
        strategy: StrategyPreference::Download,
        ..InstallerConfig::default()
    };
    args.apply(&mut config);
    assert_eq!(config.strategy, StrategyPreference::Download);
    assert_eq!(config.install_root, None);
    assert!(!args.dry_run);
}

#[test]
fn build_filter_accepts_default_and_module_directives() {
    build_filter(None).expect("default filter must parse");
    build_filter(Some("hookpack_installer=debug,warn")).expect("module directive must parse");
    assert_eq!(DEFAULT_LOG_FILTER, "warn");
}

#[test]
fn load_config_skips_in_ci_even_with_malformed_knobs() {
    let args = PostinstallArgs::try_parse_from(["hookpack-postinstall"]).expect("must parse");
    let loaded = args
        .load_config(lookup_from(&[
            ("CI", "true"),
            ("HOOKPACK_DOWNLOAD_ATTEMPTS", "abc"),
            ("HOOKPACK_STRATEGY", "docker"),
        ]))
        .expect("skipped run must not parse other knobs");
    match loaded {
        LoadedConfig::Skip(decision) => assert!(!decision.should_run),
        LoadedConfig::Run(config) => panic!("unexpected run with {config:?}"),
    }
}

#[test]
fn load_config_reports_malformed_knobs_when_running() {
    let args = PostinstallArgs::try_parse_from(["hookpack-postinstall"]).expect("must parse");
    let err = args
        .load_config(lookup_from(&[
            ("CI", "true"),
            ("LEFTHOOK", "1"),
            ("HOOKPACK_DOWNLOAD_ATTEMPTS", "abc"),
        ]))
        .expect_err("forced run must validate knobs");
    assert!(matches!(
        err,
        InstallerError::InvalidConfig { ref key, .. } if key == "HOOKPACK_DOWNLOAD_ATTEMPTS"
    ));
}

#[test]
fn load_config_applies_flags_to_running_config() {
    let args = PostinstallArgs::try_parse_from(["hookpack-postinstall", "--strategy", "bundled"])
        .expect("must parse");
    match args
        .load_config(lookup_from(&[("HOOKPACK_STRATEGY", "download")]))
        .expect("config must load")
    {
        LoadedConfig::Run(config) => assert_eq!(config.strategy, StrategyPreference::Bundled),
        LoadedConfig::Skip(decision) => panic!("unexpected skip: {}", decision.reason),
    }
}
