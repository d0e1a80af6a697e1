use std::path::PathBuf;
use std::time::Duration;

use crate::error::InstallerError;
use crate::gate::{evaluate_gate, GateDecision};

pub const CI_ENV: &str = "CI";
pub const OVERRIDE_ENV: &str = "LEFTHOOK";
pub const PROJECT_ROOT_ENV: &str = "INIT_CWD";

const STRATEGY_ENV: &str = "HOOKPACK_STRATEGY";
const RELEASES_URL_ENV: &str = "HOOKPACK_RELEASES_URL";
const INSTALL_ROOT_ENV: &str = "HOOKPACK_INSTALL_ROOT";
const OS_ENV: &str = "HOOKPACK_OS";
const ARCH_ENV: &str = "HOOKPACK_ARCH";
const ATTEMPTS_ENV: &str = "HOOKPACK_DOWNLOAD_ATTEMPTS";
const RETRY_DELAY_ENV: &str = "HOOKPACK_DOWNLOAD_RETRY_DELAY_MS";
const TIMEOUT_ENV: &str = "HOOKPACK_DOWNLOAD_TIMEOUT_SECS";
const LOG_ENV: &str = "HOOKPACK_LOG";

pub const DEFAULT_RELEASES_URL: &str = "https://github.com/evilmartians/lefthook/releases/download";
const DEFAULT_DOWNLOAD_ATTEMPTS: u32 = 5;
const DEFAULT_RETRY_DELAY_MS: u64 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPreference {
    Bundled,
    Package,
    Download,
}

impl StrategyPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::Package => "package",
            Self::Download => "download",
        }
    }
}

pub fn parse_strategy_preference(
    value: Option<&str>,
    env_name: &str,
) -> Result<StrategyPreference, InstallerError> {
    let Some(raw) = value else {
        return Ok(StrategyPreference::Package);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "package" => Ok(StrategyPreference::Package),
        "bundled" => Ok(StrategyPreference::Bundled),
        "download" => Ok(StrategyPreference::Download),
        _ => Err(InstallerError::invalid_config(
            env_name,
            raw,
            "expected one of: bundled, package, download",
        )),
    }
}

/// Everything the installer reads from its environment, captured once at
/// the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    pub ci: Option<String>,
    pub override_flag: Option<String>,
    pub project_root: Option<PathBuf>,
    pub install_root: Option<PathBuf>,
    pub strategy: StrategyPreference,
    pub releases_url: String,
    pub host_os: String,
    pub host_arch: String,
    pub download_attempts: u32,
    pub retry_delay: Duration,
    pub download_timeout: Option<Duration>,
    pub log_filter: Option<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            ci: None,
            override_flag: None,
            project_root: None,
            install_root: None,
            strategy: StrategyPreference::Package,
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            host_os: std::env::consts::OS.to_string(),
            host_arch: std::env::consts::ARCH.to_string(),
            download_attempts: DEFAULT_DOWNLOAD_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            download_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            log_filter: None,
        }
    }
}

impl InstallerConfig {
    pub fn from_env() -> Result<Self, InstallerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, InstallerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let download_attempts = match non_empty(ATTEMPTS_ENV) {
            Some(raw) => parse_positive_u32(&raw, ATTEMPTS_ENV)?,
            None => defaults.download_attempts,
        };
        let retry_delay = match non_empty(RETRY_DELAY_ENV) {
            Some(raw) => Duration::from_millis(parse_u64(&raw, RETRY_DELAY_ENV)?),
            None => defaults.retry_delay,
        };
        let download_timeout = match non_empty(TIMEOUT_ENV) {
            Some(raw) => match parse_u64(&raw, TIMEOUT_ENV)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => defaults.download_timeout,
        };

        Ok(Self {
            ci: lookup(CI_ENV),
            override_flag: lookup(OVERRIDE_ENV),
            project_root: non_empty(PROJECT_ROOT_ENV).map(PathBuf::from),
            install_root: non_empty(INSTALL_ROOT_ENV).map(PathBuf::from),
            strategy: parse_strategy_preference(lookup(STRATEGY_ENV).as_deref(), STRATEGY_ENV)?,
            releases_url: non_empty(RELEASES_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.releases_url),
            host_os: non_empty(OS_ENV).unwrap_or(defaults.host_os),
            host_arch: non_empty(ARCH_ENV).unwrap_or(defaults.host_arch),
            download_attempts,
            retry_delay,
            download_timeout,
            log_filter: non_empty(LOG_ENV),
        })
    }

    pub fn gate(&self) -> GateDecision {
        evaluate_gate(self.ci.as_deref(), self.override_flag.as_deref())
    }
}

/// Reads only the two gate flags, so a skipped run never depends on the
/// other knobs being well formed.
pub fn gate_from_lookup<F>(lookup: F) -> GateDecision
where
    F: Fn(&str) -> Option<String>,
{
    evaluate_gate(lookup(CI_ENV).as_deref(), lookup(OVERRIDE_ENV).as_deref())
}

fn parse_u64(raw: &str, env_name: &str) -> Result<u64, InstallerError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|err| InstallerError::invalid_config(env_name, raw, err.to_string()))
}

fn parse_positive_u32(raw: &str, env_name: &str) -> Result<u32, InstallerError> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| InstallerError::invalid_config(env_name, raw, err.to_string()))?;
    if value == 0 {
        return Err(InstallerError::invalid_config(
            env_name,
            raw,
            "must be at least 1",
        ));
    }
    Ok(value)
}
