use std::path::PathBuf;
use std::time::Duration;

/// Failures of the resolve and acquire phases.
///
/// Every variant is fatal for the postinstall run. Spawn failures of the
/// installed binary are not represented here; the invoker reports them as a
/// warning outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum InstallerError {
    #[error("unsupported platform '{os}'; supported: windows, darwin, linux, freebsd, openbsd")]
    UnsupportedPlatform { os: String },

    #[error("unsupported architecture '{arch}': {detail}")]
    UnsupportedArchitecture { arch: String, detail: String },

    #[error(
        "optional platform package '{package}' is not installed; it may have been skipped by the package manager for this platform (searched {searched} node_modules directories)"
    )]
    DependencyNotResolved { package: String, searched: usize },

    #[error("download of {url} failed after {attempts} attempt(s): {cause}")]
    DownloadFailed {
        url: String,
        attempts: u32,
        cause: String,
    },

    #[error("too many redirects while downloading {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: u32 },

    #[error("download of {url} exceeded the {}s deadline", .limit.as_secs())]
    DeadlineExceeded { url: String, limit: Duration },

    #[error("couldn't find binary {}. Please create an issue: {issue_url}", .path.display())]
    MissingBinary { path: PathBuf, issue_url: String },

    #[error("invalid {key} value '{value}': {detail}")]
    InvalidConfig {
        key: String,
        value: String,
        detail: String,
    },

    #[error("invalid package metadata in {}: {detail}", .path.display())]
    InvalidPackageMetadata { path: PathBuf, detail: String },
}

impl InstallerError {
    pub fn unsupported_arch(arch: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnsupportedArchitecture {
            arch: arch.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }
}
