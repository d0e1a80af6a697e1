mod config;
mod error;
mod gate;
mod package;
mod platform;

pub use config::{
    gate_from_lookup, parse_strategy_preference, InstallerConfig, StrategyPreference, CI_ENV,
    DEFAULT_RELEASES_URL, OVERRIDE_ENV, PROJECT_ROOT_ENV,
};
pub use error::InstallerError;
pub use gate::{evaluate_gate, is_enabled, GateDecision};
pub use package::{PackageMetadata, DEFAULT_PRODUCT, ISSUE_URL};
pub use platform::{resolve_platform, ArchKind, OsKind, PlatformTarget};
