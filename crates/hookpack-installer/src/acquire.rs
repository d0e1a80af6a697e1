use std::path::PathBuf;

use anyhow::Result;
use hookpack_core::{InstallerError, PlatformTarget, StrategyPreference, ISSUE_URL};
use semver::Version;
use tracing::{debug, info};

use crate::download::{DownloadPolicy, Downloader};
use crate::layout::InstallLayout;
use crate::resolve::resolve_platform_package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Bundled,
    PackageResolved,
    Downloaded,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::PackageResolved => "package",
            Self::Downloaded => "downloaded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionResult {
    pub local_path: PathBuf,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    Bundled,
    PackageResolved,
    Downloaded {
        releases_url: String,
        version: Version,
        policy: DownloadPolicy,
    },
}

/// `<base>/v<version>/<product>_<version>_<Os>_<Arch><ext>`
pub fn release_asset_url(
    releases_url: &str,
    version: &Version,
    target: &PlatformTarget,
    product: &str,
) -> String {
    format!(
        "{}/v{version}/{product}_{version}_{}_{}{}",
        releases_url.trim_end_matches('/'),
        target.release_os(),
        target.release_arch(),
        target.executable_extension()
    )
}

impl AcquisitionStrategy {
    pub fn from_preference(
        preference: StrategyPreference,
        releases_url: &str,
        version: &Version,
        policy: DownloadPolicy,
    ) -> Self {
        match preference {
            StrategyPreference::Bundled => Self::Bundled,
            StrategyPreference::Package => Self::PackageResolved,
            StrategyPreference::Download => Self::Downloaded {
                releases_url: releases_url.to_string(),
                version: version.clone(),
                policy,
            },
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            Self::Bundled => Origin::Bundled,
            Self::PackageResolved => Origin::PackageResolved,
            Self::Downloaded { .. } => Origin::Downloaded,
        }
    }

    /// Rejects targets this strategy has no artifact for, before any I/O.
    pub fn check_target(&self, target: &PlatformTarget) -> Result<(), InstallerError> {
        match self {
            Self::Bundled => Ok(()),
            Self::PackageResolved | Self::Downloaded { .. } => target.ensure_published_artifact(),
        }
    }

    /// Produces a local, executable binary for `target`.
    pub fn acquire<F>(
        &self,
        layout: &InstallLayout,
        target: &PlatformTarget,
        product: &str,
        on_progress: F,
    ) -> Result<AcquisitionResult>
    where
        F: FnMut(u64, Option<u64>),
    {
        self.check_target(target)?;
        match self {
            Self::Bundled | Self::PackageResolved => Ok(self.locate(layout, target, product)?),
            Self::Downloaded {
                releases_url,
                version,
                policy,
            } => {
                let destination = layout.downloaded_binary_path(target, product);
                if destination.is_file() {
                    debug!(path = %destination.display(), "binary already downloaded");
                    return Ok(AcquisitionResult {
                        local_path: destination,
                        origin: Origin::Downloaded,
                    });
                }

                let url = release_asset_url(releases_url, version, target, product);
                let downloader = Downloader::new(policy.clone())?;
                let local_path = downloader.fetch(&url, &destination, on_progress)?;
                Ok(AcquisitionResult {
                    local_path,
                    origin: Origin::Downloaded,
                })
            }
        }
    }

    /// Finds an already present binary without touching the network.
    pub fn locate(
        &self,
        layout: &InstallLayout,
        target: &PlatformTarget,
        product: &str,
    ) -> Result<AcquisitionResult, InstallerError> {
        let (local_path, origin) = match self {
            Self::Bundled => (layout.bundled_binary_path(target, product), Origin::Bundled),
            Self::PackageResolved => (
                resolve_platform_package(layout, target, product)?,
                Origin::PackageResolved,
            ),
            Self::Downloaded { .. } => (
                layout.downloaded_binary_path(target, product),
                Origin::Downloaded,
            ),
        };

        if !local_path.is_file() {
            return Err(InstallerError::MissingBinary {
                path: local_path,
                issue_url: ISSUE_URL.to_string(),
            });
        }
        info!(path = %local_path.display(), origin = origin.as_str(), "binary located");
        Ok(AcquisitionResult { local_path, origin })
    }
}
