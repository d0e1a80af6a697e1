use std::fs;
use std::path::Path;

use semver::Version;
use serde::Deserialize;

use crate::error::InstallerError;

pub const DEFAULT_PRODUCT: &str = "lefthook";
pub const ISSUE_URL: &str = "https://github.com/evilmartians/lefthook/issues/new/choose";

/// The fields of the installing package's `package.json` that name the
/// product and pin the release to download.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: Version,
}

impl PackageMetadata {
    pub fn from_json_str(input: &str, origin: &Path) -> Result<Self, InstallerError> {
        let metadata: Self =
            serde_json::from_str(input).map_err(|err| InstallerError::InvalidPackageMetadata {
                path: origin.to_path_buf(),
                detail: err.to_string(),
            })?;
        if metadata.name.trim().is_empty() {
            return Err(InstallerError::InvalidPackageMetadata {
                path: origin.to_path_buf(),
                detail: "package name must not be empty".to_string(),
            });
        }
        Ok(metadata)
    }

    pub fn read(path: &Path) -> Result<Self, InstallerError> {
        let raw = fs::read_to_string(path).map_err(|err| InstallerError::InvalidPackageMetadata {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        Self::from_json_str(&raw, path)
    }

    /// Binary name shipped by this package.
    ///
    /// Scoped names (`@scope/tool`) and installer wrappers
    /// (`tool-installer`) map back to the product name.
    pub fn product(&self) -> &str {
        let unscoped = self
            .name
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.name);
        unscoped.strip_suffix("-installer").unwrap_or(unscoped)
    }
}
