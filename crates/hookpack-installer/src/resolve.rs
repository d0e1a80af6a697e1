use std::path::PathBuf;

use hookpack_core::{InstallerError, PlatformTarget};
use tracing::debug;

use crate::layout::InstallLayout;

/// Name of the optional dependency carrying the binary for `target`.
pub fn platform_package_name(target: &PlatformTarget, product: &str) -> String {
    format!(
        "{product}-{}-{}",
        target.package_os(),
        target.package_arch()
    )
}

/// Locates `<package>/bin/<product>` the way the host package manager
/// resolves a dependency: the nearest `node_modules` directory wins.
pub fn resolve_platform_package(
    layout: &InstallLayout,
    target: &PlatformTarget,
    product: &str,
) -> Result<PathBuf, InstallerError> {
    let package = platform_package_name(target, product);
    let executable = target.executable_name(product);
    let search_dirs = layout.node_modules_dirs();

    for dir in &search_dirs {
        let candidate = dir.join(&package).join("bin").join(&executable);
        debug!(candidate = %candidate.display(), "probing platform package");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(InstallerError::DependencyNotResolved {
        package,
        searched: search_dirs.len(),
    })
}
