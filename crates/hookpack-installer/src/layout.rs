use anyhow::{Context, Result};
use hookpack_core::PlatformTarget;
use std::path::{Path, PathBuf};

/// Paths inside the installing package.
///
/// `root` is the package directory, the one holding `package.json` and the
/// `bin/` directory binaries are bundled into or downloaded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn package_json_path(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn bundled_binary_path(&self, target: &PlatformTarget, product: &str) -> PathBuf {
        self.bin_dir()
            .join(format!(
                "{product}_{}_{}",
                target.package_os(),
                target.package_arch()
            ))
            .join(target.executable_name(product))
    }

    pub fn downloaded_binary_path(&self, target: &PlatformTarget, product: &str) -> PathBuf {
        self.bin_dir().join(target.executable_name(product))
    }

    /// `node_modules` directories visible from the package root, nearest
    /// first, the way the host package manager resolves dependencies.
    pub fn node_modules_dirs(&self) -> Vec<PathBuf> {
        self.root
            .ancestors()
            .filter(|dir| dir.file_name().and_then(|v| v.to_str()) != Some("node_modules"))
            .map(|dir| dir.join("node_modules"))
            .collect()
    }
}

/// The package root for an installer binary living in `<root>/bin/`.
pub fn default_install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running installer")?;
    let bin_dir = exe
        .parent()
        .with_context(|| format!("installer path has no parent: {}", exe.display()))?;
    Ok(bin_dir.parent().unwrap_or(bin_dir).to_path_buf())
}
