use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hookpack_core::{
    resolve_platform, InstallerConfig, InstallerError, PackageMetadata, PlatformTarget,
    StrategyPreference, DEFAULT_PRODUCT,
};
use semver::Version;
use tracing::info;

use crate::acquire::{AcquisitionResult, AcquisitionStrategy};
use crate::download::DownloadPolicy;
use crate::invoke::{InstallInvoker, InvokeOutcome};
use crate::layout::{default_install_root, InstallLayout};

#[derive(Debug)]
pub enum PostinstallOutcome {
    Skipped { reason: String },
    /// Dry run: the binary was acquired but not invoked.
    Acquired(AcquisitionResult),
    Installed(AcquisitionResult),
    HookInstallFailed {
        binary: PathBuf,
        code: Option<i32>,
    },
    SpawnWarning {
        binary: PathBuf,
        message: String,
    },
}

impl PostinstallOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HookInstallFailed { .. } => 1,
            _ => 0,
        }
    }
}

/// Reads `package.json` from the install root, if present.
pub fn load_package_metadata(layout: &InstallLayout) -> Result<Option<PackageMetadata>> {
    let path = layout.package_json_path();
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(PackageMetadata::read(&path)?))
}

pub fn build_strategy(
    config: &InstallerConfig,
    layout: &InstallLayout,
    metadata: Option<&PackageMetadata>,
) -> Result<AcquisitionStrategy> {
    let version = match (config.strategy, metadata) {
        (StrategyPreference::Download, None) => {
            return Err(InstallerError::InvalidPackageMetadata {
                path: layout.package_json_path(),
                detail: "package.json is required to select the release version".to_string(),
            }
            .into())
        }
        (_, Some(metadata)) => metadata.version.clone(),
        (_, None) => Version::new(0, 0, 0),
    };
    Ok(AcquisitionStrategy::from_preference(
        config.strategy,
        &config.releases_url,
        &version,
        DownloadPolicy::from_config(config),
    ))
}

pub fn product_name(metadata: Option<&PackageMetadata>) -> &str {
    metadata.map(PackageMetadata::product).unwrap_or(DEFAULT_PRODUCT)
}

pub fn resolve_host_target(config: &InstallerConfig) -> Result<PlatformTarget> {
    resolve_platform(&config.host_os, &config.host_arch).with_context(|| {
        format!(
            "failed to resolve a prebuilt binary for {}/{}",
            config.host_os, config.host_arch
        )
    })
}

/// `HOOKPACK_INSTALL_ROOT` when set, otherwise the package owning the
/// running executable.
pub fn resolve_layout(config: &InstallerConfig) -> Result<InstallLayout> {
    match &config.install_root {
        Some(root) => Ok(InstallLayout::new(root)),
        None => Ok(InstallLayout::new(default_install_root()?)),
    }
}

/// Finds the binary a previous postinstall run left behind. Never downloads.
pub fn locate_binary(
    config: &InstallerConfig,
    layout: &InstallLayout,
) -> Result<AcquisitionResult> {
    let target = resolve_host_target(config)?;
    let metadata = load_package_metadata(layout)?;
    let product = product_name(metadata.as_ref());
    let strategy = build_strategy(config, layout, metadata.as_ref())?;
    strategy.check_target(&target)?;
    Ok(strategy
        .locate(layout, &target, product)
        .with_context(|| format!("failed to locate the {product} binary for {target}"))?)
}

fn project_root(config: &InstallerConfig) -> Result<PathBuf> {
    match &config.project_root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("failed to determine the project root"),
    }
}

/// Gate, resolve, acquire, then run `<binary> install -f`.
///
/// Acquisition failures are returned as errors. A binary that cannot be
/// spawned only yields [`PostinstallOutcome::SpawnWarning`] so the consumer's
/// package installation is never broken by the hook step.
pub fn run_postinstall<F>(
    config: &InstallerConfig,
    layout: &InstallLayout,
    dry_run: bool,
    on_progress: F,
) -> Result<PostinstallOutcome>
where
    F: FnMut(u64, Option<u64>),
{
    let gate = config.gate();
    if !gate.should_run {
        info!(reason = %gate.reason, "skipping hook installation");
        return Ok(PostinstallOutcome::Skipped {
            reason: gate.reason,
        });
    }

    let target = resolve_host_target(config)?;
    if config.strategy != StrategyPreference::Bundled {
        target.ensure_published_artifact()?;
    }
    info!(%target, strategy = config.strategy.as_str(), "resolved platform");

    let metadata = load_package_metadata(layout)?;
    let product = product_name(metadata.as_ref());
    let strategy = build_strategy(config, layout, metadata.as_ref())?;
    let acquired = strategy
        .acquire(layout, &target, product, on_progress)
        .with_context(|| format!("failed to acquire the {product} binary for {target}"))?;

    if dry_run {
        return Ok(PostinstallOutcome::Acquired(acquired));
    }

    let invoker = InstallInvoker::new(&acquired.local_path, project_root(config)?);
    Ok(match invoker.invoke() {
        InvokeOutcome::Succeeded => PostinstallOutcome::Installed(acquired),
        InvokeOutcome::ChildFailed(code) => PostinstallOutcome::HookInstallFailed {
            binary: acquired.local_path,
            code,
        },
        InvokeOutcome::SpawnFailed(err) => PostinstallOutcome::SpawnWarning {
            message: spawn_warning(product, invoker.binary(), &err),
            binary: acquired.local_path,
        },
    })
}

fn spawn_warning(product: &str, binary: &Path, err: &std::io::Error) -> String {
    format!(
        "'{product} install' command failed. Try running it manually.\n{}: {err}",
        binary.display()
    )
}
