mod acquire;
mod download;
mod fs_utils;
mod invoke;
mod layout;
mod pipeline;
mod resolve;

pub use acquire::{release_asset_url, AcquisitionResult, AcquisitionStrategy, Origin};
pub use download::{DownloadJob, DownloadPolicy, Downloader, DEFAULT_MAX_REDIRECTS};
pub use fs_utils::{make_executable, remove_file_if_exists};
pub use invoke::{forward, InstallInvoker, InvokeOutcome, INSTALL_ARGS};
pub use layout::{default_install_root, InstallLayout};
pub use pipeline::{
    build_strategy, load_package_metadata, locate_binary, product_name, resolve_host_target,
    resolve_layout, run_postinstall, PostinstallOutcome,
};
pub use resolve::{platform_package_name, resolve_platform_package};
