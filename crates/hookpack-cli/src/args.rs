use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hookpack_core::{
    gate_from_lookup, GateDecision, InstallerConfig, InstallerError, StrategyPreference,
};

#[derive(Parser, Debug)]
#[command(name = "hookpack-postinstall")]
#[command(about = "Fetch the prebuilt lefthook binary and install git hooks", long_about = None)]
pub struct PostinstallArgs {
    /// Where the binary comes from. Overrides HOOKPACK_STRATEGY.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
    /// Package root holding package.json and bin/. Overrides HOOKPACK_INSTALL_ROOT.
    #[arg(long)]
    pub install_root: Option<PathBuf>,
    /// Acquire the binary and print its path without running `install -f`.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    Bundled,
    Package,
    Download,
}

impl From<StrategyArg> for StrategyPreference {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Bundled => Self::Bundled,
            StrategyArg::Package => Self::Package,
            StrategyArg::Download => Self::Download,
        }
    }
}

#[derive(Debug)]
pub enum LoadedConfig {
    Skip(GateDecision),
    Run(InstallerConfig),
}

impl PostinstallArgs {
    /// Evaluates the gate before parsing any other knob; a skipped run
    /// succeeds whatever the rest of the environment holds.
    pub fn load_config<F>(&self, lookup: F) -> Result<LoadedConfig, InstallerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gate = gate_from_lookup(&lookup);
        if !gate.should_run {
            return Ok(LoadedConfig::Skip(gate));
        }

        let mut config = InstallerConfig::from_lookup(lookup)?;
        self.apply(&mut config);
        Ok(LoadedConfig::Run(config))
    }

    /// Command-line flags win over the environment.
    pub fn apply(&self, config: &mut InstallerConfig) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(root) = &self.install_root {
            config.install_root = Some(root.clone());
        }
    }
}
