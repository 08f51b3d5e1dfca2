use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use mga_manifest::{MANIFEST_FILE, Manifest};

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to mga.toml (defaults to ./mga.toml)
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        ops::check(&manifest, &self.config).render(&mut TerminalOutput::new());
        Ok(())
    }
}
