use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use crate::{
    ops::{self, FmtOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct FmtCommand {
    /// Go source files to format in place
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Check if files are formatted without making changes (exit 1 if not)
    #[arg(long)]
    pub check: bool,
}

impl FmtCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::fmt(&self.files, FmtOptions { check: self.check })?;
        report.render(&mut TerminalOutput::new());

        if report.needs_attention() {
            std::process::exit(1);
        }
        Ok(())
    }
}
