use std::{fs, io, path::PathBuf};

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use eyre::Result;

use super::Cli;

#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn run(&self) -> Result<()> {
        let mut cmd = Cli::command();
        let bin = cmd.get_name().to_string();
        let Some(dir) = &self.output else {
            clap_complete::generate(self.shell, &mut cmd, bin, &mut io::stdout());
            return Ok(());
        };

        fs::create_dir_all(dir)?;
        let path = clap_complete::generate_to(self.shell, &mut cmd, bin, dir)?;
        tracing::info!(shell = ?self.shell, path = %path.display(), "wrote completions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_script_into_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("completions");
        let cmd = CompletionsCommand {
            shell: Shell::Bash,
            output: Some(dir.clone()),
        };
        cmd.run().unwrap();

        let script = fs::read_to_string(dir.join("mga.bash")).unwrap();
        assert!(script.contains("mga"));
        assert!(script.contains("generate"));
    }
}
