use std::io;
use std::path::Path;

use clap::Args as ClapArgs;
use clap::CommandFactory;
use clap_complete::Shell;
use clap_complete::generate;

use crate::Cli;
use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// Shell to generate a completion script for.
    shell: Shell,
}

pub fn run(_cwd: &Path, args: Args) -> CliResult<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, &mut io::stdout());
    Ok(())
}
