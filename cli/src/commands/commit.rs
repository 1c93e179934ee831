use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// The commit message.
    #[arg(short = 'm', long = "message")]
    message: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.commit(&args.message)?;
    println!("{oid}");
    Ok(())
}
