use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// The new branch's name.
    name: String,
    /// Name or OID of the commit to branch from; defaults to `@` (`HEAD`).
    #[arg(default_value = "@")]
    start_point: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.get_oid(&args.start_point)?;
    repo.create_branch(&args.name, &oid)?;
    Ok(())
}
