use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// Name or OID of the commit to reset the current branch to.
    target: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.get_oid(&args.target)?;
    repo.reset(&oid)?;
    Ok(())
}
