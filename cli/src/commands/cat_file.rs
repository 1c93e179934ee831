use std::io::Write as _;
use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// Name or OID of the object to print.
    object: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.get_oid(&args.object)?;
    let content = repo.get_object(&oid, None)?;
    std::io::stdout().write_all(&content)?;
    Ok(())
}
