use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// The new tag's name.
    name: String,
    /// Name or OID of the commit to tag; defaults to `@` (`HEAD`).
    #[arg(default_value = "@")]
    target: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.get_oid(&args.target)?;
    repo.create_tag(&args.name, &oid)?;
    Ok(())
}
