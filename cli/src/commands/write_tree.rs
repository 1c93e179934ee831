use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {}

pub fn run(cwd: &Path, _args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let oid = repo.write_tree()?;
    println!("{oid}");
    Ok(())
}
