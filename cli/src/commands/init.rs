use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {}

pub fn run(cwd: &Path, _args: Args) -> CliResult<()> {
    Repo::init(cwd)?;
    println!("Initialized empty repository in {}", cwd.join(ugit_lib::REPO_DIR_NAME).display());
    Ok(())
}
