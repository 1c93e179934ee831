use std::path::Path;
use std::path::PathBuf;

use clap::Args as ClapArgs;
use ugit_lib::ObjectType;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// File whose contents to store as a blob object.
    path: PathBuf,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let content = std::fs::read(&args.path)?;
    let oid = repo.hash_object(ObjectType::Blob, &content)?;
    println!("{oid}");
    Ok(())
}
