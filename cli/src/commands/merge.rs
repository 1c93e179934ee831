use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::MergeOutcome;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// Name or OID of the commit to merge into the current branch.
    other: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    match repo.merge(&args.other)? {
        MergeOutcome::AlreadyUpToDate => println!("Already up to date."),
        MergeOutcome::FastForwarded => println!("Fast-forwarded."),
        MergeOutcome::Merged => println!("Merged; run commit to record the result."),
    }
    Ok(())
}
