use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {
    /// Name or OID to start the walk from; defaults to `@` (`HEAD`).
    #[arg(default_value = "@")]
    start: String,
}

pub fn run(cwd: &Path, args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let start = repo.get_oid(&args.start)?;
    let author = author_line(&repo);
    for entry in repo.iter_commits_and_parents(vec![start]) {
        let (oid, commit) = entry?;
        println!("commit {oid}");
        for parent in &commit.parents {
            println!("parent {parent}");
        }
        if let Some(author) = &author {
            println!("author {author}");
        }
        println!();
        for line in commit.message.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}

/// `UGIT_AUTHOR_NAME`/`UGIT_AUTHOR_EMAIL`, formatted for display. These
/// never land in the commit payload itself; they only label this output.
fn author_line(repo: &Repo) -> Option<String> {
    let config = repo.config();
    let name = config.author_name.as_deref()?;
    match config.author_email.as_deref() {
        Some(email) => Some(format!("{name} <{email}>")),
        None => Some(name.to_string()),
    }
}
