use std::path::Path;

use clap::Args as ClapArgs;
use ugit_lib::Repo;

use crate::error::CliResult;

#[derive(Debug, ClapArgs)]
pub struct Args {}

/// Prints a graphviz `dot` description of every ref and the commit graph
/// reachable from them, for piping into `dot -Tpng` or similar.
pub fn run(cwd: &Path, _args: Args) -> CliResult<()> {
    let repo = Repo::open(cwd)?;
    let refs = repo.refs().iter("", true)?;
    let author = author_suffix(&repo);

    println!("digraph commits {{");
    println!("  node [shape=box style=filled label=\"\"]");
    println!();

    let mut starts = Vec::new();
    for (name, value) in &refs {
        if let Some(oid) = value.oid() {
            println!("  \"{name}\" [shape=note label=\"{name}\"]");
            println!("  \"{name}\" -> \"{oid}\" [weight=2]");
            starts.push(oid.clone());
        }
    }

    let mut seen = std::collections::HashSet::new();
    for entry in repo.iter_commits_and_parents(starts) {
        let (oid, commit) = entry?;
        if !seen.insert(oid.clone()) {
            continue;
        }
        let short: String = oid.as_str().chars().take(10).collect();
        println!("  \"{oid}\" [label=\"{short}{author}\"]");
        for parent in &commit.parents {
            println!("  \"{oid}\" -> \"{parent}\"");
        }
    }

    println!("}}");
    Ok(())
}

/// `\n`-prefixed `UGIT_AUTHOR_NAME`/`UGIT_AUTHOR_EMAIL` label suffix for
/// commit nodes, or empty when neither is set.
fn author_suffix(repo: &Repo) -> String {
    let config = repo.config();
    match (config.author_name.as_deref(), config.author_email.as_deref()) {
        (Some(name), Some(email)) => format!("\\n{name} <{email}>"),
        (Some(name), None) => format!("\\n{name}"),
        (None, _) => String::new(),
    }
}
