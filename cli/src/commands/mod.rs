//! Subcommand definitions and dispatch.

mod branch;
mod cat_file;
mod checkout;
mod commit;
mod completions;
mod hash_object;
mod init;
mod k;
mod log;
mod merge;
mod read_tree;
mod reset;
mod tag;
mod write_tree;

use std::path::Path;

use clap::Subcommand;

use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new repository in the current directory.
    Init(init::Args),
    /// Store a file's contents as an object and print its id.
    HashObject(hash_object::Args),
    /// Print an object's contents.
    CatFile(cat_file::Args),
    /// Hash the working directory into a tree object and print its id.
    WriteTree(write_tree::Args),
    /// Materialize a tree object over the working directory.
    ReadTree(read_tree::Args),
    /// Record the working directory as a new commit.
    Commit(commit::Args),
    /// Print commit history reachable from a name.
    Log(log::Args),
    /// Check out a commit or branch.
    Checkout(checkout::Args),
    /// Create a tag pointing at a commit.
    Tag(tag::Args),
    /// Create a branch pointing at a commit.
    Branch(branch::Args),
    /// Merge another commit into the current branch.
    Merge(merge::Args),
    /// Move the current branch to point at a commit.
    Reset(reset::Args),
    /// Print a graphviz description of the commit graph and refs.
    K(k::Args),
    /// Print a shell completion script to stdout.
    Completions(completions::Args),
}

pub fn dispatch(cwd: &Path, command: Command) -> CliResult<()> {
    match command {
        Command::Init(args) => init::run(cwd, args),
        Command::HashObject(args) => hash_object::run(cwd, args),
        Command::CatFile(args) => cat_file::run(cwd, args),
        Command::WriteTree(args) => write_tree::run(cwd, args),
        Command::ReadTree(args) => read_tree::run(cwd, args),
        Command::Commit(args) => commit::run(cwd, args),
        Command::Log(args) => log::run(cwd, args),
        Command::Checkout(args) => checkout::run(cwd, args),
        Command::Tag(args) => tag::run(cwd, args),
        Command::Branch(args) => branch::run(cwd, args),
        Command::Merge(args) => merge::run(cwd, args),
        Command::Reset(args) => reset::run(cwd, args),
        Command::K(args) => k::run(cwd, args),
        Command::Completions(args) => completions::run(cwd, args),
    }
}
