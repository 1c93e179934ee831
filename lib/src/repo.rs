//! The repository facade tying the object store, ref namespace, and
//! working copy together.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use crate::commit::Commit;
use crate::commit::get_commit as get_commit_obj;
use crate::commit::put_commit;
use crate::config::RepoConfig;
use crate::error::UgitResult;
use crate::error::io_err;
use crate::object_id::ObjectType;
use crate::object_id::Oid;
use crate::merge::merge_base;
use crate::merge::merge_trees;
use crate::ref_store::HEAD;
use crate::ref_store::MERGE_HEAD;
use crate::ref_store::RefStore;
use crate::ref_store::RefValue;
use crate::resolve::get_oid as resolve_oid;
use crate::store::ObjectStore;
use crate::tool::MergeTool;
use crate::walk::CommitWalk;
use crate::working_copy::materialize;
use crate::working_copy::write_tree_from_dir;

/// The directory name a repository's internal state lives under, and the
/// one name [`write_tree_from_dir`]/checkout treat as off-limits.
pub const REPO_DIR_NAME: &str = ".ugit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged,
    AlreadyUpToDate,
    FastForwarded,
}

pub struct Repo {
    working_dir: PathBuf,
    store: ObjectStore,
    refs: RefStore,
    config: RepoConfig,
}

impl Repo {
    /// Creates `.ugit/objects` under `working_dir` and points `HEAD` at
    /// the unborn default branch (`config.default_branch`, `main` unless
    /// overridden).
    pub fn init(working_dir: &Path) -> UgitResult<Self> {
        let repo_dir = working_dir.join(REPO_DIR_NAME);
        fs::create_dir_all(&repo_dir).map_err(|e| io_err(&repo_dir, e))?;
        let store = ObjectStore::init(&repo_dir)?;
        let refs = RefStore::new(&repo_dir);
        let config = RepoConfig::load(&repo_dir)?;
        refs.update(HEAD, &RefValue::Symbolic(format!("refs/heads/{}", config.default_branch)), false)?;
        info!(dir = %working_dir.display(), "initialized repository");
        Ok(Self { working_dir: working_dir.to_path_buf(), store, refs, config })
    }

    /// Opens a repository previously created by [`Self::init`].
    pub fn open(working_dir: &Path) -> UgitResult<Self> {
        let repo_dir = working_dir.join(REPO_DIR_NAME);
        let store = ObjectStore::new(&repo_dir);
        let refs = RefStore::new(&repo_dir);
        let config = RepoConfig::load(&repo_dir)?;
        Ok(Self { working_dir: working_dir.to_path_buf(), store, refs, config })
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn hash_object(&self, object_type: ObjectType, data: &[u8]) -> UgitResult<Oid> {
        self.store.put(object_type, data)
    }

    pub fn get_object(&self, oid: &Oid, expected_type: Option<ObjectType>) -> UgitResult<Vec<u8>> {
        self.store.get(oid, expected_type)
    }

    /// Hashes the working directory into a tree object and returns its OID.
    pub fn write_tree(&self) -> UgitResult<Oid> {
        write_tree_from_dir(&self.store, &self.working_dir, REPO_DIR_NAME)
    }

    /// Materializes the tree at `oid` over the working directory, without
    /// touching `HEAD`.
    pub fn read_tree(&self, oid: &Oid) -> UgitResult<()> {
        materialize(&self.store, &self.working_dir, REPO_DIR_NAME, oid)
    }

    pub fn get_oid(&self, name: &str) -> UgitResult<Oid> {
        resolve_oid(&self.refs, name)
    }

    pub fn get_commit(&self, oid: &Oid) -> UgitResult<Commit> {
        get_commit_obj(&self.store, oid)
    }

    /// Iterates commits reachable from `starts`.
    pub fn iter_commits_and_parents(&self, starts: Vec<Oid>) -> CommitWalk<'_> {
        CommitWalk::new(&self.store, starts)
    }

    /// Snapshots the working directory as a new commit, with `HEAD` (and
    /// `MERGE_HEAD`, if a merge is in progress) as parents.
    pub fn commit(&self, message: &str) -> UgitResult<Oid> {
        let tree = self.write_tree()?;
        let mut parents = Vec::new();
        if let Some(oid) = self.refs.get(HEAD, true)?.oid() {
            parents.push(oid.clone());
        }
        if let Some(oid) = self.refs.get(MERGE_HEAD, true)?.oid() {
            parents.push(oid.clone());
        }

        let commit = Commit { tree, parents, message: message.to_string() };
        let oid = put_commit(&self.store, &commit)?;
        self.refs.update(HEAD, &RefValue::Direct(Some(oid.clone())), true)?;
        self.refs.delete(MERGE_HEAD, false)?;
        info!(oid = %oid, "committed");
        Ok(oid)
    }

    pub fn create_tag(&self, name: &str, oid: &Oid) -> UgitResult<()> {
        self.refs.update(&format!("refs/tags/{name}"), &RefValue::Direct(Some(oid.clone())), true)
    }

    pub fn create_branch(&self, name: &str, oid: &Oid) -> UgitResult<()> {
        self.refs.update(&format!("refs/heads/{name}"), &RefValue::Direct(Some(oid.clone())), true)
    }

    /// Checks out `name`: materializes its commit's tree and points `HEAD`
    /// at the branch (symbolically) if `name` names one, or directly at the
    /// commit otherwise (a detached `HEAD`).
    pub fn checkout(&self, name: &str) -> UgitResult<()> {
        let oid = self.get_oid(name)?;
        let commit = self.get_commit(&oid)?;
        self.read_tree(&commit.tree)?;

        let branch_ref = format!("refs/heads/{name}");
        if self.refs.get(&branch_ref, false)?.oid().is_some() {
            self.refs.update(HEAD, &RefValue::Symbolic(branch_ref), false)?;
        } else {
            self.refs.update(HEAD, &RefValue::Direct(Some(oid)), false)?;
        }
        self.refs.delete(MERGE_HEAD, false)?;
        Ok(())
    }

    /// Moves the branch `HEAD` currently points at (or `HEAD` itself, if
    /// detached) to `oid`.
    pub fn reset(&self, oid: &Oid) -> UgitResult<()> {
        self.refs.update(HEAD, &RefValue::Direct(Some(oid.clone())), true)
    }

    /// Merges `other` into the current `HEAD` using the repository's
    /// configured merge tool, leaving the result staged for a commit via
    /// `MERGE_HEAD`.
    pub fn merge(&self, other: &str) -> UgitResult<MergeOutcome> {
        let tool = self.config.merge_tool();
        self.merge_with_tool(other, &tool)
    }

    pub fn merge_with_tool(&self, other: &str, tool: &dyn MergeTool) -> UgitResult<MergeOutcome> {
        let their_oid = self.get_oid(other)?;
        let our_oid = self.refs.get(HEAD, true)?.oid().cloned();

        let Some(our_oid) = our_oid else {
            // Unborn HEAD: nothing to merge against, so this is a fast-forward.
            let their_commit = self.get_commit(&their_oid)?;
            self.read_tree(&their_commit.tree)?;
            self.refs.update(HEAD, &RefValue::Direct(Some(their_oid)), true)?;
            return Ok(MergeOutcome::FastForwarded);
        };

        if our_oid == their_oid {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let base = merge_base(&self.store, our_oid.clone(), their_oid.clone())?;
        if base.as_ref() == Some(&their_oid) {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let our_commit = self.get_commit(&our_oid)?;
        let their_commit = self.get_commit(&their_oid)?;
        let base_tree = match &base {
            Some(base_oid) => Some(self.get_commit(base_oid)?.tree),
            None => None,
        };

        let merged_tree =
            merge_trees(&self.store, tool, base_tree.as_ref(), &our_commit.tree, &their_commit.tree)?;
        self.read_tree(&merged_tree)?;
        self.refs.update(MERGE_HEAD, &RefValue::Direct(Some(their_oid)), true)?;
        info!("merge staged; commit to complete it");
        Ok(MergeOutcome::Merged)
    }
}
