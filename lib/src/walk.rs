//! Walking commit ancestry.

use std::collections::HashSet;
use std::collections::VecDeque;

use crate::commit::Commit;
use crate::commit::get_commit;
use crate::error::UgitResult;
use crate::object_id::Oid;
use crate::store::ObjectStore;

/// Yields commits reachable from `starts`, each exactly once.
///
/// A commit's first parent is pushed to the front of the queue and the
/// rest to the back, so the walk tends to follow first-parent history
/// before fanning out into merged-in branches — closer to commit-graph
/// order than a plain breadth-first traversal would be.
pub struct CommitWalk<'a> {
    store: &'a ObjectStore,
    queue: VecDeque<Oid>,
    visited: HashSet<Oid>,
}

impl<'a> CommitWalk<'a> {
    pub fn new(store: &'a ObjectStore, starts: impl IntoIterator<Item = Oid>) -> Self {
        Self { store, queue: starts.into_iter().collect(), visited: HashSet::new() }
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = UgitResult<(Oid, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let oid = self.queue.pop_front()?;
            if !self.visited.insert(oid.clone()) {
                continue;
            }
            let commit = match get_commit(self.store, &oid) {
                Ok(commit) => commit,
                Err(e) => return Some(Err(e)),
            };
            let mut parents = commit.parents.iter();
            if let Some(first) = parents.next() {
                if !self.visited.contains(first) {
                    self.queue.push_front(first.clone());
                }
            }
            for parent in parents {
                if !self.visited.contains(parent) {
                    self.queue.push_back(parent.clone());
                }
            }
            return Some(Ok((oid, commit)));
        }
    }
}

/// The full set of OIDs reachable from `start`, inclusive.
pub fn ancestors(store: &ObjectStore, start: Oid) -> UgitResult<HashSet<Oid>> {
    CommitWalk::new(store, [start]).map(|r| r.map(|(oid, _)| oid)).collect()
}
