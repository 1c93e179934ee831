//! Invoking external diff/merge tools as subprocesses.

use std::io::Write as _;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::UgitError;
use crate::error::UgitResult;
use crate::error::io_err;

/// Merges `ours`/`theirs` against `base`, returning the merged content
/// (conflict markers included on a non-clean merge, matching `diff3 -m`).
pub trait MergeTool {
    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> UgitResult<Vec<u8>>;
}

/// Produces a unified diff between two blobs, labeled by `path`.
pub trait DiffTool {
    fn diff(&self, path: &str, from: &[u8], to: &[u8]) -> UgitResult<Vec<u8>>;
}

/// Shells out to `diff3 -m`, one of the two external tools this system
/// leans on rather than reimplementing a merge algorithm.
pub struct ExternalMergeTool {
    pub command: String,
}

impl Default for ExternalMergeTool {
    fn default() -> Self {
        Self { command: "diff3".to_string() }
    }
}

impl MergeTool for ExternalMergeTool {
    fn merge(&self, base: &[u8], ours: &[u8], theirs: &[u8]) -> UgitResult<Vec<u8>> {
        let dir = tempfile::tempdir().map_err(|e| io_err(Path::new("<tempdir>"), e))?;
        let ours_path = write_temp(dir.path(), "HEAD", ours)?;
        let base_path = write_temp(dir.path(), "BASE", base)?;
        let theirs_path = write_temp(dir.path(), "MERGE_HEAD", theirs)?;

        let output = Command::new(&self.command)
            .arg("-m")
            .arg("-L")
            .arg("HEAD")
            .arg("-L")
            .arg("MERGE_HEAD")
            .arg("-L")
            .arg("BASE")
            .arg(&ours_path)
            .arg(&theirs_path)
            .arg(&base_path)
            .output()
            .map_err(|e| io_err(Path::new(&self.command), e))?;

        // diff3 exits 0 on a clean merge and 1 when conflict markers were
        // inserted; anything else means the tool itself failed.
        match output.status.code() {
            Some(0) | Some(1) => Ok(output.stdout),
            code => {
                debug!(tool = %self.command, status = ?output.status, "merge tool failed");
                Err(UgitError::ToolError { tool: self.command.clone(), status: code })
            }
        }
    }
}

/// Shells out to `diff --unified --show-c-function`.
pub struct ExternalDiffTool {
    pub command: String,
}

impl Default for ExternalDiffTool {
    fn default() -> Self {
        Self { command: "diff".to_string() }
    }
}

impl DiffTool for ExternalDiffTool {
    fn diff(&self, path: &str, from: &[u8], to: &[u8]) -> UgitResult<Vec<u8>> {
        let dir = tempfile::tempdir().map_err(|e| io_err(Path::new("<tempdir>"), e))?;
        let from_path = write_temp(dir.path(), "a", from)?;
        let to_path = write_temp(dir.path(), "b", to)?;

        let output = Command::new(&self.command)
            .arg("--unified")
            .arg("--show-c-function")
            .arg("--label")
            .arg(format!("a/{path}"))
            .arg("--label")
            .arg(format!("b/{path}"))
            .arg(&from_path)
            .arg(&to_path)
            .output()
            .map_err(|e| io_err(Path::new(&self.command), e))?;

        // diff exits 0 for no differences and 1 when differences were
        // found; anything else (2+) is a real failure.
        match output.status.code() {
            Some(0) | Some(1) => Ok(output.stdout),
            code => Err(UgitError::ToolError { tool: self.command.clone(), status: code }),
        }
    }
}

fn write_temp(dir: &Path, name: &str, content: &[u8]) -> UgitResult<std::path::PathBuf> {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).map_err(|e| io_err(&path, e))?;
    file.write_all(content).map_err(|e| io_err(&path, e))?;
    Ok(path)
}
