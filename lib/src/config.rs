//! Per-repository configuration, loaded from `config.toml`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::UgitResult;
use crate::error::io_err;
use crate::tool::ExternalDiffTool;
use crate::tool::ExternalMergeTool;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub merge_tool: String,
    pub diff_tool: String,
    pub default_branch: String,
    /// Display-only: never written into a commit payload. Populated from
    /// `UGIT_AUTHOR_NAME`/`UGIT_AUTHOR_EMAIL` when set, for the CLI's `k`
    /// and `log` output to label a commit's author.
    #[serde(skip)]
    pub author_name: Option<String>,
    #[serde(skip)]
    pub author_email: Option<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            merge_tool: "diff3".to_string(),
            diff_tool: "diff".to_string(),
            default_branch: "main".to_string(),
            author_name: None,
            author_email: None,
        }
    }
}

impl RepoConfig {
    /// Loads `repo_dir/config.toml`, then layers the `UGIT_AUTHOR_NAME`/
    /// `UGIT_AUTHOR_EMAIL` environment variables on top. A missing file
    /// yields defaults rather than an error, since a freshly `init`-ed
    /// repo has none.
    pub fn load(repo_dir: &Path) -> UgitResult<Self> {
        let path = repo_dir.join("config.toml");
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => {
                toml::from_str(&text).map_err(|e| crate::error::UgitError::Other(Box::new(e)))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(io_err(&path, e)),
        };
        config.author_name = std::env::var("UGIT_AUTHOR_NAME").ok();
        config.author_email = std::env::var("UGIT_AUTHOR_EMAIL").ok();
        Ok(config)
    }

    pub fn merge_tool(&self) -> ExternalMergeTool {
        ExternalMergeTool { command: self.merge_tool.clone() }
    }

    pub fn diff_tool(&self) -> ExternalDiffTool {
        ExternalDiffTool { command: self.diff_tool.clone() }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = RepoConfig::load(dir.path()).unwrap();
        assert_eq!(config.merge_tool, "diff3");
        assert_eq!(config.diff_tool, "diff");
        assert_eq!(config.default_branch, "main");
    }

    #[test]
    fn loads_overrides_from_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "merge_tool = \"kdiff3\"\n").unwrap();
        let config = RepoConfig::load(dir.path()).unwrap();
        assert_eq!(config.merge_tool, "kdiff3");
        assert_eq!(config.diff_tool, "diff");
    }
}
