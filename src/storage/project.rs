//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{scaffold, Catalog, Config, FileBackend, ProgressStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a tutor project. Run 'tutor init' first.")]
    NotInProject,
}

/// A tutorial project rooted at a directory containing `.tutor/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".tutor").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project with the starter guide.
    ///
    /// Existing files are left untouched, so running it twice is safe.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tutor_dir = root.join(".tutor");
        let docs_dir = tutor_dir.join("docs");

        fs::create_dir_all(&docs_dir)
            .with_context(|| format!("Failed to create docs directory: {}", docs_dir.display()))?;

        write_if_missing(&tutor_dir.join("config.toml"), scaffold::CONFIG)?;
        write_if_missing(&tutor_dir.join(".gitignore"), scaffold::GITIGNORE)?;
        write_if_missing(&tutor_dir.join("tree.toml"), scaffold::TREE)?;

        for (id, body) in scaffold::DOCS {
            write_if_missing(&docs_dir.join(format!("{}.md", id)), body)?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .tutor directory path
    pub fn tutor_dir(&self) -> PathBuf {
        self.root.join(".tutor")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the tree and document catalog
    pub fn catalog(&self) -> Catalog {
        Catalog::for_project(&self.root)
    }

    /// Returns the progress store
    pub fn progress_store(&self) -> ProgressStore<FileBackend> {
        ProgressStore::new(FileBackend::for_project(&self.root))
    }
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocType;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.tutor_dir().join("docs").is_dir());
        assert!(project.tutor_dir().join("config.toml").is_file());
        assert!(project.tutor_dir().join("tree.toml").is_file());
        assert!(project.tutor_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail

        assert!(dir.path().join(".tutor").is_dir());
    }

    #[test]
    fn init_keeps_edited_files() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let tree = dir.path().join(".tutor/tree.toml");
        fs::write(&tree, "# edited").unwrap();
        Project::init(dir.path()).unwrap();

        assert_eq!(fs::read_to_string(&tree).unwrap(), "# edited");
    }

    #[test]
    fn starter_content_is_consistent() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let config = project.catalog().load_config().unwrap();
        let payments = DocType::new("payments");

        assert_eq!(config.tree.steps_for(&payments).len(), 4);
        for id in config.tree.documents_in(&payments) {
            assert!(config.titles.contains(id), "missing title for {}", id);
            assert!(project.catalog().document(id).is_some(), "missing document {}", id);
        }
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());
    }

    #[test]
    fn progress_store_lives_in_tutor_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let store = project.progress_store();
        assert!(store.backend().path().ends_with(".tutor/progress.json"));
    }
}
