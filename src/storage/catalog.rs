//! Tutorial catalog: the document tree, titles and document bodies
//!
//! The tree lives in `.tutor/tree.toml`:
//!
//! ```toml
//! [[tools]]
//! id = "stripe"
//! title = "Stripe"
//!
//! [titles]
//! stripe-account = "Create a Stripe account"
//!
//! [tutorials.payments]
//! title = "Accept payments"
//!
//! [[tutorials.payments.steps]]
//! title = "Prepare accounts"
//! tool.stripe = ["stripe-account"]
//! ```
//!
//! Document bodies are markdown files in `.tutor/docs/{id}.md`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{DocTitleRegistry, DocTree, DocType, DocumentId, Tool, Tutorial, TutorialConfig};

/// On-disk shape of `tree.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TreeFile {
    tools: Vec<Tool>,
    titles: HashMap<DocumentId, String>,
    tutorials: BTreeMap<DocType, Tutorial>,
}

/// Parses and validates a tree file
pub fn parse_tree(content: &str) -> Result<TutorialConfig> {
    let file: TreeFile = toml::from_str(content).context("Failed to parse tree file")?;
    let tree = DocTree::new(file.tools, file.tutorials).context("Invalid document tree")?;

    for (doc_type, _) in tree.tutorials() {
        for id in tree.documents_in(doc_type) {
            if !file.titles.contains_key(id) {
                tracing::debug!(%id, "document has no registered title");
            }
        }
    }

    Ok(TutorialConfig::new(tree, DocTitleRegistry::new(file.titles)))
}

/// Read access to a project's tree and documents
pub struct Catalog {
    tree_path: PathBuf,
    docs_dir: PathBuf,
}

impl Catalog {
    pub fn new(tree_path: impl Into<PathBuf>, docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            tree_path: tree_path.into(),
            docs_dir: docs_dir.into(),
        }
    }

    /// Creates the default catalog for a project
    pub fn for_project(project_root: &Path) -> Self {
        let tutor_dir = project_root.join(".tutor");
        Self::new(tutor_dir.join("tree.toml"), tutor_dir.join("docs"))
    }

    pub fn tree_path(&self) -> &Path {
        &self.tree_path
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Loads the immutable tutorial configuration
    pub fn load_config(&self) -> Result<TutorialConfig> {
        let content = fs::read_to_string(&self.tree_path)
            .with_context(|| format!("Failed to read tree file: {}", self.tree_path.display()))?;
        parse_tree(&content).with_context(|| format!("In {}", self.tree_path.display()))
    }

    /// Returns the path to a document file, or `None` if the ID would not
    /// name a single file inside the docs directory
    pub fn document_path(&self, id: &DocumentId) -> Option<PathBuf> {
        let file_name = format!("{}.md", id);
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.docs_dir.join(file_name)),
            _ => {
                tracing::warn!("refusing document path for ID '{}'", id);
                None
            }
        }
    }

    /// Reads a document body; missing or unreadable documents are `None`
    pub fn document(&self, id: &DocumentId) -> Option<String> {
        let path = self.document_path(id)?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!("document {} unavailable: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TREE: &str = r#"
[[tools]]
id = "stripe"
title = "Stripe"

[[tools]]
id = "nextjs"
title = "Next.js"

[titles]
stripe-account = "Create a Stripe account"
next-app = "Create the app"

[tutorials.payments]
title = "Accept payments"
scenes = ["Subscriptions", "One-off purchases"]

[[tutorials.payments.steps]]
title = "Prepare accounts"
tool.stripe = ["stripe-account"]
tool.nextjs = ["next-app"]

[[tutorials.payments.steps]]
title = "Empty step"
"#;

    #[test]
    fn parse_tree_file() {
        let config = parse_tree(TREE).unwrap();
        let payments = DocType::new("payments");

        assert_eq!(config.tree.tools().len(), 2);
        assert_eq!(config.tree.tools()[1].title, "Next.js");

        let steps = config.tree.steps_for(&payments);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "Prepare accounts");
        assert!(steps[1].tool.is_empty());

        let tutorial = config.tree.tutorial(&payments).unwrap();
        assert_eq!(tutorial.scenes.len(), 2);
        assert_eq!(tutorial.video_url, None);

        let id: DocumentId = "next-app".parse().unwrap();
        assert_eq!(config.titles.get_doc_title(&id), "Create the app");
    }

    #[test]
    fn parse_rejects_duplicate_ids() {
        let tree = r#"
[[tools]]
id = "stripe"
title = "Stripe"

[[tutorials.a.steps]]
title = "One"
tool.stripe = ["x", "x"]
"#;
        // Tutorials need a title
        assert!(parse_tree(tree).is_err());

        let tree = tree.replace("[[tutorials.a.steps]]", "[tutorials.a]\ntitle = \"A\"\n\n[[tutorials.a.steps]]");
        let err = parse_tree(&tree).unwrap_err();
        assert!(format!("{:#}", err).contains("more than once"));
    }

    #[test]
    fn read_documents() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::for_project(dir.path());
        fs::create_dir_all(catalog.docs_dir()).unwrap();

        let id: DocumentId = "stripe-account".parse().unwrap();
        fs::write(catalog.document_path(&id).unwrap(), "# Hello").unwrap();

        assert_eq!(catalog.document(&id).as_deref(), Some("# Hello"));
        assert_eq!(catalog.document(&"missing".parse().unwrap()), None);
    }

    #[test]
    fn documents_stay_inside_docs_dir() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::for_project(dir.path());
        fs::create_dir_all(catalog.docs_dir()).unwrap();
        fs::write(dir.path().join("secret.md"), "outside docs dir").unwrap();

        let outside = dir.path().join("secret");
        assert!(outside.to_string_lossy().parse::<DocumentId>().is_err());
        assert!("../secret".parse::<DocumentId>().is_err());

        let id: DocumentId = "secret".parse().unwrap();
        assert_eq!(catalog.document_path(&id), Some(catalog.docs_dir().join("secret.md")));
        assert_eq!(catalog.document(&id), None);
    }

    #[test]
    fn missing_tree_file_fails() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::for_project(dir.path());
        assert!(catalog.load_config().is_err());
    }
}
