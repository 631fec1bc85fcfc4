//! Opening page documents for commands.

use crate::config::Config;
use anyhow::{Context, Result};
use pagesmith_common::{read_document, FileSystem, RealFileSystem};
use pagesmith_editor::Editor;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Page {
    pub path: PathBuf,
    pub config: Config,
    pub editor: Editor,
}

/// Read a document and open it in an editor configured from the project
pub fn open_page(cwd: &str, arg: Option<&Path>) -> Result<Page> {
    let config = Config::load(cwd)?;
    let path = config.document_path(cwd, arg);
    open_with(&RealFileSystem, &path, config)
}

pub fn open_with<F: FileSystem>(fs: &F, path: &Path, config: Config) -> Result<Page> {
    let nodes = read_document(fs, path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), top_level = nodes.len(), "Read document");

    let editor = Editor::from_nodes(nodes, config.editor.clone())
        .with_context(|| format!("{} is not a valid page", path.display()))?;

    Ok(Page {
        path: path.to_path_buf(),
        config,
        editor,
    })
}
