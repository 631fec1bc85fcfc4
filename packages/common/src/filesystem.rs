use crate::result::CommonResult;
use pagesmith_document::{parse_document, to_json_pretty, Node};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File system abstraction for loading and storing page documents
pub trait FileSystem {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error>;

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), std::io::Error>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }
}

/// In-memory file system for testing
#[derive(Debug, Default)]
pub struct MockFileSystem {
    pub files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), std::io::Error> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Read a document file (a root node or a bare forest) into top-level nodes
pub fn read_document<F: FileSystem>(fs: &F, path: &Path) -> CommonResult<Vec<Node>> {
    let source = fs.read_to_string(path)?;
    Ok(parse_document(&source)?)
}

/// Write a full tree as pretty JSON
pub fn write_document<F: FileSystem>(fs: &mut F, path: &Path, root: &Node) -> CommonResult<()> {
    let json = to_json_pretty(root)?;
    fs.write(path, &json)?;
    Ok(())
}
