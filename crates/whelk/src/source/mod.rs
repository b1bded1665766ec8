//! Read-only access to a real source tree on disk.
//!
//! Two operations live here: a tiered file search ([`SourceTree::search`])
//! and a line-range reader ([`SourceTree::read_range`]). Both are restricted
//! to files whose extension is on the configured allow-list and never modify
//! the tree.

mod reader;
mod search;
mod text;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ToolError, ToolResult};
use crate::limits::ReadLimits;
use crate::policy::RootPolicy;

pub use reader::SourceExcerpt;
pub use search::{SearchQuery, SearchTier};
pub use text::{decode_text, read_text, sniff_binary, split_source_lines};

/// Where the source tree lives and which files count as source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root searched by `search_source_files` and used to resolve bare names
    pub src_root: PathBuf,
    /// Additional root the reader may open files under
    pub doc_root: PathBuf,
    /// Allowed file extensions, without the dot
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            src_root: PathBuf::from("src/main/java"),
            doc_root: PathBuf::from("docs"),
            extensions: [
                "java", "kt", "scala", "groovy", "js", "ts", "py", "cpp", "c", "h", "hpp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl SourceConfig {
    /// Create a config rooted at `src_root` with the default doc root and extensions.
    pub fn new(src_root: impl Into<PathBuf>) -> Self {
        Self {
            src_root: src_root.into(),
            ..Self::default()
        }
    }

    /// Set the documentation root.
    pub fn doc_root(mut self, doc_root: impl Into<PathBuf>) -> Self {
        self.doc_root = doc_root.into();
        self
    }

    /// Replace the extension allow-list.
    pub fn extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// The allow-listed extension of `name`, without its dot, if any.
    ///
    /// Entries are compared ignoring case and any leading dot, so a
    /// deserialized list like `[".java"]` works the same as `["java"]`.
    pub fn source_extension(&self, name: &str) -> Option<&str> {
        let (_, ext) = name.rsplit_once('.')?;
        self.extensions
            .iter()
            .map(|allowed| allowed.trim_start_matches('.'))
            .find(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// A source tree plus the limits used when reading it.
#[derive(Debug, Clone)]
pub struct SourceTree {
    config: SourceConfig,
    limits: ReadLimits,
    policy: RootPolicy,
}

impl SourceTree {
    /// Create a tree over `config`.
    pub fn new(config: SourceConfig, limits: ReadLimits) -> Self {
        let policy = RootPolicy::new([&config.src_root, &config.doc_root]);
        Self {
            config,
            limits,
            policy,
        }
    }

    /// The configuration this tree was built from.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// The source root as shown in diagnostics.
    pub fn root_display(&self) -> String {
        self.config.src_root.display().to_string()
    }

    fn ensure_root(&self) -> ToolResult<&Path> {
        let root = self.config.src_root.as_path();
        if root.is_dir() {
            Ok(root)
        } else {
            tracing::warn!(root = %root.display(), "source directory not found");
            Err(ToolError::SourceRootMissing(root.display().to_string()))
        }
    }

    /// Walk every allow-listed file under the source root, sorted by name.
    ///
    /// Entries that cannot be read are skipped.
    fn source_files(&self) -> ToolResult<impl Iterator<Item = SourceFile> + '_> {
        let root = self.ensure_root()?;
        Ok(WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(readable_entry)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                self.config.source_extension(&name)?;
                Some(SourceFile {
                    path: entry.into_path(),
                    name,
                })
            }))
    }
}

/// Keep a walk entry, logging and dropping it if it could not be read.
fn readable_entry(entry: walkdir::Result<DirEntry>) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            tracing::debug!(error = %err, "skipping unreadable entry");
            None
        }
    }
}

/// An allow-listed file found during a walk.
#[derive(Debug, Clone)]
struct SourceFile {
    path: PathBuf,
    name: String,
}

impl SourceFile {
    fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    fn lower_path(&self) -> String {
        self.path.to_string_lossy().to_lowercase()
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}
