//! Asset sources — named template blobs behind one capability interface.
//!
//! A source exposes two primitives: the full list of logical names and a
//! single-asset read. Path scoping, recursion limits, and exclusion
//! filtering are provided `list`/`read_all` logic over those primitives,
//! so every implementation filters identically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{read_err, SourceError};
use crate::split::split_documents;

/// One named unit of template source content, immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Logical identifier: a `/`-separated relative path, or a positional
    /// index for sources without natural names.
    pub name: String,
    /// Raw content before rendering.
    pub content: String,
}

/// Abstraction over named template blobs with optional tree scoping.
///
/// `Send + Sync` so a processor built on any source can be shared across
/// threads; implementations must not mutate shared state during reads.
pub trait AssetSource: Send + Sync {
    /// Every logical asset name in the source.
    fn names(&self) -> Result<Vec<String>, SourceError>;

    /// Read one asset by logical name.
    fn read(&self, name: &str) -> Result<Asset, SourceError>;

    /// Names under `path`, minus exclusions.
    ///
    /// `path` of `""` or `"."` selects everything; otherwise a name
    /// matches when it equals `path` or sits below `path/`. With
    /// `recursive = false` only direct children of `path` are kept.
    /// `excluded` entries match by substring containment against the full
    /// name; any match removes the asset from listing and reading alike.
    fn list(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
    ) -> Result<Vec<String>, SourceError> {
        Ok(self
            .names()?
            .into_iter()
            .filter(|name| in_path(name, path, recursive))
            .filter(|name| !excluded.iter().any(|fragment| name.contains(fragment.as_str())))
            .collect())
    }

    /// Read every asset selected by [`AssetSource::list`].
    fn read_all(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
    ) -> Result<Vec<Asset>, SourceError> {
        self.list(path, excluded, recursive)?
            .iter()
            .map(|name| self.read(name))
            .collect()
    }
}

/// `name` is selected by `path` under the recursion rule.
fn in_path(name: &str, path: &str, recursive: bool) -> bool {
    let remainder = if path.is_empty() || path == "." {
        name
    } else if name == path {
        return true;
    } else if let Some(rest) = name.strip_prefix(path).and_then(|r| r.strip_prefix('/')) {
        rest
    } else {
        return false;
    };
    recursive || !remainder.contains('/')
}

// ---------------------------------------------------------------------------
// DirSource
// ---------------------------------------------------------------------------

/// Filesystem source rooted at a directory.
///
/// Logical names are `/`-separated paths relative to the root regardless
/// of platform separator; listings are sorted per directory for
/// determinism.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    fn collect(&self, dir: &Path, out: &mut Vec<String>) -> Result<(), SourceError> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| read_err(dir, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_err(dir, e))?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| read_err(&path, e))?;
            if file_type.is_dir() {
                self.collect(&path, out)?;
            } else if file_type.is_file() {
                out.push(self.logical_name(&path));
            }
        }
        Ok(())
    }

    fn logical_name(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }
}

impl AssetSource for DirSource {
    fn names(&self) -> Result<Vec<String>, SourceError> {
        if !self.root.exists() {
            return Err(SourceError::NotFound {
                name: self.root.display().to_string(),
            });
        }
        tracing::debug!("scanning template root {}", self.root.display());
        let mut names = Vec::new();
        self.collect(&self.root, &mut names)?;
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Asset, SourceError> {
        let path = self.root.join(name);
        if !path.exists() {
            return Err(SourceError::NotFound {
                name: name.to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| read_err(&path, e))?;
        Ok(Asset {
            name: name.to_string(),
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// In-memory source over a fixed name → content mapping.
///
/// Pure; names come back in sorted order so listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new(assets: BTreeMap<String, String>) -> Self {
        MemorySource { assets }
    }

    /// Build from `(name, content)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        MemorySource {
            assets: pairs
                .into_iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        }
    }
}

impl AssetSource for MemorySource {
    fn names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.assets.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Asset, SourceError> {
        let content = self.assets.get(name).ok_or_else(|| SourceError::NotFound {
            name: name.to_string(),
        })?;
        Ok(Asset {
            name: name.to_string(),
            content: content.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// StringSource
// ---------------------------------------------------------------------------

/// One string split into index-named assets on a delimiter.
///
/// Every document becomes an asset named by its positional index (`"0"`,
/// `"1"`, ...), in order of appearance. Pure.
#[derive(Debug, Clone)]
pub struct StringSource {
    documents: Vec<String>,
}

impl StringSource {
    pub fn new(content: &str, delimiter: &str) -> Self {
        StringSource {
            documents: split_documents(content, delimiter),
        }
    }
}

impl AssetSource for StringSource {
    fn names(&self) -> Result<Vec<String>, SourceError> {
        Ok((0..self.documents.len()).map(|i| i.to_string()).collect())
    }

    fn read(&self, name: &str) -> Result<Asset, SourceError> {
        let not_found = || SourceError::NotFound {
            name: name.to_string(),
        };
        let index: usize = name.parse().map_err(|_| not_found())?;
        let content = self.documents.get(index).ok_or_else(not_found)?;
        Ok(Asset {
            name: name.to_string(),
            content: content.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
