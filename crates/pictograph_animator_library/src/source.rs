// SPDX-License-Identifier: MIT OR Apache-2.0
//! Where catalog sequences are read from.

use crate::catalog::CatalogError;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A named sequence and its available version files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Sequence name (also its catalog id)
    pub name: String,
    /// Version file names, sorted
    pub versions: Vec<String>,
}

/// Storage backing a [`Catalog`](crate::catalog::Catalog)
pub trait CatalogSource: Send + Sync {
    /// Enumerate the available sequences
    fn list(&self) -> Result<Vec<SourceEntry>, CatalogError>;

    /// Read the raw bytes of one version
    fn read(&self, name: &str, version: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Sequences stored as `<root>/<NAME>/<version>.png`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn png_versions(dir: &Path) -> Result<Vec<String>, CatalogError> {
        let mut versions = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))? {
            let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
            let path = entry.path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if !is_png || !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                versions.push(name.to_string());
            }
        }
        versions.sort();
        Ok(versions)
    }
}

impl CatalogSource for DirectorySource {
    fn list(&self) -> Result<Vec<SourceEntry>, CatalogError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| CatalogError::io(&self.root, e))? {
            let entry = entry.map_err(|e| CatalogError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::debug!("Skipping non UTF-8 directory {:?}", path);
                continue;
            };

            let versions = Self::png_versions(&path)?;
            if versions.is_empty() {
                continue;
            }
            entries.push(SourceEntry {
                name: name.to_string(),
                versions,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, name: &str, version: &str) -> Result<Vec<u8>, CatalogError> {
        if !is_plain_component(name) {
            return Err(CatalogError::UnknownSequence(name.to_string()));
        }
        if !is_plain_component(version) {
            return Err(CatalogError::UnknownVersion {
                name: name.to_string(),
                version: version.to_string(),
            });
        }

        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(CatalogError::UnknownSequence(name.to_string()));
        }
        let path = dir.join(version);
        if !path.is_file() {
            return Err(CatalogError::UnknownVersion {
                name: name.to_string(),
                version: version.to_string(),
            });
        }
        fs::read(&path).map_err(|e| CatalogError::io(&path, e))
    }
}

/// Reject anything that could escape the root directory
fn is_plain_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

/// Sequences held in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sequences: IndexMap<String, IndexMap<String, Vec<u8>>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one version of a sequence
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>, bytes: Vec<u8>) {
        self.sequences
            .entry(name.into())
            .or_default()
            .insert(version.into(), bytes);
    }

    /// Builder-style [`MemorySource::insert`]
    pub fn with_version(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.insert(name, version, bytes);
        self
    }
}

impl CatalogSource for MemorySource {
    fn list(&self) -> Result<Vec<SourceEntry>, CatalogError> {
        Ok(self
            .sequences
            .iter()
            .map(|(name, versions)| {
                let mut versions: Vec<String> = versions.keys().cloned().collect();
                versions.sort();
                SourceEntry {
                    name: name.clone(),
                    versions,
                }
            })
            .collect())
    }

    fn read(&self, name: &str, version: &str) -> Result<Vec<u8>, CatalogError> {
        let versions = self
            .sequences
            .get(name)
            .ok_or_else(|| CatalogError::UnknownSequence(name.to_string()))?;
        versions
            .get(version)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownVersion {
                name: name.to_string(),
                version: version.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_listing() {
        let root = tempfile::tempdir().unwrap();
        let ab = root.path().join("AB");
        fs::create_dir(&ab).unwrap();
        fs::write(ab.join("AB_ver2.png"), b"two").unwrap();
        fs::write(ab.join("AB_ver1.PNG"), b"one").unwrap();
        fs::write(ab.join("notes.txt"), b"skip").unwrap();
        fs::create_dir(root.path().join("EMPTY")).unwrap();
        fs::write(root.path().join("stray.png"), b"skip").unwrap();

        let source = DirectorySource::new(root.path());
        let entries = source.list().unwrap();
        assert_eq!(
            entries,
            vec![SourceEntry {
                name: "AB".into(),
                versions: vec!["AB_ver1.PNG".into(), "AB_ver2.png".into()],
            }]
        );
        assert_eq!(source.read("AB", "AB_ver2.png").unwrap(), b"two");
    }

    #[test]
    fn test_directory_read_errors() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("AB")).unwrap();
        let source = DirectorySource::new(root.path());

        assert!(matches!(
            source.read("ZZ", "ZZ_ver1.png"),
            Err(CatalogError::UnknownSequence(_))
        ));
        assert!(matches!(
            source.read("AB", "AB_ver9.png"),
            Err(CatalogError::UnknownVersion { .. })
        ));
        assert!(matches!(
            source.read("..", "secret.png"),
            Err(CatalogError::UnknownSequence(_))
        ));
        assert!(matches!(
            source.read("AB", "../AB"),
            Err(CatalogError::UnknownVersion { .. })
        ));

        let missing = DirectorySource::new(root.path().join("nope"));
        assert!(matches!(missing.list(), Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with_version("B", "B_ver2.png", vec![2])
            .with_version("B", "B_ver1.png", vec![1])
            .with_version("A", "A_ver1.png", vec![3]);

        let entries = source.list().unwrap();
        assert_eq!(entries[0].name, "B");
        assert_eq!(entries[0].versions, vec!["B_ver1.png", "B_ver2.png"]);
        assert_eq!(source.read("A", "A_ver1.png").unwrap(), vec![3]);
        assert!(source.read("C", "x").is_err());
    }
}
