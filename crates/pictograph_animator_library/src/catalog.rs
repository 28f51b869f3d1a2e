// SPDX-License-Identifier: MIT OR Apache-2.0
//! Catalog of named sequences.
//!
//! The catalog lists every sequence its [`CatalogSource`] offers, decodes the
//! first version of each, and caches the result as a [`CatalogIndex`] until
//! [`Catalog::invalidate`] or [`Catalog::refresh`] is called.

use crate::codec::extract_sequence;
use crate::source::{CatalogSource, SourceEntry};
use parking_lot::RwLock;
use pictograph_animator_core::{
    MotionType, PropAttributes, PropRotDir, SequenceData, SequenceMeta, SequenceStep,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Errors raised by the catalog or its source
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Filesystem access failed
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// No sequence with this name
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),

    /// The sequence exists but not this version
    #[error("Unknown version {version} of sequence {name}")]
    UnknownVersion {
        /// Sequence name
        name: String,
        /// Requested version
        version: String,
    },
}

impl CatalogError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Catalog behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Substitute [`placeholder_sequence`] for sequences that fail to decode
    /// instead of leaving them out
    pub placeholder_on_failure: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            placeholder_on_failure: true,
        }
    }
}

/// Length bucket by number of moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LengthBucket {
    /// At most 5 moves
    Short,
    /// 6 to 10 moves
    Medium,
    /// More than 10 moves
    Long,
}

impl LengthBucket {
    /// Bucket for a move count
    pub fn for_moves(moves: usize) -> Self {
        match moves {
            0..=5 => Self::Short,
            6..=10 => Self::Medium,
            _ => Self::Long,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Short (≤5 steps)",
            Self::Medium => "Medium (6-10 steps)",
            Self::Long => "Long (>10 steps)",
        }
    }
}

/// A filter over catalog items
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Declared level
    Level(u32),
    /// Declared prop type or grid mode; matches either field
    Tag(String),
    /// Move count bucket
    Length(LengthBucket),
}

impl Category {
    /// Whether `item` belongs to this category
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let meta = &item.metadata;
        match self {
            Self::Level(level) => meta.level == Some(*level),
            Self::Tag(tag) => {
                meta.prop_type.as_deref() == Some(tag.as_str())
                    || meta.grid_mode.as_deref() == Some(tag.as_str())
            }
            Self::Length(bucket) => LengthBucket::for_moves(item.move_count()) == *bucket,
        }
    }

    fn of_item(item: &CatalogItem) -> Vec<Self> {
        let meta = &item.metadata;
        let mut categories = Vec::with_capacity(4);
        if let Some(level) = meta.level {
            categories.push(Self::Level(level));
        }
        for tag in [&meta.prop_type, &meta.grid_mode].into_iter().flatten() {
            categories.push(Self::Tag(tag.clone()));
        }
        categories.push(Self::Length(LengthBucket::for_moves(item.move_count())));
        categories
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => write!(f, "Level {level}"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Length(bucket) => f.write_str(bucket.label()),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Stable id (the sequence name)
    pub id: String,
    /// Sequence name
    pub name: String,
    /// Available version files
    pub versions: Vec<String>,
    /// Header of the decoded sequence
    pub metadata: SequenceMeta,
    /// Decoded sequence
    pub sequence: SequenceData,
    /// Whether `sequence` is a stand-in for an undecodable file
    pub placeholder: bool,
}

impl CatalogItem {
    /// Number of moves, not counting a start-position entry
    pub fn move_count(&self) -> usize {
        self.sequence.move_count()
    }

    fn matches_query(&self, query: &str) -> bool {
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(query))
        };
        contains(Some(self.name.as_str()))
            || contains(self.metadata.word.as_deref())
            || contains(self.metadata.author.as_deref())
    }
}

/// Snapshot of the catalog
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    /// Items sorted by name
    pub items: Vec<CatalogItem>,
    /// Every category some item belongs to, sorted by label
    pub categories: Vec<Category>,
    /// Number of items
    pub total_count: usize,
    /// When the index was built
    pub built_at: SystemTime,
}

impl CatalogIndex {
    /// Look up a category by its display label
    pub fn category(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.to_string() == label)
    }
}

/// Catalog service over a [`CatalogSource`]
pub struct Catalog<S> {
    source: S,
    config: CatalogConfig,
    cache: RwLock<Option<Arc<CatalogIndex>>>,
}

impl<S: CatalogSource> Catalog<S> {
    /// Create a catalog; nothing is read until the index is first needed
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self {
            source,
            config,
            cache: RwLock::new(None),
        }
    }

    /// The underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The cached index, building it on first use
    pub fn index(&self) -> Result<Arc<CatalogIndex>, CatalogError> {
        if let Some(index) = self.cache.read().as_ref() {
            return Ok(Arc::clone(index));
        }

        let mut cache = self.cache.write();
        // Another caller may have built it while we waited for the lock
        if let Some(index) = cache.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.build_index()?);
        *cache = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Drop the cached index
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    /// Rebuild the index from the source
    pub fn refresh(&self) -> Result<Arc<CatalogIndex>, CatalogError> {
        self.invalidate();
        self.index()
    }

    /// Whether an index is currently cached
    pub fn is_cached(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Item with the given id
    pub fn get(&self, id: &str) -> Result<Option<CatalogItem>, CatalogError> {
        Ok(self.index()?.items.iter().find(|item| item.id == id).cloned())
    }

    /// Items in `category` (if given) whose name, word or author contains `query`.
    ///
    /// Matching is case-insensitive; a blank query matches everything.
    pub fn search(
        &self,
        query: &str,
        category: Option<&Category>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let index = self.index()?;
        let query = query.trim().to_lowercase();

        Ok(index
            .items
            .iter()
            .filter(|item| category.map_or(true, |c| c.matches(item)))
            .filter(|item| query.is_empty() || item.matches_query(&query))
            .cloned()
            .collect())
    }

    /// All categories of the current index
    pub fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.index()?.categories.clone())
    }

    fn build_index(&self) -> Result<CatalogIndex, CatalogError> {
        let entries = self.source.list()?;
        let mut items: Vec<CatalogItem> = entries
            .into_iter()
            .filter_map(|entry| self.build_item(entry))
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));

        let mut categories: Vec<Category> = items.iter().flat_map(Category::of_item).collect();
        categories.sort_by_cached_key(|c| (c.to_string(), c.clone()));
        categories.dedup();

        tracing::debug!(
            items = items.len(),
            categories = categories.len(),
            "Built sequence catalog"
        );

        Ok(CatalogIndex {
            total_count: items.len(),
            items,
            categories,
            built_at: SystemTime::now(),
        })
    }

    fn build_item(&self, entry: SourceEntry) -> Option<CatalogItem> {
        let primary = entry.versions.first()?;
        let decoded = self
            .source
            .read(&entry.name, primary)
            .map_err(|e| e.to_string())
            .and_then(|bytes| extract_sequence(&bytes).map_err(|e| e.to_string()));

        let (sequence, placeholder) = match decoded {
            Ok(sequence) => (sequence, false),
            Err(reason) if self.config.placeholder_on_failure => {
                tracing::warn!(
                    "Failed to load {}/{}: {}, using placeholder",
                    entry.name,
                    primary,
                    reason
                );
                (placeholder_sequence(&entry.name), true)
            }
            Err(reason) => {
                tracing::warn!(
                    "Failed to load {}/{}: {}, skipping",
                    entry.name,
                    primary,
                    reason
                );
                return None;
            }
        };

        Some(CatalogItem {
            id: entry.name.clone(),
            metadata: sequence.meta().clone(),
            name: entry.name,
            versions: entry.versions,
            sequence,
            placeholder,
        })
    }
}

/// Stand-in for a sequence whose file cannot be decoded: a static hold
/// followed by one clockwise quarter move of each hand.
pub fn placeholder_sequence(name: &str) -> SequenceData {
    let meta = SequenceMeta {
        word: Some(name.to_string()),
        author: Some("Unknown".to_string()),
        level: Some(1),
        prop_type: Some("staff".to_string()),
        grid_mode: Some("standard".to_string()),
        ..Default::default()
    };

    let attrs = |start: &str, end: &str, dir: PropRotDir, motion_type: MotionType| PropAttributes {
        start_loc: Some(start.to_string()),
        end_loc: Some(end.to_string()),
        start_ori: Some("in".to_string()),
        end_ori: Some("in".to_string()),
        prop_rot_dir: Some(dir),
        turns: Some(0.0),
        motion_type,
    };

    let steps = vec![
        SequenceStep {
            beat: 1.0,
            blue_attributes: attrs("s", "s", PropRotDir::NoRot, MotionType::Static),
            red_attributes: attrs("n", "n", PropRotDir::NoRot, MotionType::Static),
            ..Default::default()
        },
        SequenceStep {
            beat: 2.0,
            blue_attributes: attrs("s", "w", PropRotDir::Cw, MotionType::Pro),
            red_attributes: attrs("n", "e", PropRotDir::Cw, MotionType::Pro),
            ..Default::default()
        },
    ];

    SequenceData::new(meta, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::embed_sequence;
    use crate::source::MemorySource;

    fn sequence(word: &str, author: &str, level: u32, moves: usize) -> SequenceData {
        let meta = SequenceMeta {
            word: Some(word.to_string()),
            author: Some(author.to_string()),
            level: Some(level),
            prop_type: Some("staff".to_string()),
            grid_mode: Some("diamond".to_string()),
            ..Default::default()
        };
        // Leading start position at beat 0, then `moves` beats
        let steps = (0..=moves)
            .map(|beat| SequenceStep {
                beat: beat as f32,
                ..Default::default()
            })
            .collect();
        SequenceData::new(meta, steps)
    }

    fn png(data: &SequenceData) -> Vec<u8> {
        embed_sequence(data).unwrap()
    }

    fn source() -> MemorySource {
        MemorySource::new()
            .with_version("MOON", "MOON_ver1.png", png(&sequence("MOON", "Ada", 2, 4)))
            .with_version("AB", "AB_ver2.png", png(&sequence("AB", "Grace", 1, 8)))
            .with_version("AB", "AB_ver1.png", png(&sequence("AB", "Grace", 1, 7)))
            .with_version("BROKEN", "BROKEN_ver1.png", b"not a png".to_vec())
    }

    #[test]
    fn test_index_is_sorted_and_uses_first_version() {
        let catalog = Catalog::new(source(), CatalogConfig::default());
        let index = catalog.index().unwrap();

        let names: Vec<&str> = index.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["AB", "BROKEN", "MOON"]);
        assert_eq!(index.total_count, 3);

        let ab = &index.items[0];
        assert_eq!(ab.versions, vec!["AB_ver1.png", "AB_ver2.png"]);
        assert_eq!(ab.move_count(), 7);
        assert!(!ab.placeholder);
    }

    #[test]
    fn test_placeholder_on_failure() {
        let catalog = Catalog::new(source(), CatalogConfig::default());
        let broken = catalog.get("BROKEN").unwrap().unwrap();
        assert!(broken.placeholder);
        assert_eq!(broken.metadata.word.as_deref(), Some("BROKEN"));
        assert_eq!(broken.metadata.author.as_deref(), Some("Unknown"));
        assert_eq!(broken.sequence.steps().len(), 2);

        let strict = Catalog::new(
            source(),
            CatalogConfig {
                placeholder_on_failure: false,
            },
        );
        assert_eq!(strict.index().unwrap().total_count, 2);
        assert!(strict.get("BROKEN").unwrap().is_none());
    }

    #[test]
    fn test_placeholder_is_loadable() {
        let mut engine = pictograph_animator_core::AnimationEngine::default();
        engine.load(placeholder_sequence("X")).unwrap();
        assert_eq!(engine.total_beats(), 2.0);
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::new(source(), CatalogConfig::default());

        let by_author = catalog.search("grace", None).unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].id, "AB");

        assert_eq!(catalog.search("  ", None).unwrap().len(), 3);
        assert_eq!(catalog.search("moo", None).unwrap()[0].id, "MOON");
        assert!(catalog.search("zzz", None).unwrap().is_empty());

        let level_two = catalog.search("", Some(&Category::Level(2))).unwrap();
        assert_eq!(level_two.len(), 1);
        assert_eq!(level_two[0].id, "MOON");

        let medium = Category::Length(LengthBucket::Medium);
        let ids: Vec<String> = catalog
            .search("", Some(&medium))
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["AB"]);

        let diamond = Category::Tag("diamond".into());
        assert_eq!(catalog.search("a", Some(&diamond)).unwrap().len(), 2);
    }

    #[test]
    fn test_categories() {
        let catalog = Catalog::new(source(), CatalogConfig::default());
        let labels: Vec<String> = catalog
            .categories()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Level 1",
                "Level 2",
                "Medium (6-10 steps)",
                "Short (≤5 steps)",
                "diamond",
                "staff",
                "standard",
            ]
        );

        let index = catalog.index().unwrap();
        assert_eq!(index.category("Level 2"), Some(&Category::Level(2)));
        assert_eq!(index.category("nope"), None);
    }

    #[test]
    fn test_shared_tag_is_one_category() {
        let tagged = |word: &str, prop_type: Option<&str>, grid_mode: Option<&str>| {
            let meta = SequenceMeta {
                word: Some(word.to_string()),
                prop_type: prop_type.map(str::to_string),
                grid_mode: grid_mode.map(str::to_string),
                ..Default::default()
            };
            let steps = vec![SequenceStep {
                beat: 1.0,
                ..Default::default()
            }];
            png(&SequenceData::new(meta, steps))
        };
        let source = MemorySource::new()
            .with_version("A", "A_ver1.png", tagged("A", Some("x"), None))
            .with_version("B", "B_ver1.png", tagged("B", None, Some("x")))
            .with_version("C", "C_ver1.png", tagged("C", Some("x"), Some("x")));
        let catalog = Catalog::new(source, CatalogConfig::default());

        let labels: Vec<String> = catalog
            .categories()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["Short (≤5 steps)", "x"]);

        let index = catalog.index().unwrap();
        let x = index.category("x").unwrap();
        assert_eq!(x, &Category::Tag("x".into()));
        assert_eq!(catalog.search("", Some(x)).unwrap().len(), 3);
    }

    #[test]
    fn test_cache_and_invalidate() {
        let catalog = Catalog::new(source(), CatalogConfig::default());
        assert!(!catalog.is_cached());

        let first = catalog.index().unwrap();
        let second = catalog.index().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(catalog.is_cached());

        catalog.invalidate();
        assert!(!catalog.is_cached());
        let rebuilt = catalog.index().unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));

        let refreshed = catalog.refresh().unwrap();
        assert!(!Arc::ptr_eq(&rebuilt, &refreshed));
        assert_eq!(refreshed.total_count, 3);
    }

    #[test]
    fn test_length_buckets() {
        assert_eq!(LengthBucket::for_moves(0), LengthBucket::Short);
        assert_eq!(LengthBucket::for_moves(5), LengthBucket::Short);
        assert_eq!(LengthBucket::for_moves(6), LengthBucket::Medium);
        assert_eq!(LengthBucket::for_moves(10), LengthBucket::Medium);
        assert_eq!(LengthBucket::for_moves(11), LengthBucket::Long);
    }
}
