// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequence files and the sequence catalog.
//!
//! - [`codec`] reads and writes the sequence embedded in a PNG text chunk
//! - [`catalog`] indexes, caches and searches a collection of sequences
//! - [`source`] abstracts where that collection lives

pub mod catalog;
pub mod codec;
pub mod source;

pub use catalog::{
    placeholder_sequence, Catalog, CatalogConfig, CatalogError, CatalogIndex, CatalogItem,
    Category, LengthBucket,
};
pub use codec::{embed_sequence, extract_sequence, parse_payload, CodecError, METADATA_KEYWORD};
pub use source::{CatalogSource, DirectorySource, MemorySource, SourceEntry};
