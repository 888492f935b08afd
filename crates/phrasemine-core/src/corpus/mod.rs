//! Integer-encoded corpus model and its loaders.
//!
//! A corpus is an ordered sequence of documents, each a dense vector of
//! [`TokenId`]s, plus a parallel sequence of source identifiers (file paths
//! for directory input, `row_<i>` for CSV input). The corpus is built once,
//! frozen, and read immutably by the miners. In on-disk mode the encoded id
//! streams live in a binary spill file instead of memory and are rehydrated
//! before mining.

pub mod csv;
pub mod disk;
mod loader;

pub use loader::{load_csv, load_directory};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::dictionary::{Dictionary, TokenId};
use crate::error::LoadResult;

/// How directory enumeration decides which files to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMask {
    /// Accept every regular file.
    All,
    /// Accept files whose extension equals the stored extension.
    Extension(String),
    /// Accept files whose file name equals the stored name exactly.
    Exact(String),
}

impl FileMask {
    /// Parse a mask string: empty or `"*"` accepts all, `"*.ext"` matches by
    /// extension, anything else matches the file name exactly.
    pub fn parse(mask: &str) -> Self {
        if mask.is_empty() || mask == "*" {
            Self::All
        } else if let Some(ext) = mask.strip_prefix("*.") {
            Self::Extension(ext.to_string())
        } else {
            Self::Exact(mask.to_string())
        }
    }

    /// Whether `path` passes the mask.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::All => true,
            Self::Extension(ext) => path.extension() == Some(OsStr::new(ext)),
            Self::Exact(name) => path.file_name() == Some(OsStr::new(name)),
        }
    }
}

/// Options controlling corpus loading.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory-mode file mask.
    pub mask: FileMask,
    /// Fraction of input documents to retain, in `[0, 1]`.
    pub sampling: f64,
    /// Upper bound on tokenization worker threads; 0 uses the pool default.
    pub threads: usize,
    /// Seed for the sampling shuffle. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Keep encoded documents in memory instead of spilling to disk.
    pub in_memory: bool,
    /// Populate the document cache while spilling.
    pub preload: bool,
    /// Maximum number of cached documents in on-disk mode.
    pub cache_capacity: usize,
    /// Advisory memory cap in MiB; 0 means unlimited. Exceeding it logs a
    /// warning, nothing more.
    pub memory_limit_mb: usize,
    /// CSV field delimiter.
    pub csv_delimiter: u8,
    /// Path of the binary spill file for on-disk mode.
    pub spill_path: PathBuf,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mask: FileMask::All,
            sampling: 1.0,
            threads: 0,
            seed: None,
            in_memory: true,
            preload: false,
            cache_capacity: 1000,
            memory_limit_mb: 0,
            csv_delimiter: b',',
            spill_path: PathBuf::from("corpus.bin"),
        }
    }
}

/// An integer-encoded document collection with its dictionary and sources.
#[derive(Debug)]
pub struct Corpus {
    /// Encoded documents, indexed by `doc_id`. Empty in on-disk mode until
    /// [`ensure_in_memory`](Self::ensure_in_memory) rehydrates them.
    pub docs: Vec<Vec<TokenId>>,
    /// The frozen token dictionary.
    pub dictionary: Dictionary,
    /// Source identifier per document; `sources.len()` equals the document
    /// count in every mode.
    pub sources: Vec<String>,
    /// Token count per document, valid in both modes.
    pub doc_lengths: Vec<usize>,
    /// Binary backing for on-disk mode.
    pub disk: Option<disk::DiskCorpus>,
}

impl Corpus {
    /// Number of documents.
    pub fn doc_count(&self) -> usize {
        self.sources.len()
    }

    /// Total token count across all documents.
    pub fn total_tokens(&self) -> usize {
        self.doc_lengths.iter().sum()
    }

    /// Whether every encoded document is resident in memory.
    pub fn is_in_memory(&self) -> bool {
        self.docs.len() == self.sources.len()
    }

    /// Rehydrate all documents from the spill file. No-op when the corpus is
    /// already in memory; the miners require this before running.
    #[tracing::instrument(skip_all, fields(docs = self.doc_count()))]
    pub fn ensure_in_memory(&mut self) -> LoadResult<()> {
        if self.is_in_memory() {
            return Ok(());
        }
        let Some(ref disk) = self.disk else {
            return Ok(());
        };
        tracing::info!("rehydrating on-disk corpus for mining");
        self.docs = disk.load_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_star_masks_accept_everything() {
        for raw in ["", "*"] {
            let mask = FileMask::parse(raw);
            assert!(mask.matches(Path::new("a/b/c.txt")));
            assert!(mask.matches(Path::new("no_extension")));
        }
    }

    #[test]
    fn extension_mask_matches_extension_only() {
        let mask = FileMask::parse("*.txt");
        assert_eq!(mask, FileMask::Extension("txt".to_string()));
        assert!(mask.matches(Path::new("notes.txt")));
        assert!(mask.matches(Path::new("dir/deep/file.txt")));
        assert!(!mask.matches(Path::new("notes.md")));
        assert!(!mask.matches(Path::new("txt")));
    }

    #[test]
    fn other_masks_match_file_name_exactly() {
        let mask = FileMask::parse("README");
        assert!(mask.matches(Path::new("docs/README")));
        assert!(!mask.matches(Path::new("docs/README.md")));
    }
}
