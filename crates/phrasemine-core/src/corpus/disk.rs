//! On-disk corpus backing.
//!
//! The spill file is the concatenation of all documents, each stored as
//! `doc_lengths[d]` little-endian 32-bit ids, with no header, footer, or
//! checksum. `offsets[d]` is the byte offset of document `d`, so the region
//! `[offsets[d], offsets[d] + 4 * lengths[d])` is exactly that document's id
//! stream in order.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::dictionary::TokenId;

/// A bounded `doc_id -> encoded document` cache with FIFO eviction.
#[derive(Debug)]
pub struct DocCache {
    capacity: usize,
    map: HashMap<usize, Vec<TokenId>>,
    order: VecDeque<usize>,
}

impl DocCache {
    /// Create a cache holding at most `capacity` documents.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Look up a cached document.
    pub fn get(&self, doc_id: usize) -> Option<&Vec<TokenId>> {
        self.map.get(&doc_id)
    }

    /// Insert a document, evicting the oldest entry when full. A zero
    /// capacity disables caching entirely.
    pub fn insert(&mut self, doc_id: usize, doc: Vec<TokenId>) {
        if self.capacity == 0 || self.map.contains_key(&doc_id) {
            return;
        }
        if self.map.len() >= self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.map.remove(&oldest);
        }
        self.order.push_back(doc_id);
        self.map.insert(doc_id, doc);
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Random access to the binary spill file, fronted by a [`DocCache`].
#[derive(Debug)]
pub struct DiskCorpus {
    path: PathBuf,
    offsets: Vec<u64>,
    lengths: Vec<usize>,
    cache: DocCache,
    file: Option<File>,
}

impl DiskCorpus {
    /// Wrap a written spill file.
    pub(crate) fn new(
        path: PathBuf,
        offsets: Vec<u64>,
        lengths: Vec<usize>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            path,
            offsets,
            lengths,
            cache: DocCache::new(cache_capacity),
            file: None,
        }
    }

    /// Seed the cache with a document encoded during loading.
    pub(crate) fn preload(&mut self, doc_id: usize, doc: Vec<TokenId>) {
        self.cache.insert(doc_id, doc);
    }

    /// Number of spilled documents.
    pub fn doc_count(&self) -> usize {
        self.lengths.len()
    }

    /// Number of documents currently cached.
    pub fn cached_docs(&self) -> usize {
        self.cache.len()
    }

    /// Fetch one document, from the cache or by reading the spill file.
    pub fn document(&mut self, doc_id: usize) -> io::Result<Vec<TokenId>> {
        if let Some(doc) = self.cache.get(doc_id) {
            return Ok(doc.clone());
        }
        let offset = self.offsets[doc_id];
        let len = self.lengths[doc_id];
        let file = match self.file.as_mut() {
            Some(f) => f,
            None => self.file.insert(File::open(&self.path)?),
        };
        file.seek(SeekFrom::Start(offset))?;
        let doc = read_ids(file, len)?;
        self.cache.insert(doc_id, doc.clone());
        Ok(doc)
    }

    /// Read every document back into memory, in order.
    pub fn load_all(&self) -> io::Result<Vec<Vec<TokenId>>> {
        let mut file = File::open(&self.path)?;
        let mut docs = Vec::with_capacity(self.lengths.len());
        for (d, &len) in self.lengths.iter().enumerate() {
            file.seek(SeekFrom::Start(self.offsets[d]))?;
            docs.push(read_ids(&mut file, len)?);
        }
        Ok(docs)
    }
}

fn read_ids<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<TokenId>> {
    let mut bytes = vec![0u8; len * 4];
    reader.read_exact(&mut bytes)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|b| TokenId::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_spill(docs: &[Vec<TokenId>]) -> (tempfile::TempDir, PathBuf, Vec<u64>, Vec<usize>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.bin");
        let mut file = File::create(&path).unwrap();
        let mut offsets = Vec::new();
        let mut lengths = Vec::new();
        let mut offset = 0u64;
        for doc in docs {
            offsets.push(offset);
            lengths.push(doc.len());
            for &id in doc {
                file.write_all(&id.to_le_bytes()).unwrap();
            }
            offset += 4 * doc.len() as u64;
        }
        file.flush().unwrap();
        (dir, path, offsets, lengths)
    }

    #[test]
    fn document_reads_back_exactly() {
        let docs = vec![vec![0, 1, 2], vec![], vec![3, 3, 4, 5]];
        let (_dir, path, offsets, lengths) = write_spill(&docs);
        let mut disk = DiskCorpus::new(path, offsets, lengths, 10);
        for (d, expected) in docs.iter().enumerate() {
            assert_eq!(&disk.document(d).unwrap(), expected);
        }
        // second fetch comes from the cache
        assert_eq!(disk.document(2).unwrap(), docs[2]);
        assert_eq!(disk.cached_docs(), 3);
    }

    #[test]
    fn load_all_round_trips() {
        let docs = vec![vec![7, 8], vec![9], vec![10, 11, 12]];
        let (_dir, path, offsets, lengths) = write_spill(&docs);
        let disk = DiskCorpus::new(path, offsets, lengths, 0);
        assert_eq!(disk.load_all().unwrap(), docs);
    }

    #[test]
    fn cache_stays_bounded() {
        let mut cache = DocCache::new(2);
        cache.insert(0, vec![0]);
        cache.insert(1, vec![1]);
        cache.insert(2, vec![2]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(0).is_none());
        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn zero_capacity_cache_never_stores() {
        let mut cache = DocCache::new(0);
        cache.insert(0, vec![1, 2, 3]);
        assert!(cache.is_empty());
        assert!(cache.get(0).is_none());
    }
}
