//! Corpus loading: enumeration, sampling, parallel tokenization, encoding.
//!
//! Loading runs in two phases. Phase I tokenizes every input in parallel;
//! Phase II interns tokens sequentially in input order, so first-seen id
//! assignment is deterministic for a fixed input sequence. Saved binary
//! corpora depend on that determinism.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::corpus::disk::DiskCorpus;
use crate::corpus::{Corpus, FileMask, LoadOptions, csv};
use crate::dictionary::Dictionary;
use crate::error::{LoadError, LoadResult};
use crate::tokenize;

/// Load a corpus from a directory tree.
///
/// Regular files under `root` passing the mask are enumerated recursively,
/// shuffled, and truncated to the sampling fraction. Unreadable files and
/// directories are skipped silently.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn load_directory(root: &Path, opts: &LoadOptions) -> LoadResult<Corpus> {
    if !root.exists() {
        return Err(LoadError::InputNotFound {
            path: root.display().to_string(),
        });
    }
    let mut paths = Vec::new();
    collect_files(root, &opts.mask, &mut paths);
    paths.sort();

    let total = paths.len();
    sample(&mut paths, opts.sampling, opts.seed);
    info!(
        found = total,
        processing = paths.len(),
        sampling = opts.sampling,
        "scanned directory"
    );

    let raw_docs = tokenize_parallel(&paths, opts, |path| {
        fs::read(path).map(|bytes| tokenize::tokenize_document(&bytes))
    })?;

    let sources = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>();
    encode(raw_docs, sources, opts)
}

/// Load a corpus from a CSV file, one pseudo-document per row.
///
/// Rows are shuffled and sampled only when `sampling < 1.0`; sources are
/// `row_<i>` with the post-sampling index.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_csv(path: &Path, opts: &LoadOptions) -> LoadResult<Corpus> {
    if !path.exists() {
        return Err(LoadError::InputNotFound {
            path: path.display().to_string(),
        });
    }
    let bytes = fs::read(path)?;
    let mut rows = csv::read_rows(&bytes, opts.csv_delimiter);
    drop(bytes);

    if opts.sampling < 1.0 {
        sample(&mut rows, opts.sampling, opts.seed);
    }
    info!(rows = rows.len(), "collected csv rows");

    let raw_docs = tokenize_parallel(&rows, opts, |row| Ok(tokenize::tokenize(row)))?;

    let sources = (0..raw_docs.len()).map(|i| format!("row_{i}")).collect();
    encode(raw_docs, sources, opts)
}

fn collect_files(root: &Path, mask: &FileMask, out: &mut Vec<PathBuf>) {
    if root.is_file() {
        // single-file fallback: treat the path itself as the listing
        if mask.matches(root) {
            out.push(root.to_path_buf());
        }
        return;
    }
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, mask, out);
        } else if path.is_file() && mask.matches(&path) {
            out.push(path);
        }
    }
}

fn sample<T>(items: &mut Vec<T>, sampling: f64, seed: Option<u64>) {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    items.shuffle(&mut rng);
    let keep = (items.len() as f64 * sampling) as usize;
    items.truncate(keep.min(items.len()));
}

/// Phase I: tokenize every input independently on a bounded worker pool.
/// `raw_docs[i]` corresponds to the i-th input; a failed read yields an
/// empty document.
fn tokenize_parallel<T, F>(
    inputs: &[T],
    opts: &LoadOptions,
    tokenize_one: F,
) -> LoadResult<Vec<Vec<String>>>
where
    T: Sync,
    F: Fn(&T) -> std::io::Result<Vec<String>> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()?;
    debug!(threads = pool.current_num_threads(), "phase I: tokenizing");
    Ok(pool.install(|| {
        inputs
            .par_iter()
            .map(|input| tokenize_one(input).unwrap_or_default())
            .collect()
    }))
}

/// Phase II: sequential dictionary construction, document-frequency
/// counting, and either in-memory encoding or binary spill.
fn encode(
    raw_docs: Vec<Vec<String>>,
    sources: Vec<String>,
    opts: &LoadOptions,
) -> LoadResult<Corpus> {
    debug!(docs = raw_docs.len(), "phase II: encoding");
    let mut dictionary = Dictionary::new();
    let mut docs = Vec::new();
    let mut doc_lengths = Vec::with_capacity(raw_docs.len());
    if opts.in_memory {
        docs.reserve(raw_docs.len());
    }

    let mut spill = if opts.in_memory {
        None
    } else {
        Some(SpillWriter::create(&opts.spill_path)?)
    };
    let mut preloaded: Vec<(usize, Vec<u32>)> = Vec::new();

    let limit_bytes = opts.memory_limit_mb as u64 * 1024 * 1024;
    let mut encoded_bytes = 0u64;
    let mut limit_warned = false;

    for (i, raw) in raw_docs.into_iter().enumerate() {
        let mut encoded = Vec::with_capacity(raw.len());
        for word in &raw {
            let id = dictionary.intern(word);
            dictionary.bump_df(id, i as u32);
            encoded.push(id);
        }

        encoded_bytes += 4 * encoded.len() as u64;
        if limit_bytes > 0 && !limit_warned && encoded_bytes > limit_bytes {
            warn!(
                limit_mb = opts.memory_limit_mb,
                "encoded corpus exceeds the advisory memory limit"
            );
            limit_warned = true;
        }

        doc_lengths.push(encoded.len());
        match spill.as_mut() {
            Some(writer) => {
                writer.append(&encoded)?;
                if opts.preload && preloaded.len() < opts.cache_capacity {
                    preloaded.push((i, encoded));
                }
            }
            None => docs.push(encoded),
        }
    }
    dictionary.release_markers();

    let disk = match spill {
        Some(writer) => {
            let offsets = writer.finish()?;
            let mut disk = DiskCorpus::new(
                opts.spill_path.clone(),
                offsets,
                doc_lengths.clone(),
                opts.cache_capacity,
            );
            for (doc_id, doc) in preloaded {
                disk.preload(doc_id, doc);
            }
            Some(disk)
        }
        None => None,
    };

    info!(
        docs = sources.len(),
        tokens = doc_lengths.iter().sum::<usize>(),
        dictionary = dictionary.len(),
        on_disk = disk.is_some(),
        "corpus loaded"
    );
    Ok(Corpus {
        docs,
        dictionary,
        sources,
        doc_lengths,
        disk,
    })
}

struct SpillWriter {
    out: BufWriter<File>,
    offset: u64,
    offsets: Vec<u64>,
}

impl SpillWriter {
    fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            offset: 0,
            offsets: Vec::new(),
        })
    }

    fn append(&mut self, encoded: &[u32]) -> std::io::Result<()> {
        self.offsets.push(self.offset);
        for &id in encoded {
            self.out.write_all(&id.to_le_bytes())?;
        }
        self.offset += 4 * encoded.len() as u64;
        Ok(())
    }

    fn finish(mut self) -> std::io::Result<Vec<u64>> {
        self.out.flush()?;
        Ok(self.offsets)
    }
}
