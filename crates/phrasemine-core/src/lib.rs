//! Core library for phrasemine.
//!
//! This crate mines frequent contiguous phrases from a corpus of text
//! documents: tokenize, encode every document into dense 32-bit token ids,
//! then run one of two mining strategies over the frozen corpus.
//!
//! # Modules
//!
//! - [`tokenize`] - ASCII-alphanumeric tokenization with UTF-16 BOM dispatch
//! - [`dictionary`] - token string ↔ id bijection with document frequencies
//! - [`corpus`] - loading (directory or CSV), sampling, on-disk spill
//! - [`mine`] - the greedy max-phrase and contiguous PrefixSpan miners
//! - [`output`] - result CSV emission
//! - [`cancel`] - cooperative cancellation flag
//! - [`config`] - configuration loading and management
//! - [`error`] - error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use phrasemine_core::{CancelFlag, LoadOptions, MinerParams, corpus, mine, output};
//!
//! let opts = LoadOptions::default();
//! let mut loaded = corpus::load_directory(std::path::Path::new("docs"), &opts)
//!     .expect("failed to load corpus");
//! loaded.ensure_in_memory().expect("failed to rehydrate corpus");
//!
//! let params = MinerParams { min_docs: 10, min_len: 4 };
//! let phrases = mine::mine_greedy(&loaded, &params, &CancelFlag::new());
//! output::write_csv(std::path::Path::new("results_max.csv"), &phrases, &loaded)
//!     .expect("failed to write results");
//! ```
#![deny(unsafe_code)]

pub mod cancel;

pub mod config;

pub mod corpus;

pub mod dictionary;

pub mod error;

pub mod mine;

pub mod output;

pub mod tokenize;

pub use cancel::CancelFlag;

pub use config::{Config, ConfigLoader, LogLevel};

pub use corpus::{Corpus, FileMask, LoadOptions};

pub use dictionary::{Dictionary, TokenId};

pub use error::{ConfigError, ConfigResult, LoadError, LoadResult};

pub use mine::{MinerParams, Occurrence, PatternFilter, Phrase, mine_greedy, mine_prefixspan};
