//! Contiguous PrefixSpan mining.
//!
//! The database is a list of projections `(doc_id, pos, origin)`: positions
//! at which the current prefix has just been matched, with the position the
//! match started at. Extension is strictly contiguous: only the immediate
//! successor position projects into the next database.
//!
//! The CLOSED filter is the local single-token rule: a prefix is suppressed
//! when some one-token extension keeps its support. It does not globally
//! verify that no longer super-sequence has equal support.

use std::collections::HashMap;

use tracing::info;

use crate::cancel::CancelFlag;
use crate::corpus::Corpus;
use crate::dictionary::TokenId;
use crate::mine::{MinerParams, Occurrence, Phrase};

/// Which mined patterns are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternFilter {
    /// Every frequent pattern of sufficient length.
    All,
    /// Patterns with no single-token extension of equal support.
    #[default]
    Closed,
    /// Patterns with no frequent extension at all.
    Maximal,
}

#[derive(Debug, Clone, Copy)]
struct Projection {
    doc_id: u32,
    pos: u32,
    origin: u32,
}

/// Mine contiguous frequent patterns depth-first. Result order follows the
/// depth-first traversal; callers wanting support order sort afterwards.
#[tracing::instrument(skip_all, fields(min_docs = params.min_docs, min_len = params.min_len, filter = ?filter))]
pub fn mine_prefixspan(
    corpus: &Corpus,
    params: &MinerParams,
    filter: PatternFilter,
    cancel: &CancelFlag,
) -> Vec<Phrase> {
    let mut db = Vec::new();
    let mut initial_support = 0usize;
    for (d, doc) in corpus.docs.iter().enumerate() {
        if doc.is_empty() {
            continue;
        }
        initial_support += 1;
        for j in 0..doc.len() {
            db.push(Projection {
                doc_id: d as u32,
                pos: j as u32,
                origin: j as u32,
            });
        }
    }

    let mut miner = Miner {
        docs: &corpus.docs,
        params,
        filter,
        cancel,
        results: Vec::new(),
    };
    let mut prefix = Vec::new();
    miner.expand(&db, &mut prefix, initial_support);
    info!(patterns = miner.results.len(), "prefixspan mining done");
    miner.results
}

struct Miner<'a> {
    docs: &'a [Vec<TokenId>],
    params: &'a MinerParams,
    filter: PatternFilter,
    cancel: &'a CancelFlag,
    results: Vec<Phrase>,
}

impl Miner<'_> {
    fn expand(&mut self, db: &[Projection], prefix: &mut Vec<TokenId>, support: usize) {
        if self.cancel.is_cancelled() {
            return;
        }

        // Distinct-document counting rides on the database ordering:
        // projections of one document are contiguous, so appending a doc id
        // only when it differs from the last appended one dedupes without
        // per-call state.
        let mut extensions: HashMap<TokenId, Vec<u32>> = HashMap::new();
        for proj in db {
            let doc = &self.docs[proj.doc_id as usize];
            if (proj.pos as usize) < doc.len() {
                let token = doc[proj.pos as usize];
                let docs_seen = extensions.entry(token).or_default();
                if docs_seen.last() != Some(&proj.doc_id) {
                    docs_seen.push(proj.doc_id);
                }
            }
        }

        let mut has_frequent = false;
        let mut has_same_support = false;
        for docs_seen in extensions.values() {
            if docs_seen.len() >= self.params.min_docs {
                has_frequent = true;
                if docs_seen.len() == support {
                    has_same_support = true;
                }
            }
        }

        let emit = prefix.len() >= self.params.min_len
            && match self.filter {
                PatternFilter::All => true,
                PatternFilter::Maximal => !has_frequent,
                PatternFilter::Closed => !has_same_support,
            };
        if emit {
            self.results.push(Phrase {
                tokens: prefix.clone(),
                support,
                occurrences: pattern_starts(db, prefix.len() as u32),
            });
        }

        // Ascending token id keeps the traversal deterministic.
        let mut frequent: Vec<(TokenId, usize)> = extensions
            .into_iter()
            .filter(|(_, docs_seen)| docs_seen.len() >= self.params.min_docs)
            .map(|(token, docs_seen)| (token, docs_seen.len()))
            .collect();
        frequent.sort_unstable_by_key(|&(token, _)| token);

        for (token, token_support) in frequent {
            let mut next_db = Vec::new();
            for proj in db {
                let doc = &self.docs[proj.doc_id as usize];
                let p = proj.pos as usize;
                if p < doc.len() && doc[p] == token && p + 1 < doc.len() {
                    next_db.push(Projection {
                        doc_id: proj.doc_id,
                        pos: proj.pos + 1,
                        origin: proj.origin,
                    });
                }
            }
            prefix.push(token);
            // Recurse even into an empty database: a pattern that reaches
            // every document end still gets its emission check there.
            self.expand(&next_db, prefix, token_support);
            prefix.pop();
        }
    }
}

/// One occurrence per distinct document, at the position the pattern
/// started. Projections sit one past the matched prefix, so the start is
/// `pos - len` (the projection origin).
fn pattern_starts(db: &[Projection], len: u32) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = Vec::new();
    for proj in db {
        if occurrences.last().map(|o| o.doc_id) != Some(proj.doc_id) {
            occurrences.push(Occurrence {
                doc_id: proj.doc_id,
                pos: proj.pos - len,
            });
        }
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    fn corpus_of(texts: &[&str]) -> Corpus {
        let mut dictionary = Dictionary::new();
        let mut docs = Vec::new();
        let mut sources = Vec::new();
        let mut doc_lengths = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let mut encoded = Vec::new();
            for word in text.split_whitespace() {
                let id = dictionary.intern(word);
                dictionary.bump_df(id, i as u32);
                encoded.push(id);
            }
            doc_lengths.push(encoded.len());
            docs.push(encoded);
            sources.push(format!("doc_{i}"));
        }
        Corpus {
            docs,
            dictionary,
            sources,
            doc_lengths,
            disk: None,
        }
    }

    fn params(min_docs: usize, min_len: usize) -> MinerParams {
        MinerParams { min_docs, min_len }
    }

    fn decoded(corpus: &Corpus, phrases: &[Phrase]) -> Vec<String> {
        let mut out: Vec<String> = phrases
            .iter()
            .map(|p| p.decode(&corpus.dictionary))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn closed_filter_suppresses_prefixes_with_equal_support_extensions() {
        let corpus = corpus_of(&["the quick brown fox", "the quick brown dog"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 1),
            PatternFilter::Closed,
            &CancelFlag::new(),
        );
        // "the" and "the quick" are absorbed by "the quick brown". The
        // closure test is the local single-token rule, so the
        // right-unextendable suffixes "quick brown" and "brown" survive it.
        assert_eq!(
            decoded(&corpus, &phrases),
            vec!["brown", "quick brown", "the quick brown"]
        );
        for phrase in &phrases {
            assert_eq!(phrase.support, 2);
        }
    }

    #[test]
    fn all_filter_emits_every_frequent_prefix() {
        let corpus = corpus_of(&["the quick brown fox", "the quick brown dog"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 1),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        let mut expected = vec![
            "the",
            "the quick",
            "the quick brown",
            "quick",
            "quick brown",
            "brown",
        ];
        expected.sort_unstable();
        assert_eq!(decoded(&corpus, &phrases), expected);
    }

    #[test]
    fn maximal_filter_suppresses_extendable_patterns() {
        let corpus = corpus_of(&["the quick brown fox", "the quick brown dog"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 1),
            PatternFilter::Maximal,
            &CancelFlag::new(),
        );
        // no pattern with a frequent right-extension survives; suffixes of
        // the longest shared run have none and are kept
        assert_eq!(
            decoded(&corpus, &phrases),
            vec!["brown", "quick brown", "the quick brown"]
        );
    }

    #[test]
    fn repeated_token_runs_emit_their_frequent_tails() {
        let corpus = corpus_of(&["a a a", "a a a", "a a a", "a a a", "a a a"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 2),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        assert_eq!(decoded(&corpus, &phrases), vec!["a a", "a a a"]);
        for phrase in &phrases {
            assert_eq!(phrase.support, 5);
        }
    }

    #[test]
    fn min_length_suppresses_short_prefixes() {
        let corpus = corpus_of(&["x y z", "x y w"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 2),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        assert_eq!(decoded(&corpus, &phrases), vec!["x y"]);
    }

    #[test]
    fn occurrences_point_at_pattern_starts() {
        let corpus = corpus_of(&["pad the pair end", "the pair starts here"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 2),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        let pair = phrases
            .iter()
            .find(|p| p.decode(&corpus.dictionary) == "the pair")
            .expect("shared bigram mined");
        for o in &pair.occurrences {
            let doc = &corpus.docs[o.doc_id as usize];
            let start = o.pos as usize;
            assert_eq!(&doc[start..start + 2], &pair.tokens[..]);
        }
    }

    #[test]
    fn empty_documents_do_not_count_toward_initial_support() {
        let corpus = corpus_of(&["", "solo words here", "solo words again"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 1),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        let solo = phrases
            .iter()
            .find(|p| p.decode(&corpus.dictionary) == "solo words")
            .expect("shared bigram mined");
        assert_eq!(solo.support, 2);
    }

    #[test]
    fn infrequent_tokens_never_appear_in_patterns() {
        let corpus = corpus_of(&["common rare1 common", "common rare2 common"]);
        let phrases = mine_prefixspan(
            &corpus,
            &params(2, 1),
            PatternFilter::All,
            &CancelFlag::new(),
        );
        for phrase in &phrases {
            assert_eq!(phrase.decode(&corpus.dictionary), "common");
        }
    }

    #[test]
    fn cancelled_flag_stops_immediately() {
        let corpus = corpus_of(&["a b c", "a b c"]);
        let cancel = CancelFlag::new();
        cancel.cancel();
        let phrases = mine_prefixspan(&corpus, &params(1, 1), PatternFilter::All, &cancel);
        assert!(phrases.is_empty());
    }
}
