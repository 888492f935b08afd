//! Greedy max-phrase mining.
//!
//! Seeds are all fixed-length n-grams with support at or above the
//! threshold, processed in support-descending order. Each seed is extended
//! one token at a time by the contiguous successor covering the most
//! distinct documents; the positions of the final phrase are then marked so
//! later candidates that start only on consumed positions are skipped.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::cancel::CancelFlag;
use crate::corpus::Corpus;
use crate::dictionary::TokenId;
use crate::mine::{MinerParams, Occurrence, Phrase, distinct_docs};

/// Mine phrases by seed-and-extend. Results keep insertion order, which is
/// roughly support-descending.
#[tracing::instrument(skip_all, fields(min_docs = params.min_docs, seed_len = params.min_len))]
pub fn mine_greedy(corpus: &Corpus, params: &MinerParams, cancel: &CancelFlag) -> Vec<Phrase> {
    let mut candidates = collect_seeds(corpus, params);
    debug!(candidates = candidates.len(), "seeds gathered");

    // Support descending; ties by token sequence so runs are reproducible.
    candidates.sort_by(|a, b| {
        b.support
            .cmp(&a.support)
            .then_with(|| a.tokens.cmp(&b.tokens))
    });

    let mut processed: Vec<Vec<bool>> = corpus.docs.iter().map(|d| vec![false; d.len()]).collect();
    let mut phrases = Vec::new();

    for mut cand in candidates {
        if cancel.is_cancelled() {
            info!(mined = phrases.len(), "mining interrupted");
            break;
        }
        // fully consumed by an earlier, better-supported phrase
        if cand
            .occurrences
            .iter()
            .all(|o| processed[o.doc_id as usize][o.pos as usize])
        {
            continue;
        }

        extend(corpus, params, &mut cand);

        for o in &cand.occurrences {
            let doc_len = corpus.docs[o.doc_id as usize].len();
            for i in 0..cand.tokens.len() {
                let p = o.pos as usize + i;
                if p < doc_len {
                    processed[o.doc_id as usize][p] = true;
                }
            }
        }
        phrases.push(cand);
    }
    info!(phrases = phrases.len(), "greedy mining done");
    phrases
}

/// Gather every n-gram of the seed length and keep those whose
/// distinct-document support meets the threshold.
fn collect_seeds(corpus: &Corpus, params: &MinerParams) -> Vec<Phrase> {
    let n = params.min_len;
    let mut seeds: HashMap<Vec<TokenId>, Vec<Occurrence>> = HashMap::new();
    for (d, doc) in corpus.docs.iter().enumerate() {
        if doc.len() < n {
            continue;
        }
        for p in 0..=doc.len() - n {
            seeds.entry(doc[p..p + n].to_vec()).or_default().push(Occurrence {
                doc_id: d as u32,
                pos: p as u32,
            });
        }
    }

    seeds
        .into_iter()
        .filter_map(|(tokens, occurrences)| {
            let support = distinct_docs(&occurrences);
            (support >= params.min_docs).then_some(Phrase {
                tokens,
                support,
                occurrences,
            })
        })
        .collect()
}

/// Repeatedly append the successor token with the highest distinct-document
/// count, as long as one meets the support threshold. Ties go to the
/// smallest token id.
fn extend(corpus: &Corpus, params: &MinerParams, cand: &mut Phrase) {
    loop {
        let k = cand.tokens.len();
        let mut buckets: HashMap<TokenId, Vec<Occurrence>> = HashMap::new();
        for &o in &cand.occurrences {
            let doc = &corpus.docs[o.doc_id as usize];
            let next = o.pos as usize + k;
            if next < doc.len() {
                buckets.entry(doc[next]).or_default().push(o);
            }
        }

        let mut best: Option<(TokenId, usize)> = None;
        for (&token, occurrences) in &buckets {
            let support = distinct_docs(occurrences);
            if support < params.min_docs {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_token, best_support)) => {
                    support > best_support || (support == best_support && token < best_token)
                }
            };
            if better {
                best = Some((token, support));
            }
        }

        let Some((token, support)) = best else {
            break;
        };
        let Some(occurrences) = buckets.remove(&token) else {
            break;
        };
        cand.tokens.push(token);
        cand.occurrences = occurrences;
        cand.support = support;
    }
}
