//! Result CSV emission.
//!
//! One row per phrase: the decoded phrase and the example sources are always
//! double-quoted (embedded quotes doubled), support and length are bare.
//! Lines end with LF.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::corpus::Corpus;
use crate::mine::Phrase;

/// Order phrases by support descending, then length descending.
///
/// Applied to PrefixSpan results; the greedy miner's insertion order is
/// written as-is.
pub fn sort_for_output(phrases: &mut [Phrase]) {
    phrases.sort_by(|a, b| {
        b.support
            .cmp(&a.support)
            .then_with(|| b.tokens.len().cmp(&a.tokens.len()))
    });
}

/// Write the result CSV to `path`.
#[tracing::instrument(skip_all, fields(path = %path.display(), phrases = phrases.len()))]
pub fn write_csv(path: &Path, phrases: &[Phrase], corpus: &Corpus) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv_to(&mut out, phrases, corpus)?;
    out.flush()
}

/// Write the result CSV to any writer.
pub fn write_csv_to<W: Write>(out: &mut W, phrases: &[Phrase], corpus: &Corpus) -> io::Result<()> {
    out.write_all(b"phrase,freq,length,example_files\n")?;
    for phrase in phrases {
        writeln!(
            out,
            "\"{}\",{},{},\"{}\"",
            phrase.decode(&corpus.dictionary),
            phrase.support,
            phrase.tokens.len(),
            example_files(phrase, corpus),
        )?;
    }
    Ok(())
}

/// Up to two distinct example sources joined by `|`, with a literal `...`
/// appended when more exist.
fn example_files(phrase: &Phrase, corpus: &Corpus) -> String {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for o in &phrase.occurrences {
        if seen.insert(o.doc_id) {
            distinct.push(o.doc_id);
        }
    }
    let mut field = distinct
        .iter()
        .take(2)
        .map(|&d| csv_escape(&corpus.sources[d as usize]))
        .collect::<Vec<_>>()
        .join("|");
    if distinct.len() > 2 {
        field.push_str("...");
    }
    field
}

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}
