//! Keyword blob encoding.
//!
//! Keywords are stored as a single comma-delimited column so the search flags
//! can run plain substring checks against it.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

const DELIMITER: char = ',';

/// Upper-case, trim and de-duplicate keywords, keeping first-seen order.
pub(crate) fn normalise<I, S>(keywords: I) -> SmallVec<[String; 4]>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = FxHashSet::default();

    keywords
        .into_iter()
        .map(|keyword| keyword.as_ref().trim().to_uppercase())
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

pub(crate) fn encode(keywords: &[String]) -> String {
    normalise(keywords).join(",")
}

pub(crate) fn decode(blob: &str) -> SmallVec<[String; 4]> {
    normalise(blob.split(DELIMITER))
}
