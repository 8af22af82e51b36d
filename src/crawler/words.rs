//! Word count merging and ranking

use dashmap::DashMap;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Adds one page's counts into the shared tally
///
/// Each word is added under its shard lock, so concurrent merges from
/// different pages commute. Totals saturate at `u64::MAX`.
pub fn merge(tally: &DashMap<String, u64>, page: &HashMap<String, u64>) {
    for (word, count) in page {
        let mut total = tally.entry(word.clone()).or_insert(0);
        *total = total.saturating_add(*count);
    }
}

/// Ranks words and keeps the best `limit`
///
/// Order: higher count first, then longer word, then alphabetical.
pub fn top_words(counts: &HashMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();
    ranked.sort_by(|(a, a_count), (b, b_count)| rank(a, *a_count, b, *b_count));
    ranked.truncate(limit);
    ranked
}

fn rank(a: &str, a_count: u64, b: &str, b_count: u64) -> Ordering {
    b_count
        .cmp(&a_count)
        .then_with(|| b.chars().count().cmp(&a.chars().count()))
        .then_with(|| a.cmp(b))
}
