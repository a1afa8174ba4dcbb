use std::collections::BTreeMap;

use crate::models::{ActivityBucket, Commit, Granularity, Period};

/// Count commits per period, oldest period first.
///
/// Timestamps are truncated in UTC.
pub fn aggregate(commits: &[Commit], granularity: Granularity) -> Vec<ActivityBucket> {
    let mut counts: BTreeMap<Period, usize> = BTreeMap::new();

    for commit in commits {
        *counts
            .entry(Period::of(&commit.timestamp, granularity))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(period, count)| ActivityBucket { period, count })
        .collect()
}
