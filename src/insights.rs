use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::aggregate;
use crate::models::{ActivityBucket, Commit, Granularity, Repository};

#[derive(Debug, Serialize)]
pub struct ActivityReport {
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    pub total_commits: usize,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
    pub series: Vec<ActivitySeries>,
}

#[derive(Debug, Serialize)]
pub struct ActivitySeries {
    pub granularity: Granularity,
    pub buckets: Vec<ActivityBucket>,
}

impl ActivityReport {
    pub fn build(repository: &Repository, commits: &[Commit], granularities: &[Granularity]) -> Self {
        let series = granularities
            .iter()
            .map(|&granularity| ActivitySeries {
                granularity,
                buckets: aggregate(commits, granularity),
            })
            .collect();

        Self {
            repository: repository.full_name(),
            collected_at: Utc::now(),
            total_commits: commits.len(),
            first_commit: commits.iter().map(|c| c.timestamp).min(),
            last_commit: commits.iter().map(|c| c.timestamp).max(),
            series,
        }
    }
}
