//! Per-repository run statistics

use std::time::Duration;

use serde::Serialize;

/// Counters for one repository argument
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoRunStats {
    /// Repository name
    pub repo: String,
    /// Enabled recipes in the repository
    pub total: usize,
    /// Recipes attempted this pass
    pub attempted: usize,
    /// Recipes built successfully this pass
    pub built: usize,
    /// Obsolete artifacts purged (or that would be, in a dry run)
    pub deleted: usize,
    /// Wall time spent on the repository
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RepoRunStats {
    /// Recipes that did not need building plus those built this pass
    pub fn total_built(&self) -> usize {
        (self.total + self.built).saturating_sub(self.attempted)
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

#[derive(Serialize)]
struct StatsRow<'a> {
    #[serde(flatten)]
    stats: &'a RepoRunStats,
    total_built: usize,
}

/// Collects [`RepoRunStats`] in processing order
#[derive(Debug, Default)]
pub struct StatsCollector {
    repos: Vec<RepoRunStats>,
}

impl StatsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished repository
    pub fn record(&mut self, stats: RepoRunStats) {
        self.repos.push(stats);
    }

    /// Recorded statistics
    pub fn repos(&self) -> &[RepoRunStats] {
        &self.repos
    }

    /// Plain-text summary, one block per repository
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for s in &self.repos {
            let repo = &s.repo;
            out.push_str(&format!("{repo} built:\t{}\n", s.built));
            out.push_str(&format!("{repo} tried:\t{}\n", s.attempted));
            out.push_str(&format!("{repo} deleted:\t{}\n", s.deleted));
            out.push_str(&format!("{repo} total built:\t{}\n", s.total_built()));
            out.push_str(&format!("{repo} total:\t{}\n", s.total));
            out.push_str(&format!(
                "{repo} time:\t{:.1}s\n",
                s.elapsed.as_secs_f64()
            ));
        }
        out
    }

    /// JSON summary: an array with one object per repository
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        let rows: Vec<StatsRow<'_>> = self
            .repos
            .iter()
            .map(|stats| StatsRow {
                stats,
                total_built: stats.total_built(),
            })
            .collect();
        serde_json::to_string_pretty(&rows)
    }
}
