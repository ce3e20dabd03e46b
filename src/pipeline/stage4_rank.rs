use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::FvError;
use crate::model::athlete::AthleteKey;
use crate::model::profile::{Metric, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub rank: usize,
    pub total: usize,
}

impl Rank {
    /// 1.0 for the top athlete, 1/total for the last.
    pub fn percentile(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        1.0 - (self.rank as f64 - 1.0) / self.total as f64
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.rank, self.total)
    }
}

/// Profiles with a 1-based rank per metric. Row order is the fitter's order.
#[derive(Debug, Clone)]
pub struct RankedTable {
    profiles: Vec<Profile>,
    order: HashMap<Metric, Vec<usize>>,
    ranks: HashMap<Metric, Vec<usize>>,
    index: HashMap<AthleteKey, usize>,
}

pub fn run_stage4(profiles: Vec<Profile>) -> RankedTable {
    let ranked = RankedTable::new(profiles);
    if let Some(top) = ranked.ordered(Metric::Pmax).first() {
        tracing::info!(
            "ranked {} athletes; top Pmax: {} ({:.1} W)",
            ranked.len(),
            top.athlete,
            top.pmax_w
        );
    }
    ranked
}

impl RankedTable {
    pub fn new(profiles: Vec<Profile>) -> Self {
        let mut order = HashMap::new();
        let mut ranks = HashMap::new();
        for metric in Metric::all() {
            let sorted = descending_order(&profiles, metric);
            let mut metric_ranks = vec![0usize; profiles.len()];
            for (pos, &row) in sorted.iter().enumerate() {
                metric_ranks[row] = pos + 1;
            }
            order.insert(metric, sorted);
            ranks.insert(metric, metric_ranks);
        }

        let mut index = HashMap::with_capacity(profiles.len());
        for (row, profile) in profiles.iter().enumerate() {
            index.entry(profile.athlete.clone()).or_insert(row);
        }

        Self {
            profiles,
            order,
            ranks,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, athlete: &AthleteKey) -> Option<&Profile> {
        self.index.get(athlete).map(|&row| &self.profiles[row])
    }

    /// Profiles sorted by the metric, best first.
    pub fn ordered(&self, metric: Metric) -> Vec<&Profile> {
        self.order
            .get(&metric)
            .map(|rows| rows.iter().map(|&row| &self.profiles[row]).collect())
            .unwrap_or_default()
    }

    pub fn rank(&self, athlete: &AthleteKey, metric: Metric) -> Result<Rank, FvError> {
        let rank = self
            .index
            .get(athlete)
            .and_then(|&row| self.ranks.get(&metric).map(|r| r[row]))
            .ok_or_else(|| FvError::NotRanked {
                athlete: athlete.clone(),
                metric,
            })?;
        Ok(Rank {
            rank,
            total: self.profiles.len(),
        })
    }

    pub fn percentile(&self, athlete: &AthleteKey, metric: Metric) -> Result<f64, FvError> {
        self.rank(athlete, metric).map(Rank::percentile)
    }
}

/// Stable sort, so equal values keep input order.
fn descending_order(profiles: &[Profile], metric: Metric) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..profiles.len()).collect();
    rows.sort_by(|&a, &b| {
        metric
            .value(&profiles[b])
            .partial_cmp(&metric.value(&profiles[a]))
            .unwrap_or(Ordering::Equal)
    });
    rows
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_rank.rs"]
mod tests;
