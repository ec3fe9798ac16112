//! Collapse 3-hour forecast samples into the hourly strip and per-day summaries.
//!
//! Days are keyed by the date part of the API's `dt_txt`, which is UTC. A day
//! here is therefore a UTC day, not the viewer's local day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Samples kept for the hourly view.
pub const HOURLY_LIMIT: usize = 12;

/// Day summaries kept for the daily view.
pub const DAILY_LIMIT: usize = 6;

/// One 3-hour forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Raw `dt_txt`, e.g. "2024-01-15 12:00:00".
    pub dt_txt: String,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
}

impl ForecastSample {
    /// Date portion of `dt_txt`, used as the grouping key.
    pub fn date_key(&self) -> &str {
        self.dt_txt.split(' ').next().unwrap_or(&self.dt_txt)
    }
}

/// Summary of one calendar day.
///
/// Icon and description come from the temporally middle sample of the day,
/// so they need not match the samples holding `max` or `min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    /// Timestamp of the representative sample.
    pub timestamp: DateTime<Utc>,
    pub max: f64,
    pub min: f64,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastView {
    pub hourly: Vec<ForecastSample>,
    pub daily: Vec<DailySummary>,
}

pub fn aggregate(samples: &[ForecastSample]) -> ForecastView {
    let hourly = samples.iter().take(HOURLY_LIMIT).cloned().collect();

    let daily = group_by_date(samples)
        .into_iter()
        .take(DAILY_LIMIT)
        .filter_map(|(date, group)| summarize(date, &group))
        .collect();

    ForecastView { hourly, daily }
}

/// Group samples by date key, keeping the order in which dates first appear.
fn group_by_date(samples: &[ForecastSample]) -> Vec<(&str, Vec<&ForecastSample>)> {
    let mut groups: Vec<(&str, Vec<&ForecastSample>)> = Vec::new();

    for sample in samples {
        let key = sample.date_key();
        match groups.iter_mut().find(|(date, _)| *date == key) {
            Some((_, group)) => group.push(sample),
            None => groups.push((key, vec![sample])),
        }
    }

    groups
}

fn summarize(date: &str, group: &[&ForecastSample]) -> Option<DailySummary> {
    let mid = group.get(group.len() / 2)?;

    let (min, max) = group.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.temperature), hi.max(s.temperature))
    });

    Some(DailySummary {
        date: date.to_string(),
        timestamp: mid.timestamp,
        max,
        min,
        icon: mid.icon.clone(),
        description: mid.description.clone(),
    })
}
