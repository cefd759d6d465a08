//! Daily metrics snapshots and the end-of-run summary.
//!
//! The simulator appends one `DailyMetrics` per tick and never rewrites
//! an appended entry; consumers treat the series as read-only.

use dppn_logic::indicators;
use serde::{Deserialize, Serialize};

/// Balance threshold below which a citizen counts as poor.
pub const POVERTY_LINE: f64 = 50.0;

/// One day's aggregate snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub day: u32,
    /// Per-citizen balances in roster order.
    pub balances: Vec<f64>,
    pub gini: f64,
    pub inflation: f64,
    pub avg_happiness: f64,
    pub avg_education: f64,
}

/// Read-only aggregates over a finished (or in-progress) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub days: usize,
    pub average_balance: f64,
    pub final_gini: f64,
    pub average_happiness: f64,
    pub average_education: f64,
    /// Percentage of citizens below `POVERTY_LINE`.
    pub poverty_rate: f64,
    /// Relative Gini movement since day 0, in percent. `None` when the
    /// starting Gini was 0.
    pub gini_change_pct: Option<f64>,
}

impl RunSummary {
    /// Summarize a metrics series; `None` for an empty series.
    pub fn from_metrics(metrics: &[DailyMetrics]) -> Option<Self> {
        let first = metrics.first()?;
        let last = metrics.last()?;

        let gini_change_pct = if first.gini != 0.0 {
            Some((last.gini - first.gini) / first.gini * 100.0)
        } else {
            None
        };

        Some(Self {
            days: metrics.len(),
            average_balance: indicators::mean(&last.balances),
            final_gini: last.gini,
            average_happiness: last.avg_happiness,
            average_education: last.avg_education,
            poverty_rate: indicators::poverty_rate(&last.balances, POVERTY_LINE),
            gini_change_pct,
        })
    }
}
