//! Risk banding of congruence scores and cross-project aggregation.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::ScoreSnapshot;

/// Scores below this are high risk.
pub const HIGH_RISK_CEILING: f64 = 0.25;
/// Scores above this are low risk.
pub const LOW_RISK_FLOOR: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Mid,
    High,
    /// A score outside [0, 1], which only bad stored data can produce.
    Undefined,
    /// No snapshot exists for the project at all.
    NoHistory,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskBand::Low => "low",
            RiskBand::Mid => "mid",
            RiskBand::High => "high",
            RiskBand::Undefined => "undefined",
            RiskBand::NoHistory => "no_history",
        };
        write!(f, "{name}")
    }
}

/// Map a congruence score to its risk band.
///
/// The 0.25 and 0.75 boundaries belong to `Mid`; exactly 1 is `Low` and
/// exactly 0 is `High`. Total over every float including NaN.
pub fn classify(score: Option<f64>) -> RiskBand {
    match score {
        None => RiskBand::NoHistory,
        Some(s) if s > LOW_RISK_FLOOR && s <= 1.0 => RiskBand::Low,
        Some(s) if s >= HIGH_RISK_CEILING && s <= LOW_RISK_FLOOR => RiskBand::Mid,
        Some(s) if s >= 0.0 && s < HIGH_RISK_CEILING => RiskBand::High,
        Some(_) => RiskBand::Undefined,
    }
}

/// The score a snapshot is judged by: MC-STC when a roster has been applied,
/// the plain STC otherwise.
pub fn effective_score(snapshot: &ScoreSnapshot) -> f64 {
    snapshot.mc_stc_value.unwrap_or(snapshot.stc_value)
}

pub fn classify_snapshot(snapshot: &ScoreSnapshot) -> RiskBand {
    classify(Some(effective_score(snapshot)))
}

/// Band counts across many project snapshots.
///
/// `total_risk_count` counts every score seen, including ones that landed in
/// no bucket (`Undefined` or `NoHistory`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskOverview {
    pub high_risk_count: usize,
    pub mid_risk_count: usize,
    pub low_risk_count: usize,
    pub total_risk_count: usize,
}

impl RiskOverview {
    pub fn from_scores(scores: &[Option<f64>]) -> Self {
        scores
            .par_iter()
            .map(|&score| Self::tally(classify(score)))
            .reduce(Self::default, Self::merge)
    }

    /// Overview of independent project snapshots; scored in parallel since
    /// the snapshots share nothing.
    pub fn from_snapshots(snapshots: &[ScoreSnapshot]) -> Self {
        snapshots
            .par_iter()
            .map(|snapshot| Self::tally(classify_snapshot(snapshot)))
            .reduce(Self::default, Self::merge)
    }

    fn tally(band: RiskBand) -> Self {
        Self {
            high_risk_count: usize::from(band == RiskBand::High),
            mid_risk_count: usize::from(band == RiskBand::Mid),
            low_risk_count: usize::from(band == RiskBand::Low),
            total_risk_count: 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            high_risk_count: self.high_risk_count + other.high_risk_count,
            mid_risk_count: self.mid_risk_count + other.mid_risk_count,
            low_risk_count: self.low_risk_count + other.low_risk_count,
            total_risk_count: self.total_risk_count + other.total_risk_count,
        }
    }
}
