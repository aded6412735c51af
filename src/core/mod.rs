pub mod identifiers;
pub mod matrix;

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

pub use identifiers::IdentifierMap;
pub use matrix::LabeledMatrix;

use crate::scoring;

/// A developer as humans see and classify them. The security flag is edited
/// after mining, not derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevInfo {
    pub email: String,
    #[serde(rename = "isSecurity")]
    pub is_security: bool,
}

impl DevInfo {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_security: false,
        }
    }

    pub fn security(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_security: true,
        }
    }
}

/// Immutable scoring result for one project version.
///
/// Created once at import time with `stc_value` populated and no MC-STC.
/// Roster edits go through [`ScoreSnapshot::with_roster`], which derives a new
/// snapshot instead of mutating this one, so readers always observe a roster
/// and its MC-STC together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub project: String,
    pub timestamp: DateTime<Utc>,
    pub cr_matrix: LabeledMatrix,
    pub ca_matrix: LabeledMatrix,
    pub stc_value: f64,
    pub mc_stc_value: Option<f64>,
    pub dev_roster: Vector<DevInfo>,
}

impl ScoreSnapshot {
    /// Re-classify developers and regenerate MC-STC from the stored matrices.
    ///
    /// CR, CA and the plain STC value are untouched; no re-mining happens.
    pub fn with_roster(self, dev_roster: impl IntoIterator<Item = DevInfo>) -> ScoreSnapshot {
        let dev_roster: Vector<DevInfo> = dev_roster.into_iter().collect();
        let mc_stc_value = scoring::mc_stc(&self.cr_matrix, &self.ca_matrix, dev_roster.iter());
        ScoreSnapshot {
            mc_stc_value: Some(mc_stc_value),
            dev_roster,
            ..self
        }
    }

    /// Emails of the security-flagged subset of the roster.
    pub fn security_dev_emails(&self) -> Vec<String> {
        self.dev_roster
            .iter()
            .filter(|dev| dev.is_security)
            .map(|dev| dev.email.clone())
            .collect()
    }
}
