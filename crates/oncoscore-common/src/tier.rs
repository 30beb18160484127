//! Ordered risk tiers shared by every tabular module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk tier derived from a scalar probability.
///
/// The ordering is load-bearing: tier assignment must be monotonically
/// non-decreasing in the underlying probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Intermediate,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Intermediate => "Intermediate",
            RiskTier::High => "High",
        }
    }

    /// Display color used by downstream clients for tier badges.
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#27ae60",
            RiskTier::Intermediate => "#f39c12",
            RiskTier::High => "#e74c3c",
        }
    }

    /// Label rendering used by the cervical clinical module
    /// ("Low Risk" / "Moderate Risk" / "High Risk").
    pub fn risk_label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Intermediate => "Moderate Risk",
            RiskTier::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
