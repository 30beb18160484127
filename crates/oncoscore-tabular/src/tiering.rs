//! Probability → discrete risk tier mapping.

use serde::{Deserialize, Serialize};

use oncoscore_common::{PredictError, Result, RiskTier};

/// Ordered tier cutoffs defining three half-open intervals:
/// [0, low_upper) → Low, [low_upper, high_lower) → Intermediate,
/// [high_lower, 1] → High. A probability exactly equal to a cutoff belongs
/// to the higher tier. Two-tier variants set `low_upper == high_lower`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCutoffs {
    pub low_upper: f64,
    pub high_lower: f64,
}

impl TierCutoffs {
    pub fn new(low_upper: f64, high_lower: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&low_upper)
            || !(0.0..=1.0).contains(&high_lower)
            || low_upper > high_lower
        {
            return Err(PredictError::Schema(format!(
                "invalid tier cutoffs: low_upper={low_upper}, high_lower={high_lower}"
            )));
        }
        Ok(Self {
            low_upper,
            high_lower,
        })
    }

    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability >= self.high_lower {
            RiskTier::High
        } else if probability >= self.low_upper {
            RiskTier::Intermediate
        } else {
            RiskTier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_assignment() {
        let cutoffs = TierCutoffs::new(0.3, 0.7).unwrap();
        assert_eq!(cutoffs.classify(0.0), RiskTier::Low);
        assert_eq!(cutoffs.classify(0.29), RiskTier::Low);
        assert_eq!(cutoffs.classify(0.5), RiskTier::Intermediate);
        assert_eq!(cutoffs.classify(0.9), RiskTier::High);
        assert_eq!(cutoffs.classify(1.0), RiskTier::High);
    }

    #[test]
    fn test_cutoff_belongs_to_higher_tier() {
        let cutoffs = TierCutoffs::new(0.56, 0.65).unwrap();
        assert_eq!(cutoffs.classify(0.56), RiskTier::Intermediate);
        assert_eq!(cutoffs.classify(0.65), RiskTier::High);
    }

    #[test]
    fn test_monotone_in_probability() {
        let cutoffs = TierCutoffs::new(0.3, 0.7).unwrap();
        let mut last = RiskTier::Low;
        for i in 0..=100 {
            let tier = cutoffs.classify(i as f64 / 100.0);
            assert!(tier >= last);
            last = tier;
        }
    }

    #[test]
    fn test_degenerate_two_tier_variant() {
        let cutoffs = TierCutoffs::new(0.5, 0.5).unwrap();
        assert_eq!(cutoffs.classify(0.49), RiskTier::Low);
        // the shared cutoff resolves straight to High; no Intermediate band
        assert_eq!(cutoffs.classify(0.5), RiskTier::High);
    }

    #[test]
    fn test_rejects_inverted_cutoffs() {
        assert!(TierCutoffs::new(0.7, 0.3).is_err());
        assert!(TierCutoffs::new(-0.1, 0.5).is_err());
        assert!(TierCutoffs::new(0.2, 1.5).is_err());
    }
}
