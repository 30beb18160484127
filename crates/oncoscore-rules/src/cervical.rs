//! Tier-keyed clinical decision support guidance for the cervical module.

use oncoscore_common::RiskTier;

use crate::Recommendation;

/// Static guidance table keyed by tier. The cervical module has no
/// per-measurement condition rules; guidance is entirely tier-driven.
pub fn guidance(tier: RiskTier) -> Recommendation {
    let (summary, actions): (&str, &[&str]) = match tier {
        RiskTier::Low => (
            "Patient is at low risk for cervical cancer.",
            &[
                "Routine cervical screening as per national guidelines (every 3–5 years).",
                "Counsel on STI prevention and safe sexual practices.",
            ],
        ),
        RiskTier::Intermediate => (
            "Patient has elevated risk factors that warrant closer monitoring.",
            &[
                "Schedule cervical screening within the next 12 months.",
                "Assess and address modifiable risk factors (smoking cessation, STI treatment).",
                "Consider HPV co-testing at next visit.",
            ],
        ),
        RiskTier::High => (
            "Patient has multiple significant risk factors. Urgent clinical review recommended.",
            &[
                "Refer for colposcopy evaluation at the earliest opportunity.",
                "Do not defer based on last normal screening result.",
                "Document and address all identified risk factors.",
                "Ensure patient is counselled on the importance of follow-up.",
            ],
        ),
    };
    Recommendation {
        summary: summary.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
    }
}
