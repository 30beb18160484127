//! Condition→action rules for the endometrial clinical module.

use oncoscore_common::RiskTier;
use oncoscore_schema::RawInput;

use crate::{dedup_keep_first, ClinicalThresholds, Recommendation};

/// Everything a rule may read: the raw pre-normalization input, the
/// computed tier, and the named clinical thresholds.
pub struct RuleContext<'a> {
    pub raw: &'a RawInput,
    pub tier: RiskTier,
    pub thresholds: &'a ClinicalThresholds,
}

/// One declarative rule: a predicate over the context that yields its
/// action text when the condition holds.
struct Rule {
    name: &'static str,
    apply: fn(&RuleContext) -> Option<String>,
}

/// Ordered rule table: specific condition rules first, the tier-general
/// fallback last. Evaluated in one pass; order is part of the contract.
const RULES: &[Rule] = &[
    Rule {
        name: "endometrial-thickness-postmenopausal",
        apply: |ctx| {
            let thick = ctx.raw.number("ThickEndometrium")?;
            (thick > ctx.thresholds.postmenopausal_endometrium_mm
                && ctx.raw.text("MenopauseStatus") == Some("Postmenopausal"))
            .then(|| {
                format!(
                    "Elevated endometrial thickness ({thick} mm) exceeds the 4-5 mm \
                     postmenopausal threshold — consider endometrial biopsy."
                )
            })
        },
    },
    Rule {
        name: "endometrial-thickness-premenopausal",
        apply: |ctx| {
            let thick = ctx.raw.number("ThickEndometrium")?;
            (thick > ctx.thresholds.premenopausal_endometrium_mm
                && ctx.raw.text("MenopauseStatus") == Some("Premenopausal"))
            .then(|| {
                format!(
                    "Endometrial thickness ({thick} mm) is elevated for a premenopausal \
                     patient — consider ultrasound follow-up."
                )
            })
        },
    },
    Rule {
        name: "ca125-above-reference",
        apply: |ctx| {
            let ca125 = ctx.raw.number("CA125_Level")?;
            (ca125 > ctx.thresholds.ca125_upper_limit).then(|| {
                format!(
                    "CA-125 level ({ca125} U/mL) is above the reference range (0–35 U/mL) \
                     — further evaluation warranted."
                )
            })
        },
    },
    Rule {
        name: "postmenopausal-bleeding",
        apply: |ctx| {
            (ctx.raw.is_yes("AbnormalBleeding")
                && ctx.raw.text("MenopauseStatus") == Some("Postmenopausal"))
            .then(|| {
                "Abnormal uterine bleeding in a postmenopausal patient is a clinical \
                 red flag — gynaecologic workup recommended."
                    .to_string()
            })
        },
    },
    Rule {
        name: "bleeding-over-evaluation-age",
        apply: |ctx| {
            let age = ctx.raw.number("Age")?;
            (ctx.raw.is_yes("AbnormalBleeding") && age > ctx.thresholds.bleeding_evaluation_age)
                .then(|| {
                    "Abnormal bleeding after age 45 — endometrial evaluation recommended."
                        .to_string()
                })
        },
    },
    Rule {
        name: "comorbid-diabetes",
        apply: |ctx| {
            ctx.raw.is_yes("Diabetes").then(|| {
                "Patient has comorbid diabetes — monitor for metabolic syndrome as an \
                 independent risk factor."
                    .to_string()
            })
        },
    },
    Rule {
        name: "estrogen-with-elevated-risk",
        apply: |ctx| {
            (ctx.raw.is_yes("EstrogenTherapy") && ctx.tier >= RiskTier::Intermediate).then(|| {
                "Unopposed estrogen therapy in an elevated-risk patient — review HRT \
                 regimen with provider."
                    .to_string()
            })
        },
    },
    Rule {
        name: "obesity",
        apply: |ctx| {
            let bmi = ctx.raw.number("BMI")?;
            (bmi > ctx.thresholds.obesity_bmi).then(|| {
                format!(
                    "Obesity (BMI {bmi}) is an established risk factor for uterine cancer \
                     — weight management counselling recommended."
                )
            })
        },
    },
    Rule {
        name: "family-history-high-risk",
        apply: |ctx| {
            (ctx.raw.is_yes("FamilyHistoryCancer") && ctx.tier == RiskTier::High).then(|| {
                "Family history of cancer combined with high estimated risk — consider \
                 genetic counselling (Lynch syndrome screening)."
                    .to_string()
            })
        },
    },
    Rule {
        name: "tier-fallback",
        apply: |ctx| {
            Some(
                match ctx.tier {
                    RiskTier::High => {
                        "High estimated risk — strongly recommend gynaecologic oncology referral."
                    }
                    RiskTier::Intermediate => {
                        "Intermediate estimated risk — recommend clinical follow-up with gynaecologist."
                    }
                    RiskTier::Low => "Low estimated risk — routine screening per clinical guidelines.",
                }
                .to_string(),
            )
        },
    },
];

fn summary(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "Patient is at low estimated risk for uterine cancer.",
        RiskTier::Intermediate => {
            "Patient has elevated risk factors that warrant gynaecologic follow-up."
        }
        RiskTier::High => {
            "Patient is at high estimated risk for uterine cancer. Specialist review recommended."
        }
    }
}

/// Evaluate the rule table against one scored request.
pub fn recommend(
    raw: &RawInput,
    tier: RiskTier,
    thresholds: &ClinicalThresholds,
) -> Recommendation {
    let ctx = RuleContext {
        raw,
        tier,
        thresholds,
    };
    let actions = RULES.iter().filter_map(|rule| {
        let action = (rule.apply)(&ctx);
        if action.is_some() {
            tracing::debug!(rule = rule.name, "recommendation rule matched");
        }
        action
    });
    Recommendation {
        summary: summary(tier).to_string(),
        actions: dedup_keep_first(actions.collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncoscore_schema::RawValue;

    fn high_risk_input() -> RawInput {
        RawInput::from([
            ("Age", RawValue::Number(62.0)),
            ("BMI", RawValue::Number(31.5)),
            ("MenopauseStatus", RawValue::Text("Postmenopausal".into())),
            ("AbnormalBleeding", RawValue::Text("Yes".into())),
            ("ThickEndometrium", RawValue::Number(18.5)),
            ("CA125_Level", RawValue::Number(65.3)),
            ("Diabetes", RawValue::Text("Yes".into())),
            ("EstrogenTherapy", RawValue::Text("No".into())),
            ("FamilyHistoryCancer", RawValue::Text("No".into())),
        ])
    }

    #[test]
    fn test_threshold_rules_fire_for_high_risk_case() {
        let rec = recommend(
            &high_risk_input(),
            RiskTier::High,
            &ClinicalThresholds::default(),
        );
        assert!(rec
            .actions
            .iter()
            .any(|a| a.contains("endometrial biopsy") && a.contains("18.5 mm")));
        assert!(rec.actions.iter().any(|a| a.contains("CA-125") && a.contains("65.3")));
        assert!(rec.actions.iter().any(|a| a.contains("oncology referral")));
    }

    #[test]
    fn test_no_duplicate_actions() {
        let rec = recommend(
            &high_risk_input(),
            RiskTier::High,
            &ClinicalThresholds::default(),
        );
        let mut unique = rec.actions.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), rec.actions.len());
    }

    #[test]
    fn test_specific_rules_precede_tier_fallback() {
        let rec = recommend(
            &high_risk_input(),
            RiskTier::High,
            &ClinicalThresholds::default(),
        );
        let fallback_pos = rec
            .actions
            .iter()
            .position(|a| a.contains("oncology referral"))
            .unwrap();
        assert_eq!(fallback_pos, rec.actions.len() - 1);
    }

    #[test]
    fn test_exactly_one_tier_fallback() {
        for tier in [RiskTier::Low, RiskTier::Intermediate, RiskTier::High] {
            let rec = recommend(&RawInput::default(), tier, &ClinicalThresholds::default());
            assert_eq!(rec.actions.len(), 1, "only the fallback should fire on empty input");
        }
    }

    #[test]
    fn test_premenopausal_thickness_rule() {
        let raw = RawInput::from([
            ("MenopauseStatus", RawValue::Text("Premenopausal".into())),
            ("ThickEndometrium", RawValue::Number(14.0)),
        ]);
        let rec = recommend(&raw, RiskTier::Low, &ClinicalThresholds::default());
        assert!(rec.actions.iter().any(|a| a.contains("ultrasound follow-up")));
        // the postmenopausal biopsy rule must not fire
        assert!(!rec.actions.iter().any(|a| a.contains("biopsy")));
    }

    #[test]
    fn test_estrogen_rule_requires_elevated_tier() {
        let raw = RawInput::from([("EstrogenTherapy", RawValue::Text("Yes".into()))]);
        let low = recommend(&raw, RiskTier::Low, &ClinicalThresholds::default());
        assert!(!low.actions.iter().any(|a| a.contains("HRT")));
        let high = recommend(&raw, RiskTier::High, &ClinicalThresholds::default());
        assert!(high.actions.iter().any(|a| a.contains("HRT")));
    }

    #[test]
    fn test_summary_keyed_by_tier() {
        let raw = RawInput::default();
        let t = ClinicalThresholds::default();
        assert_ne!(
            recommend(&raw, RiskTier::Low, &t).summary,
            recommend(&raw, RiskTier::High, &t).summary
        );
    }
}
