//! Personalization rules. Everything here is a pure function of in-memory state.

use std::collections::BTreeMap;
use std::fmt;

use super::types::{ConversionStage, Intent, Interaction, InteractionEvent, SectionProgress, UserProfile};

pub const INTEREST_PERCENT_THRESHOLD: f64 = 70.0;
pub const INTEREST_TIME_THRESHOLD_MS: u64 = 60_000;
pub const HIGH_ENGAGEMENT_PERCENT: f64 = 90.0;

/// Section id to interest tag.
const SECTION_INTERESTS: &[(&str, &str)] = &[
    ("domain-analysis", "domain_intelligence"),
    ("value-proposition", "technical_debt"),
    ("roi-calculator", "financial_impact"),
    ("pricing", "financial_impact"),
    ("case-studies", "proven_results"),
    ("testimonials", "social_proof"),
    ("roadmap", "implementation_planning"),
    ("lead-capture", "direct_engagement"),
];

pub const KNOWN_SECTIONS: &[&str] = &[
    "domain-analysis",
    "value-proposition",
    "roi-calculator",
    "pricing",
    "case-studies",
    "testimonials",
    "roadmap",
    "lead-capture",
];

pub fn interest_for_section(section_id: &str) -> Option<&'static str> {
    SECTION_INTERESTS
        .iter()
        .find(|(id, _)| *id == section_id)
        .map(|(_, tag)| *tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendedAction {
    ExploreDomainAnalysis,
    CalculateRoi,
    ScheduleDemo,
    ExploreValueProposition,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::ExploreDomainAnalysis => "explore_domain_analysis",
            RecommendedAction::CalculateRoi => "calculate_roi",
            RecommendedAction::ScheduleDemo => "schedule_demo",
            RecommendedAction::ExploreValueProposition => "explore_value_proposition",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn recommended_action(profile: &UserProfile) -> RecommendedAction {
    match profile.conversion_stage {
        ConversionStage::Awareness => return RecommendedAction::ExploreDomainAnalysis,
        ConversionStage::Consideration => return RecommendedAction::CalculateRoi,
        ConversionStage::Decision => return RecommendedAction::ScheduleDemo,
        ConversionStage::Converted => {}
    }

    let has = |tag: &str| profile.primary_interests.iter().any(|i| i == tag);
    if has("financial_impact") {
        RecommendedAction::CalculateRoi
    } else if has("domain_intelligence") {
        RecommendedAction::ExploreDomainAnalysis
    } else if has("technical_debt") {
        RecommendedAction::ExploreValueProposition
    } else {
        RecommendedAction::ExploreDomainAnalysis
    }
}

pub fn has_dismissed_section(profile: &UserProfile, section_id: &str) -> bool {
    profile.dismissed_sections.iter().any(|s| s == section_id)
}

/// Whether the section has earned an interest tag after `interaction` was applied.
pub fn should_infer_interest(interaction: &Interaction, progress: &SectionProgress) -> bool {
    matches!(interaction, Interaction::Complete)
        || progress.percent_complete > INTEREST_PERCENT_THRESHOLD
        || progress.total_time_ms > INTEREST_TIME_THRESHOLD_MS
}

/// Recomputes the stage from the whole log. Callers decide whether to apply it.
pub fn evaluate_stage(
    interactions: &[InteractionEvent],
    progress: &BTreeMap<String, SectionProgress>,
    completed_sections: &[String],
) -> ConversionStage {
    let high_engagement = progress
        .values()
        .filter(|p| p.percent_complete >= HIGH_ENGAGEMENT_PERCENT)
        .count();
    let high_intent = interactions.iter().any(|e| {
        matches!(
            e.action,
            Interaction::CtaClick {
                intent: Intent::High,
                ..
            }
        )
    });
    let any_cta = interactions
        .iter()
        .any(|e| matches!(e.action, Interaction::CtaClick { .. }));

    if high_engagement > 0 && high_intent {
        ConversionStage::Decision
    } else if !completed_sections.is_empty() || any_cta {
        ConversionStage::Consideration
    } else {
        ConversionStage::Awareness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_at(stage: ConversionStage, interests: &[&str]) -> UserProfile {
        UserProfile {
            conversion_stage: stage,
            primary_interests: interests.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_drives_recommendation() {
        assert_eq!(
            recommended_action(&profile_at(ConversionStage::Awareness, &["financial_impact"])),
            RecommendedAction::ExploreDomainAnalysis
        );
        assert_eq!(
            recommended_action(&profile_at(ConversionStage::Consideration, &[])),
            RecommendedAction::CalculateRoi
        );
        assert_eq!(
            recommended_action(&profile_at(ConversionStage::Decision, &[])).as_str(),
            "schedule_demo"
        );
    }

    #[test]
    fn test_converted_falls_back_to_interest_priority() {
        let converted = |interests: &[&str]| recommended_action(&profile_at(ConversionStage::Converted, interests));
        assert_eq!(
            converted(&["technical_debt", "domain_intelligence", "financial_impact"]),
            RecommendedAction::CalculateRoi
        );
        assert_eq!(
            converted(&["technical_debt", "domain_intelligence"]),
            RecommendedAction::ExploreDomainAnalysis
        );
        assert_eq!(converted(&["technical_debt"]), RecommendedAction::ExploreValueProposition);
        assert_eq!(converted(&["social_proof"]), RecommendedAction::ExploreDomainAnalysis);
    }

    #[test]
    fn test_interest_table() {
        assert_eq!(interest_for_section("pricing"), Some("financial_impact"));
        assert_eq!(interest_for_section("domain-analysis"), Some("domain_intelligence"));
        assert_eq!(interest_for_section("footer"), None);
        for id in KNOWN_SECTIONS {
            assert!(interest_for_section(id).is_some(), "{} has no tag", id);
        }
    }

    #[test]
    fn test_interest_thresholds_are_strict() {
        let at = |percent: f64, time: u64| SectionProgress {
            percent_complete: percent,
            total_time_ms: time,
            ..Default::default()
        };
        assert!(!should_infer_interest(&Interaction::View, &at(70.0, 60_000)));
        assert!(should_infer_interest(&Interaction::View, &at(70.5, 0)));
        assert!(should_infer_interest(&Interaction::View, &at(0.0, 60_001)));
        assert!(should_infer_interest(&Interaction::Complete, &at(0.0, 0)));
    }

    #[test]
    fn test_has_dismissed_section() {
        let profile = UserProfile {
            dismissed_sections: vec!["roadmap".into()],
            ..Default::default()
        };
        assert!(has_dismissed_section(&profile, "roadmap"));
        assert!(!has_dismissed_section(&profile, "pricing"));
    }

    #[test]
    fn test_evaluate_stage() {
        let mut progress = BTreeMap::new();
        let low_click = InteractionEvent::new(
            "hero",
            Interaction::CtaClick {
                intent: Intent::Low,
                target: None,
            },
        );
        let high_click = InteractionEvent::new(
            "hero",
            Interaction::CtaClick {
                intent: Intent::High,
                target: None,
            },
        );

        assert_eq!(evaluate_stage(&[], &progress, &[]), ConversionStage::Awareness);
        assert_eq!(
            evaluate_stage(&[low_click.clone()], &progress, &[]),
            ConversionStage::Consideration
        );
        // High intent alone is not enough without a deeply read section.
        assert_eq!(
            evaluate_stage(&[high_click.clone()], &progress, &[]),
            ConversionStage::Consideration
        );

        progress.insert(
            "pricing".to_string(),
            SectionProgress {
                percent_complete: 95.0,
                ..Default::default()
            },
        );
        // Deep reading alone, without a completed section or a click, stays in awareness.
        assert_eq!(evaluate_stage(&[], &progress, &[]), ConversionStage::Awareness);
        assert_eq!(
            evaluate_stage(&[low_click], &progress, &[]),
            ConversionStage::Consideration
        );
        assert_eq!(evaluate_stage(&[high_click], &progress, &[]), ConversionStage::Decision);
    }
}
