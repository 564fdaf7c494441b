//! Static copy for the homepage, keyed by what the engagement policy decides.

use crate::engagement::{ConversionStage, Intent, RecommendedAction};

pub struct HeroCopy {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub subheadline: &'static str,
}

pub fn hero_copy(stage: ConversionStage) -> HeroCopy {
    match stage {
        ConversionStage::Awareness => HeroCopy {
            eyebrow: "Growth strategy for B2B teams",
            headline: "Find the growth your market is already signalling",
            subheadline: "We map your domain, size the upside and build the plan to capture it.",
        },
        ConversionStage::Consideration => HeroCopy {
            eyebrow: "You've seen how we work",
            headline: "Put a number on what growth is worth to you",
            subheadline: "Run your figures through the ROI calculator and compare it with our engagements.",
        },
        ConversionStage::Decision => HeroCopy {
            eyebrow: "Ready when you are",
            headline: "Let's build your 90-day growth plan together",
            subheadline: "Thirty minutes with a strategist, a concrete roadmap at the end of it.",
        },
        ConversionStage::Converted => HeroCopy {
            eyebrow: "Welcome back",
            headline: "Your growth plan is in motion",
            subheadline: "Keep exploring the material most relevant to your goals.",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtaCopy {
    pub label: &'static str,
    /// Section the button scrolls to.
    pub target: &'static str,
    pub intent: Intent,
}

pub fn cta_copy(action: RecommendedAction) -> CtaCopy {
    match action {
        RecommendedAction::ExploreDomainAnalysis => CtaCopy {
            label: "See what we find in your market",
            target: "domain-analysis",
            intent: Intent::Low,
        },
        RecommendedAction::CalculateRoi => CtaCopy {
            label: "Calculate your ROI",
            target: "roi-calculator",
            intent: Intent::Low,
        },
        RecommendedAction::ScheduleDemo => CtaCopy {
            label: "Book a strategy call",
            target: "lead-capture",
            intent: Intent::High,
        },
        RecommendedAction::ExploreValueProposition => CtaCopy {
            label: "How we pay down growth debt",
            target: "value-proposition",
            intent: Intent::Low,
        },
    }
}

pub fn interest_badge(tag: &str) -> Option<&'static str> {
    match tag {
        "domain_intelligence" => Some("Market intelligence"),
        "technical_debt" => Some("Growth debt"),
        "financial_impact" => Some("Financial impact"),
        "proven_results" => Some("Proven results"),
        "social_proof" => Some("Peer stories"),
        "implementation_planning" => Some("Roadmapping"),
        "direct_engagement" => Some("Talk to us"),
        _ => None,
    }
}

pub fn section_title(section_id: &str) -> &'static str {
    match section_id {
        "domain-analysis" => "Domain Analysis",
        "value-proposition" => "Why Us",
        "roi-calculator" => "ROI",
        "case-studies" => "Case Studies",
        "testimonials" => "Testimonials",
        "pricing" => "Pricing",
        "roadmap" => "Roadmap",
        "lead-capture" => "Contact",
        _ => "",
    }
}

pub struct CaseStudy {
    pub client: &'static str,
    pub industry: &'static str,
    pub challenge: &'static str,
    pub result: &'static str,
}

pub const CASE_STUDIES: &[CaseStudy] = &[
    CaseStudy {
        client: "Northwind Logistics",
        industry: "Logistics",
        challenge: "Flat pipeline after two years of paid-search dependence.",
        result: "+48% qualified pipeline in two quarters from partner-led channels.",
    },
    CaseStudy {
        client: "Ledgerly",
        industry: "Fintech",
        challenge: "Strong trials, weak conversion to paid seats.",
        result: "Trial-to-paid conversion up from 9% to 17% after onboarding rework.",
    },
    CaseStudy {
        client: "Harbor Health",
        industry: "Healthcare",
        challenge: "Entering a regulated new market with no brand presence.",
        result: "First 30 enterprise accounts signed inside nine months.",
    },
];

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "They found the segment we had been ignoring and it is now a third of our revenue.",
        author: "Maya Lindqvist",
        role: "CEO, Ledgerly",
    },
    Testimonial {
        quote: "The domain analysis alone changed how our board talks about growth.",
        author: "Daniel Okafor",
        role: "VP Marketing, Northwind Logistics",
    },
];

pub struct PricingTier {
    pub name: &'static str,
    pub price: &'static str,
    pub summary: &'static str,
    pub features: &'static [&'static str],
}

pub const PRICING_TIERS: &[PricingTier] = &[
    PricingTier {
        name: "Diagnostic",
        price: "€6,500",
        summary: "A four-week domain analysis and growth opportunity map.",
        features: &["Market & competitor map", "Funnel audit", "Prioritised opportunity list"],
    },
    PricingTier {
        name: "Growth Sprint",
        price: "€18,000",
        summary: "Twelve weeks to design, test and ship your top growth bets.",
        features: &["Everything in Diagnostic", "Experiment backlog", "Weekly strategist sessions"],
    },
    PricingTier {
        name: "Embedded",
        price: "Custom",
        summary: "A strategist and analyst embedded with your team.",
        features: &["Quarterly roadmap", "Hands-on execution", "Board-ready reporting"],
    },
];

pub const ROADMAP_STEPS: &[(&str, &str)] = &[
    ("Weeks 1-2", "Domain analysis and stakeholder interviews"),
    ("Weeks 3-4", "Opportunity sizing and prioritisation"),
    ("Weeks 5-10", "Experiments in market"),
    ("Weeks 11-12", "Scale what works, hand over the playbook"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::policy::KNOWN_SECTIONS;

    #[test]
    fn test_cta_targets_are_known_sections() {
        for action in [
            RecommendedAction::ExploreDomainAnalysis,
            RecommendedAction::CalculateRoi,
            RecommendedAction::ScheduleDemo,
            RecommendedAction::ExploreValueProposition,
        ] {
            let cta = cta_copy(action);
            assert!(KNOWN_SECTIONS.contains(&cta.target), "{} -> {}", action, cta.target);
        }
    }

    #[test]
    fn test_only_demo_cta_is_high_intent() {
        assert_eq!(cta_copy(RecommendedAction::ScheduleDemo).intent, Intent::High);
        assert_eq!(cta_copy(RecommendedAction::CalculateRoi).intent, Intent::Low);
    }

    #[test]
    fn test_every_known_section_has_a_title_and_badge() {
        for id in KNOWN_SECTIONS {
            assert!(!section_title(id).is_empty());
            let tag = crate::engagement::policy::interest_for_section(id).unwrap();
            assert!(interest_badge(tag).is_some());
        }
    }
}
