use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse funnel position. Ordered, so `Decision > Consideration` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStage {
    #[default]
    Awareness,
    Consideration,
    Decision,
    Converted,
}

impl ConversionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStage::Awareness => "awareness",
            ConversionStage::Consideration => "consideration",
            ConversionStage::Decision => "decision",
            ConversionStage::Converted => "converted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub visit_count: u32,
    pub last_visit: Option<DateTime<Utc>>,
    pub primary_interests: Vec<String>,
    pub conversion_stage: ConversionStage,
    pub dismissed_sections: Vec<String>,
    pub completed_sections: Vec<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            visit_count: 0,
            last_visit: None,
            primary_interests: Vec::new(),
            conversion_stage: ConversionStage::Awareness,
            dismissed_sections: Vec::new(),
            completed_sections: Vec::new(),
            industry: None,
            company_size: None,
        }
    }
}

/// Pushes `value` unless it is already present. Returns whether it was added.
pub fn push_unique(set: &mut Vec<String>, value: &str) -> bool {
    if set.iter().any(|existing| existing == value) {
        return false;
    }
    set.push(value.to_string());
    true
}

/// Partial profile. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub visit_count: Option<u32>,
    pub primary_interests: Option<Vec<String>>,
    pub conversion_stage: Option<ConversionStage>,
    pub dismissed_sections: Option<Vec<String>>,
    pub completed_sections: Option<Vec<String>>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
}

impl ProfileUpdate {
    pub fn stage(stage: ConversionStage) -> Self {
        Self {
            conversion_stage: Some(stage),
            ..Default::default()
        }
    }

    /// Whether this update touches a field the analytics sink cares about.
    pub fn touches_business_context(&self) -> bool {
        self.industry.is_some() || self.company_size.is_some() || self.conversion_stage.is_some()
    }

    /// Shallow merge into `profile`. Set-valued fields are deduplicated on the way in.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(count) = self.visit_count {
            profile.visit_count = count;
        }
        if let Some(interests) = &self.primary_interests {
            profile.primary_interests = dedup(interests);
        }
        if let Some(stage) = self.conversion_stage {
            profile.conversion_stage = stage;
        }
        if let Some(dismissed) = &self.dismissed_sections {
            profile.dismissed_sections = dedup(dismissed);
        }
        if let Some(completed) = &self.completed_sections {
            profile.completed_sections = dedup(completed);
        }
        if let Some(industry) = &self.industry {
            profile.industry = Some(industry.clone());
        }
        if let Some(size) = &self.company_size {
            profile.company_size = Some(size.clone());
        }
    }
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        push_unique(&mut out, value);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Low,
    High,
}

/// What the user did. Each variant carries only the payload it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    View,
    Complete,
    Progress {
        percent: f64,
    },
    TimeSpent {
        duration_ms: u64,
    },
    CtaClick {
        #[serde(default)]
        intent: Intent,
        #[serde(default)]
        target: Option<String>,
    },
    FormSubmit {
        form: String,
    },
    #[serde(other)]
    Unknown,
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::View => "view",
            Interaction::Complete => "complete",
            Interaction::Progress { .. } => "progress",
            Interaction::TimeSpent { .. } => "time_spent",
            Interaction::CtaClick { .. } => "cta_click",
            Interaction::FormSubmit { .. } => "form_submit",
            Interaction::Unknown => "unknown",
        }
    }

    /// Only these can move the conversion stage.
    pub fn triggers_stage_evaluation(&self) -> bool {
        matches!(
            self,
            Interaction::Complete | Interaction::CtaClick { .. } | Interaction::FormSubmit { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub timestamp: DateTime<Utc>,
    pub section_id: String,
    pub action: Interaction,
}

impl InteractionEvent {
    pub fn new(section_id: impl Into<String>, action: Interaction) -> Self {
        Self::at(Utc::now(), section_id, action)
    }

    pub fn at(timestamp: DateTime<Utc>, section_id: impl Into<String>, action: Interaction) -> Self {
        Self {
            timestamp,
            section_id: section_id.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionProgress {
    pub viewed: bool,
    pub percent_complete: f64,
    pub dismissed: bool,
    pub total_time_ms: u64,
}
