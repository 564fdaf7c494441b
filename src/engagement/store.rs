use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::analytics::{AnalyticsEvent, AnalyticsSink};
use super::error::StorageError;
use super::policy::{self, RecommendedAction, KNOWN_SECTIONS};
use super::storage::KeyValueStorage;
use super::types::{
    push_unique, ConversionStage, Interaction, InteractionEvent, ProfileUpdate, SectionProgress, UserProfile,
};
use crate::config;

/// The three storage keys the store persists under.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageKeys {
    pub profile: String,
    pub interactions: String,
    pub progress: String,
}

impl StorageKeys {
    pub fn namespaced(namespace: &str) -> Self {
        Self {
            profile: format!("{}.profile", namespace),
            interactions: format!("{}.interaction-log", namespace),
            progress: format!("{}.section-progress", namespace),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::namespaced(config::STORAGE_NAMESPACE)
    }
}

/// Holds the visitor profile, the interaction log and per-section progress for
/// one browser client, and mirrors them to storage after every mutation.
///
/// One store per tab. Tabs do not coordinate, so two open tabs overwrite each
/// other's persisted state (last write wins).
pub struct EngagementStore {
    profile: UserProfile,
    interactions: Vec<InteractionEvent>,
    progress: BTreeMap<String, SectionProgress>,
    active_section: Option<String>,
    revision: u64,
    keys: StorageKeys,
    storage: Rc<dyn KeyValueStorage>,
    analytics: Rc<dyn AnalyticsSink>,
}

impl EngagementStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>, analytics: Rc<dyn AnalyticsSink>) -> Self {
        Self::with_keys(storage, analytics, StorageKeys::default())
    }

    pub fn with_keys(
        storage: Rc<dyn KeyValueStorage>,
        analytics: Rc<dyn AnalyticsSink>,
        keys: StorageKeys,
    ) -> Self {
        Self {
            profile: UserProfile::default(),
            interactions: Vec::new(),
            progress: seeded_progress(),
            active_section: None,
            revision: 0,
            keys,
            storage,
            analytics,
        }
    }

    /// Loads persisted state (or seeds defaults), counts the visit and applies
    /// `overrides` on top. Never fails; unreadable state is treated as a first visit.
    pub fn initialize(&mut self, overrides: ProfileUpdate) {
        let persisted = match self.load::<UserProfile>(&self.keys.profile) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Discarding stored engagement profile: {}", e);
                None
            }
        };

        let returning = persisted.is_some();
        match persisted {
            Some(mut profile) => {
                profile.visit_count = profile.visit_count.saturating_add(1);
                self.profile = profile;
                self.interactions = self.load_or_reset(&self.keys.interactions);
                self.progress = self.load_or_reset(&self.keys.progress);
            }
            None => {
                self.profile = UserProfile {
                    visit_count: 1,
                    ..Default::default()
                };
                self.interactions = Vec::new();
                self.progress = BTreeMap::new();
            }
        }
        for section in KNOWN_SECTIONS {
            self.progress.entry(section.to_string()).or_default();
        }
        self.profile.last_visit = Some(Utc::now());
        overrides.apply_to(&mut self.profile);

        info!(
            "Engagement store ready: visit {} ({})",
            self.profile.visit_count,
            self.profile.conversion_stage.as_str()
        );
        let visitor = if returning { "returning_user" } else { "new_user" };
        self.track(
            "pageview",
            json!({ "visitor": visitor, "visit_count": self.profile.visit_count }),
        );
        self.commit();
    }

    /// Shallow-merges `update` into the profile.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        update.apply_to(&mut self.profile);
        if update.touches_business_context() {
            let mut fields = Map::new();
            if let Some(industry) = &update.industry {
                fields.insert("industry".to_string(), json!(industry));
            }
            if let Some(size) = &update.company_size {
                fields.insert("company_size".to_string(), json!(size));
            }
            if let Some(stage) = update.conversion_stage {
                fields.insert("conversion_stage".to_string(), json!(stage.as_str()));
            }
            self.track("profile_update", Value::Object(fields));
        }
        self.commit();
    }

    pub fn record_interaction(&mut self, event: InteractionEvent) {
        self.interactions.push(event.clone());

        let section_id = event.section_id.as_str();
        debug!("Recorded {} on {}", event.action.name(), section_id);
        let progress = self.progress.entry(section_id.to_string()).or_default();
        match &event.action {
            Interaction::View => progress.viewed = true,
            Interaction::Complete => {
                progress.percent_complete = 100.0;
                push_unique(&mut self.profile.completed_sections, section_id);
            }
            Interaction::Progress { percent } => {
                if percent.is_finite() {
                    progress.percent_complete = percent.clamp(0.0, 100.0);
                } else {
                    debug!("Ignoring non-finite progress for {}", section_id);
                }
            }
            Interaction::TimeSpent { duration_ms } => {
                progress.total_time_ms = progress.total_time_ms.saturating_add(*duration_ms);
            }
            Interaction::CtaClick { .. } | Interaction::FormSubmit { .. } => {}
            Interaction::Unknown => debug!("Unknown interaction on {}, progress unchanged", section_id),
        }

        if policy::should_infer_interest(&event.action, progress) {
            if let Some(tag) = policy::interest_for_section(section_id) {
                if push_unique(&mut self.profile.primary_interests, tag) {
                    debug!("Inferred interest {} from {}", tag, section_id);
                }
            }
        }

        match &event.action {
            Interaction::CtaClick { intent, target } => self.track(
                "cta_click",
                json!({ "section_id": section_id, "intent": intent, "target": target }),
            ),
            Interaction::FormSubmit { form } => {
                self.track("form_submit", json!({ "section_id": section_id, "form": form }))
            }
            _ => {}
        }

        if event.action.triggers_stage_evaluation() {
            let computed = policy::evaluate_stage(
                &self.interactions,
                &self.progress,
                &self.profile.completed_sections,
            );
            // Stages only move forward here. Regression needs an explicit update_profile.
            if computed > self.profile.conversion_stage {
                info!(
                    "Conversion stage {} -> {}",
                    self.profile.conversion_stage.as_str(),
                    computed.as_str()
                );
                self.update_profile(ProfileUpdate::stage(computed));
                return;
            }
        }
        self.commit();
    }

    pub fn dismiss_section(&mut self, section_id: &str) {
        self.progress.entry(section_id.to_string()).or_default().dismissed = true;
        push_unique(&mut self.profile.dismissed_sections, section_id);
        self.track("section_dismiss", json!({ "section_id": section_id }));
        self.commit();
    }

    /// Not persisted.
    pub fn set_active_section(&mut self, section_id: &str) {
        if self.active_section.as_deref() == Some(section_id) {
            return;
        }
        self.active_section = Some(section_id.to_string());
        self.revision += 1;
    }

    pub fn recommended_action(&self) -> RecommendedAction {
        policy::recommended_action(&self.profile)
    }

    pub fn has_dismissed_section(&self, section_id: &str) -> bool {
        policy::has_dismissed_section(&self.profile, section_id)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn interactions(&self) -> &[InteractionEvent] {
        &self.interactions
    }

    pub fn progress(&self) -> &BTreeMap<String, SectionProgress> {
        &self.progress
    }

    pub fn section_progress(&self, section_id: &str) -> SectionProgress {
        self.progress.get(section_id).cloned().unwrap_or_default()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn visit_count(&self) -> u32 {
        self.profile.visit_count
    }

    pub fn is_returning_user(&self) -> bool {
        self.profile.visit_count > 1
    }

    pub fn conversion_stage(&self) -> ConversionStage {
        self.profile.conversion_stage
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn track(&self, name: &str, properties: Value) {
        self.analytics.track(AnalyticsEvent::new(name, properties));
    }

    fn commit(&mut self) {
        self.revision += 1;
        self.persist();
    }

    /// Each key is written independently; the log is last since it is the
    /// only one that grows and so the first to hit the quota.
    fn persist(&self) {
        let results = [
            (&self.keys.progress, self.save(&self.keys.progress, &self.progress)),
            (&self.keys.profile, self.save(&self.keys.profile, &self.profile)),
            (&self.keys.interactions, self.save(&self.keys.interactions, &self.interactions)),
        ];
        for (key, result) in results {
            if let Err(e) = result {
                warn!("{} not saved, it will not survive a reload: {}", key, e);
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn load_or_reset<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!("Resetting {}: {}", key, e);
                T::default()
            }
        }
    }
}

fn seeded_progress() -> BTreeMap<String, SectionProgress> {
    KNOWN_SECTIONS
        .iter()
        .map(|id| (id.to_string(), SectionProgress::default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::engagement::analytics::testing::RecordingSink;
    use crate::engagement::storage::MemoryStorage;
    use crate::engagement::types::Intent;

    fn store_with(storage: &MemoryStorage, sink: &RecordingSink) -> EngagementStore {
        EngagementStore::new(Rc::new(storage.clone()), Rc::new(sink.clone()))
    }

    fn fresh() -> (EngagementStore, MemoryStorage, RecordingSink) {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::default();
        let mut store = store_with(&storage, &sink);
        store.initialize(ProfileUpdate::default());
        (store, storage, sink)
    }

    fn event(section: &str, action: Interaction) -> InteractionEvent {
        InteractionEvent::new(section, action)
    }

    fn high_click() -> Interaction {
        Interaction::CtaClick {
            intent: Intent::High,
            target: Some("schedule-demo".to_string()),
        }
    }

    #[test]
    fn test_first_visit_defaults() {
        let (store, storage, sink) = fresh();
        assert_eq!(store.visit_count(), 1);
        assert!(!store.is_returning_user());
        assert!(store.profile().last_visit.is_some());
        assert_eq!(store.conversion_stage(), ConversionStage::Awareness);
        assert_eq!(store.progress().len(), KNOWN_SECTIONS.len());

        let pageviews = sink.named("pageview");
        assert_eq!(pageviews.len(), 1);
        assert_eq!(pageviews[0].properties["visitor"], "new_user");

        let keys = StorageKeys::default();
        assert!(storage.raw(&keys.profile).is_some());
        assert!(storage.raw(&keys.interactions).is_some());
        assert!(storage.raw(&keys.progress).is_some());
    }

    #[test]
    fn test_returning_visit_restores_state() {
        let (mut first, storage, _) = fresh();
        first.record_interaction(event("pricing", Interaction::Complete));
        drop(first);

        let sink = RecordingSink::default();
        let mut second = store_with(&storage, &sink);
        second.initialize(ProfileUpdate::default());

        assert_eq!(second.visit_count(), 2);
        assert!(second.is_returning_user());
        assert_eq!(second.interactions().len(), 1);
        assert_eq!(second.section_progress("pricing").percent_complete, 100.0);
        assert_eq!(second.conversion_stage(), ConversionStage::Consideration);
        assert_eq!(sink.named("pageview")[0].properties["visitor"], "returning_user");
    }

    #[test]
    fn test_overrides_win_over_persisted_values() {
        let (mut first, storage, _) = fresh();
        first.update_profile(ProfileUpdate {
            industry: Some("retail".into()),
            ..Default::default()
        });
        drop(first);

        let mut second = store_with(&storage, &RecordingSink::default());
        second.initialize(ProfileUpdate {
            industry: Some("fintech".into()),
            ..Default::default()
        });
        assert_eq!(second.profile().industry.as_deref(), Some("fintech"));
        assert_eq!(second.visit_count(), 2);
    }

    #[test]
    fn test_corrupt_profile_falls_back_to_first_visit() {
        let storage = MemoryStorage::new();
        let keys = StorageKeys::default();
        storage.insert_raw(&keys.profile, "{not json");
        storage.insert_raw(&keys.interactions, "[]");

        let sink = RecordingSink::default();
        let mut store = store_with(&storage, &sink);
        store.initialize(ProfileUpdate::default());

        assert_eq!(store.visit_count(), 1);
        assert_eq!(store.conversion_stage(), ConversionStage::Awareness);
        assert_eq!(sink.named("pageview")[0].properties["visitor"], "new_user");
        // Overwritten with a valid profile.
        let raw = storage.raw(&keys.profile).unwrap();
        assert!(serde_json::from_str::<UserProfile>(&raw).is_ok());
    }

    #[test]
    fn test_corrupt_log_is_reset_alone() {
        let (first, storage, _) = fresh();
        drop(first);
        let keys = StorageKeys::default();
        storage.insert_raw(&keys.interactions, "[{\"broken\":");

        let mut store = store_with(&storage, &RecordingSink::default());
        store.initialize(ProfileUpdate::default());
        assert_eq!(store.visit_count(), 2);
        assert!(store.interactions().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (mut store, storage, _) = fresh();
        storage.set_fail_writes(true);
        store.record_interaction(event("roi-calculator", Interaction::Complete));

        assert_eq!(store.section_progress("roi-calculator").percent_complete, 100.0);
        assert_eq!(store.profile().completed_sections, vec!["roi-calculator".to_string()]);
        let persisted: Vec<InteractionEvent> =
            serde_json::from_str(&storage.raw(&StorageKeys::default().interactions).unwrap()).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn test_full_log_does_not_block_progress_and_profile() {
        let (mut store, storage, _) = fresh();
        let keys = StorageKeys::default();
        storage.reject_writes_to(&keys.interactions);
        for _ in 0..5 {
            store.record_interaction(event("pricing", Interaction::TimeSpent { duration_ms: 20_000 }));
        }

        let progress: BTreeMap<String, SectionProgress> =
            serde_json::from_str(&storage.raw(&keys.progress).unwrap()).unwrap();
        assert_eq!(progress["pricing"].total_time_ms, 100_000);
        let profile: UserProfile = serde_json::from_str(&storage.raw(&keys.profile).unwrap()).unwrap();
        assert_eq!(profile.primary_interests, vec!["financial_impact".to_string()]);
        let log: Vec<InteractionEvent> = serde_json::from_str(&storage.raw(&keys.interactions).unwrap()).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_deep_reading_without_click_stays_in_awareness() {
        let (mut store, _, _) = fresh();
        store.record_interaction(event("pricing", Interaction::Progress { percent: 95.0 }));
        store.record_interaction(event("lead-capture", Interaction::FormSubmit { form: "contact".into() }));
        assert_eq!(store.conversion_stage(), ConversionStage::Awareness);
        assert!(store.profile().completed_sections.is_empty());
    }

    #[test]
    fn test_progress_is_clamped_and_unknown_is_noop() {
        let (mut store, _, _) = fresh();
        store.record_interaction(event("case-studies", Interaction::Progress { percent: 140.0 }));
        assert_eq!(store.section_progress("case-studies").percent_complete, 100.0);
        store.record_interaction(event("case-studies", Interaction::Progress { percent: -5.0 }));
        assert_eq!(store.section_progress("case-studies").percent_complete, 0.0);

        let before = store.section_progress("case-studies");
        store.record_interaction(event("case-studies", Interaction::Unknown));
        assert_eq!(store.section_progress("case-studies"), before);
        assert_eq!(store.interactions().len(), 3);
    }

    #[test]
    fn test_unknown_section_gets_default_record() {
        let (mut store, _, _) = fresh();
        store.record_interaction(event("footer", Interaction::View));
        assert!(store.section_progress("footer").viewed);
        assert!(store.profile().primary_interests.is_empty());
    }

    #[test]
    fn test_sets_never_hold_duplicates() {
        let (mut store, _, _) = fresh();
        for _ in 0..3 {
            store.record_interaction(event("pricing", Interaction::Complete));
            store.record_interaction(event("roi-calculator", Interaction::Progress { percent: 80.0 }));
            store.dismiss_section("roadmap");
        }
        let profile = store.profile();
        assert_eq!(profile.completed_sections, vec!["pricing".to_string()]);
        // pricing and roi-calculator share a tag
        assert_eq!(profile.primary_interests, vec!["financial_impact".to_string()]);
        assert_eq!(profile.dismissed_sections, vec!["roadmap".to_string()]);
    }

    #[test]
    fn test_time_accumulates_monotonically() {
        let (mut store, _, _) = fresh();
        let durations = [1_200u64, 0, 45_000, 300, 9_999];
        let mut last = 0;
        for (i, ms) in durations.iter().enumerate() {
            let section = if i % 2 == 0 { "testimonials" } else { "pricing" };
            store.record_interaction(event(section, Interaction::TimeSpent { duration_ms: *ms }));
            let total = store.section_progress("testimonials").total_time_ms;
            assert!(total >= last);
            last = total;
        }
        assert_eq!(store.section_progress("testimonials").total_time_ms, 1_200 + 45_000 + 9_999);
        assert_eq!(store.section_progress("pricing").total_time_ms, 300);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let script = vec![
            InteractionEvent::at(start, "domain-analysis", Interaction::Complete),
            InteractionEvent::at(
                start + Duration::seconds(5),
                "hero",
                Interaction::CtaClick {
                    intent: Intent::Low,
                    target: None,
                },
            ),
            InteractionEvent::at(start + Duration::seconds(9), "pricing", high_click()),
            InteractionEvent::at(
                start + Duration::seconds(20),
                "lead-capture",
                Interaction::FormSubmit {
                    form: "contact".into(),
                },
            ),
        ];

        let replay = || {
            let (mut store, _, _) = fresh();
            for e in &script {
                store.record_interaction(e.clone());
            }
            (store.conversion_stage(), store.recommended_action())
        };
        let first = replay();
        assert_eq!(first, replay());
        assert_eq!(first, (ConversionStage::Decision, RecommendedAction::ScheduleDemo));
    }

    #[test]
    fn test_stage_never_regresses() {
        let (mut store, _, _) = fresh();
        store.update_profile(ProfileUpdate::stage(ConversionStage::Decision));
        store.record_interaction(event("hero", Interaction::FormSubmit { form: "newsletter".into() }));
        assert_eq!(store.conversion_stage(), ConversionStage::Decision);
    }

    #[test]
    fn test_stage_change_emits_profile_update() {
        let (mut store, _, sink) = fresh();
        store.record_interaction(event("testimonials", Interaction::Complete));
        let updates = sink.named("profile_update");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].properties["conversion_stage"], "consideration");

        // Same stage again: nothing written.
        store.record_interaction(event("case-studies", Interaction::Complete));
        assert_eq!(sink.named("profile_update").len(), 1);
    }

    #[test]
    fn test_update_profile_signals_only_business_fields() {
        let (mut store, _, sink) = fresh();
        store.update_profile(ProfileUpdate {
            primary_interests: Some(vec!["social_proof".into()]),
            ..Default::default()
        });
        assert!(sink.named("profile_update").is_empty());

        store.update_profile(ProfileUpdate {
            company_size: Some("51-200".into()),
            ..Default::default()
        });
        let updates = sink.named("profile_update");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].properties, json!({ "company_size": "51-200" }));
    }

    #[test]
    fn test_end_to_end_pricing_scenario() {
        let (mut store, _, sink) = fresh();
        assert_eq!(store.visit_count(), 1);
        assert_eq!(store.conversion_stage(), ConversionStage::Awareness);

        store.record_interaction(event("pricing", Interaction::View));
        store.record_interaction(event("pricing", Interaction::TimeSpent { duration_ms: 65_000 }));
        assert!(store.section_progress("pricing").viewed);
        assert_eq!(
            store.profile().primary_interests,
            vec![policy::interest_for_section("pricing").unwrap().to_string()]
        );
        assert_eq!(store.conversion_stage(), ConversionStage::Awareness);

        store.record_interaction(event("case-studies", Interaction::Complete));
        assert_eq!(store.conversion_stage(), ConversionStage::Consideration);
        store.record_interaction(event("case-studies", high_click()));

        assert_eq!(store.conversion_stage(), ConversionStage::Decision);
        assert_eq!(store.recommended_action().as_str(), "schedule_demo");
        assert_eq!(sink.named("cta_click").len(), 1);
    }

    #[test]
    fn test_dismiss_scenario() {
        let (mut store, _, sink) = fresh();
        store.dismiss_section("roadmap");

        assert!(policy::has_dismissed_section(store.profile(), "roadmap"));
        assert!(store.has_dismissed_section("roadmap"));
        assert!(store.section_progress("roadmap").dismissed);
        let dismissals = sink.named("section_dismiss");
        assert_eq!(dismissals.len(), 1);
        // pageview from initialize plus the dismissal
        assert_eq!(sink.events().len(), 2);
        assert_eq!(dismissals[0].properties["section_id"], "roadmap");
    }

    #[test]
    fn test_active_section_is_last_entered() {
        let (mut store, _, _) = fresh();
        let rev = store.revision();
        store.set_active_section("pricing");
        store.set_active_section("testimonials");
        assert_eq!(store.active_section(), Some("testimonials"));
        assert!(store.revision() > rev);
    }

    #[test]
    fn test_custom_namespace() {
        let storage = MemoryStorage::new();
        let mut store = EngagementStore::with_keys(
            Rc::new(storage.clone()),
            Rc::new(RecordingSink::default()),
            StorageKeys::namespaced("preview"),
        );
        store.initialize(ProfileUpdate::default());
        assert!(storage.raw("preview.profile").is_some());
        assert!(storage.raw(&StorageKeys::default().profile).is_none());
    }
}
