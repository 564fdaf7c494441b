use std::cell::RefCell;
use std::rc::Rc;

use yew::Callback;

use super::policy::RecommendedAction;
use super::store::EngagementStore;
use super::types::{InteractionEvent, ProfileUpdate, SectionProgress, UserProfile};

/// Passed down as a prop to everything that reads or reports engagement.
///
/// Equality is by store identity plus the revision seen when the handle was
/// built, so a mutation re-renders every component holding a handle.
#[derive(Clone)]
pub struct EngagementHandle {
    store: Rc<RefCell<EngagementStore>>,
    revision: u64,
    on_change: Callback<()>,
}

impl PartialEq for EngagementHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && self.revision == other.revision
    }
}

impl EngagementHandle {
    pub fn new(store: Rc<RefCell<EngagementStore>>, on_change: Callback<()>) -> Self {
        let revision = store.borrow().revision();
        Self {
            store,
            revision,
            on_change,
        }
    }

    pub fn profile(&self) -> UserProfile {
        self.store.borrow().profile().clone()
    }

    pub fn active_section(&self) -> Option<String> {
        self.store.borrow().active_section().map(str::to_string)
    }

    pub fn section_progress(&self, section_id: &str) -> SectionProgress {
        self.store.borrow().section_progress(section_id)
    }

    pub fn is_returning_user(&self) -> bool {
        self.store.borrow().is_returning_user()
    }

    pub fn visit_count(&self) -> u32 {
        self.store.borrow().visit_count()
    }

    pub fn recommended_action(&self) -> RecommendedAction {
        self.store.borrow().recommended_action()
    }

    pub fn has_dismissed_section(&self, section_id: &str) -> bool {
        self.store.borrow().has_dismissed_section(section_id)
    }

    pub fn record_interaction(&self, event: InteractionEvent) {
        self.mutate(|store| store.record_interaction(event));
    }

    pub fn dismiss_section(&self, section_id: &str) {
        self.mutate(|store| store.dismiss_section(section_id));
    }

    pub fn update_profile(&self, update: ProfileUpdate) {
        self.mutate(|store| store.update_profile(update));
    }

    pub fn set_active_section(&self, section_id: &str) {
        self.mutate(|store| store.set_active_section(section_id));
    }

    fn mutate(&self, f: impl FnOnce(&mut EngagementStore)) {
        let changed = {
            let mut store = self.store.borrow_mut();
            let before = store.revision();
            f(&mut store);
            store.revision() != before
        };
        if changed {
            self.on_change.emit(());
        }
    }
}
