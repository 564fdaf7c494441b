use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use super::handle::EngagementHandle;
use super::types::{Interaction, InteractionEvent};

pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerSignal {
    /// First time this mount became visible.
    Viewed,
    /// Entered the viewport; becomes the active section.
    BecameActive,
    /// Left the viewport after this many milliseconds.
    TimeSpent(u64),
}

/// Visibility state for one mounted section.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    section_id: String,
    threshold: f64,
    viewed: bool,
    entered_at: Option<DateTime<Utc>>,
}

impl VisibilityTracker {
    pub fn new(section_id: impl Into<String>, threshold: f64) -> Self {
        Self {
            section_id: section_id.into(),
            threshold,
            viewed: false,
            entered_at: None,
        }
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn is_visible(&self) -> bool {
        self.entered_at.is_some()
    }

    pub fn observe(&mut self, ratio: f64, now: DateTime<Utc>) -> Vec<TrackerSignal> {
        let visible = ratio > 0.0 && ratio >= self.threshold;
        let mut signals = Vec::new();
        match (visible, self.entered_at) {
            (true, None) => {
                if !self.viewed {
                    self.viewed = true;
                    signals.push(TrackerSignal::Viewed);
                }
                self.entered_at = Some(now);
                signals.push(TrackerSignal::BecameActive);
            }
            (false, Some(entered)) => {
                self.entered_at = None;
                signals.push(TrackerSignal::TimeSpent(elapsed_ms(entered, now)));
            }
            _ => {}
        }
        signals
    }

    /// Closes an open interval, for when the section unmounts while visible.
    pub fn flush(&mut self, now: DateTime<Utc>) -> Option<u64> {
        self.entered_at.take().map(|entered| elapsed_ms(entered, now))
    }
}

fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0) as u64
}

fn apply_signal(engagement: &EngagementHandle, section_id: &str, signal: TrackerSignal) {
    match signal {
        TrackerSignal::Viewed => {
            engagement.record_interaction(InteractionEvent::new(section_id, Interaction::View))
        }
        TrackerSignal::BecameActive => engagement.set_active_section(section_id),
        TrackerSignal::TimeSpent(duration_ms) => engagement.record_interaction(InteractionEvent::new(
            section_id,
            Interaction::TimeSpent { duration_ms },
        )),
    }
}

/// Observes `node` and reports view / time-spent interactions for `section_id`.
#[hook]
pub fn use_section_tracker(node: NodeRef, section_id: String, threshold: f64, engagement: EngagementHandle) {
    use_effect_with_deps(
        move |(section_id, threshold)| {
            let tracker = Rc::new(RefCell::new(VisibilityTracker::new(section_id.clone(), *threshold)));

            let callback = {
                let tracker = tracker.clone();
                let engagement = engagement.clone();
                Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                    move |entries: js_sys::Array, _observer: IntersectionObserver| {
                        for entry in entries.iter() {
                            let entry: IntersectionObserverEntry = match entry.dyn_into() {
                                Ok(entry) => entry,
                                Err(_) => continue,
                            };
                            let signals = tracker.borrow_mut().observe(entry.intersection_ratio(), Utc::now());
                            let section_id = tracker.borrow().section_id().to_string();
                            for signal in signals {
                                apply_signal(&engagement, &section_id, signal);
                            }
                        }
                    },
                )
            };

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(*threshold));
            let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
                Ok(observer) => Some(observer),
                Err(e) => {
                    warn!("Section tracking disabled for {}: {:?}", section_id, e);
                    None
                }
            };

            match (&observer, node.cast::<Element>()) {
                (Some(observer), Some(element)) => observer.observe(&element),
                (Some(_), None) => debug!("Section {} not mounted, nothing to observe", section_id),
                _ => {}
            }

            move || {
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                let pending = tracker.borrow_mut().flush(Utc::now());
                if let Some(duration_ms) = pending {
                    let section_id = tracker.borrow().section_id().to_string();
                    apply_signal(&engagement, &section_id, TrackerSignal::TimeSpent(duration_ms));
                }
                drop(callback);
            }
        },
        (section_id, threshold),
    );
}
