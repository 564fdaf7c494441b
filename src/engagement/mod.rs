//! Visitor engagement tracking and homepage personalization.
//!
//! Sections report visibility through [`tracker`], the [`store::EngagementStore`]
//! reduces those interactions into a profile persisted in local storage, and
//! [`policy`] turns the profile into copy and call-to-action choices.

pub mod analytics;
pub mod error;
pub mod handle;
pub mod policy;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod types;

pub use handle::EngagementHandle;
pub use policy::RecommendedAction;
pub use store::EngagementStore;
pub use types::{ConversionStage, Intent, Interaction, InteractionEvent, ProfileUpdate};
