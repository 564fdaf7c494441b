use yew::prelude::*;

use crate::engagement::tracker::{use_section_tracker, DEFAULT_VISIBILITY_THRESHOLD};
use crate::engagement::EngagementHandle;

#[derive(Properties, PartialEq)]
pub struct TrackedSectionProps {
    pub id: String,
    pub engagement: EngagementHandle,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or(DEFAULT_VISIBILITY_THRESHOLD)]
    pub threshold: f64,
    /// Shows a close button; a dismissed section stays hidden on later visits.
    #[prop_or_default]
    pub dismissible: bool,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(TrackedSection)]
pub fn tracked_section(props: &TrackedSectionProps) -> Html {
    let node = use_node_ref();
    use_section_tracker(
        node.clone(),
        props.id.clone(),
        props.threshold,
        props.engagement.clone(),
    );

    if props.engagement.has_dismissed_section(&props.id) {
        return html! {};
    }

    let is_active = props.engagement.active_section().as_deref() == Some(props.id.as_str());

    let dismiss = {
        let engagement = props.engagement.clone();
        let id = props.id.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            engagement.dismiss_section(&id);
        })
    };

    html! {
        <section
            id={props.id.clone()}
            ref={node}
            class={classes!("tracked-section", props.class.clone(), is_active.then(|| "active"))}
        >
            {
                if props.dismissible {
                    html! {
                        <button class="section-dismiss" onclick={dismiss} aria-label="Hide this section">
                            {"×"}
                        </button>
                    }
                } else {
                    html! {}
                }
            }
            { for props.children.iter() }
        </section>
    }
}
