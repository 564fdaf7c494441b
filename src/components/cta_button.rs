use web_sys::window;
use yew::prelude::*;

use crate::engagement::{EngagementHandle, Intent, Interaction, InteractionEvent};

#[derive(Properties, PartialEq)]
pub struct CtaButtonProps {
    pub engagement: EngagementHandle,
    /// Section the click is attributed to.
    pub section_id: String,
    /// Section to scroll to.
    pub target: String,
    pub label: String,
    #[prop_or_default]
    pub intent: Intent,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(CtaButton)]
pub fn cta_button(props: &CtaButtonProps) -> Html {
    let onclick = {
        let engagement = props.engagement.clone();
        let section_id = props.section_id.clone();
        let target = props.target.clone();
        let intent = props.intent;
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            engagement.record_interaction(InteractionEvent::new(
                section_id.clone(),
                Interaction::CtaClick {
                    intent,
                    target: Some(target.clone()),
                },
            ));
            scroll_to_section(&target);
        })
    };

    html! {
        <a
            href={format!("#{}", props.target)}
            class={classes!("hero-cta", props.class.clone())}
            {onclick}
        >
            {&props.label}
        </a>
    }
}

pub fn scroll_to_section(section_id: &str) {
    if let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(section_id))
    {
        element.scroll_into_view();
    }
}
