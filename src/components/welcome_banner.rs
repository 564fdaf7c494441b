use yew::prelude::*;
use gloo_timers::callback::Timeout;

use crate::content::interest_badge;
use crate::engagement::EngagementHandle;

const VISIBLE_MS: u32 = 8000;

#[derive(Properties, PartialEq)]
pub struct WelcomeBannerProps {
    pub engagement: EngagementHandle,
}

#[function_component(WelcomeBanner)]
pub fn welcome_banner(props: &WelcomeBannerProps) -> Html {
    let returning = props.engagement.is_returning_user();
    let visible = use_state(|| returning);

    {
        let visible_setter = visible.setter();
        use_effect_with_deps(move |returning| {
            let timeout = if *returning {
                Some(Timeout::new(VISIBLE_MS, move || {
                    visible_setter.set(false);
                }))
            } else {
                None
            };

            move || drop(timeout) // Cancel if we unmount first
        }, returning);
    }

    let close = {
        let visible = visible.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            visible.set(false);
        })
    };

    if !*visible {
        return html! {};
    }

    let profile = props.engagement.profile();
    let badges: Vec<&'static str> = profile
        .primary_interests
        .iter()
        .filter_map(|tag| interest_badge(tag))
        .collect();

    html! {
        <div class="welcome-banner fade-in">
            <style>
                {r#"
                    @keyframes fadeIn {
                        from { opacity: 0; transform: translateY(-8px); }
                        to { opacity: 1; transform: translateY(0); }
                    }
                    .welcome-banner {
                        position: fixed;
                        top: 80px;
                        right: 24px;
                        max-width: 340px;
                        background: rgba(26, 26, 26, 0.95);
                        border: 1px solid rgba(30, 144, 255, 0.2);
                        border-radius: 16px;
                        padding: 16px 20px;
                        color: #ddd;
                        z-index: 20;
                    }
                    .welcome-banner.fade-in {
                        animation: fadeIn 0.5s ease-out;
                    }
                    .welcome-banner .badges span {
                        display: inline-block;
                        margin: 6px 6px 0 0;
                        padding: 2px 10px;
                        border-radius: 999px;
                        background: rgba(30, 144, 255, 0.15);
                        font-size: 0.8rem;
                    }
                    .welcome-close {
                        float: right;
                        background: none;
                        border: none;
                        color: #999;
                        cursor: pointer;
                    }
                "#}
            </style>
            <button class="welcome-close" onclick={close}>{"×"}</button>
            <strong>{"Good to see you again"}</strong>
            <p>{format!("This is visit number {}.", props.engagement.visit_count())}</p>
            {
                if badges.is_empty() {
                    html! {}
                } else {
                    html! {
                        <div class="badges">
                            <small>{"Picked up where you left off:"}</small>
                            <div>{ for badges.iter().map(|b| html! { <span>{*b}</span> }) }</div>
                        </div>
                    }
                }
            }
        </div>
    }
}
