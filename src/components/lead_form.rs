use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::engagement::{ConversionStage, EngagementHandle, Interaction, InteractionEvent, ProfileUpdate};

pub const SECTION_ID: &str = "lead-capture";

const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-1000", "1000+"];

pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Properties, PartialEq)]
pub struct LeadFormProps {
    pub engagement: EngagementHandle,
}

#[function_component(LeadForm)]
pub fn lead_form(props: &LeadFormProps) -> Html {
    let email = use_state(String::new);
    let industry = use_state(String::new);
    let company_size = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitted = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            email.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_industry = {
        let industry = industry.clone();
        Callback::from(move |e: InputEvent| {
            industry.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_size = {
        let company_size = company_size.clone();
        Callback::from(move |e: Event| {
            company_size.set(e.target_unchecked_into::<HtmlSelectElement>().value());
        })
    };

    let onsubmit = {
        let email = email.clone();
        let industry = industry.clone();
        let company_size = company_size.clone();
        let error = error.clone();
        let submitted = submitted.clone();
        let engagement = props.engagement.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !is_plausible_email(&email) {
                error.set(Some("Please enter a valid work email".to_string()));
                return;
            }
            engagement.record_interaction(InteractionEvent::new(
                SECTION_ID,
                Interaction::FormSubmit {
                    form: "strategy_call".to_string(),
                },
            ));
            let non_empty = |v: &str| (!v.trim().is_empty()).then(|| v.trim().to_string());
            engagement.update_profile(ProfileUpdate {
                industry: non_empty(&industry),
                company_size: non_empty(&company_size),
                conversion_stage: Some(ConversionStage::Converted),
                ..Default::default()
            });
            error.set(None);
            submitted.set(true);
        })
    };

    if *submitted {
        return html! {
            <div class="lead-form submitted">
                <h2>{"Thanks, we'll be in touch within one business day."}</h2>
            </div>
        };
    }

    html! {
        <form class="lead-form" {onsubmit}>
            <h2>{"Book a strategy call"}</h2>
            <p>{"Tell us a little about your business and we'll come prepared."}</p>
            <input type="email" placeholder="Work email" value={(*email).clone()} oninput={on_email} />
            <input type="text" placeholder="Industry" value={(*industry).clone()} oninput={on_industry} />
            <select onchange={on_size}>
                <option value="" selected={company_size.is_empty()}>{"Company size"}</option>
                { for COMPANY_SIZES.iter().map(|size| html! {
                    <option value={*size} selected={*company_size == *size}>{*size}</option>
                }) }
            </select>
            {
                if let Some(message) = (*error).as_ref() {
                    html! { <p class="error-message">{message}</p> }
                } else {
                    html! {}
                }
            }
            <button type="submit" class="hero-cta">{"Request a call"}</button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_check() {
        assert!(is_plausible_email("ceo@ledgerly.io"));
        assert!(is_plausible_email("  ops@north.wind.co "));
        assert!(!is_plausible_email("ceo@localhost"));
        assert!(!is_plausible_email("@ledgerly.io"));
        assert!(!is_plausible_email("ceo@ledgerly."));
        assert!(!is_plausible_email("not-an-email"));
    }
}
