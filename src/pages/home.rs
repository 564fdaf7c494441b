use yew::prelude::*;
use web_sys::window;

use crate::components::cta_button::CtaButton;
use crate::components::lead_form::LeadForm;
use crate::components::roi_calculator::RoiCalculator;
use crate::components::tracked_section::TrackedSection;
use crate::components::welcome_banner::WelcomeBanner;
use crate::content::{
    self, cta_copy, hero_copy, CASE_STUDIES, PRICING_TIERS, ROADMAP_STEPS, TESTIMONIALS,
};
use crate::engagement::{EngagementHandle, Intent, Interaction, InteractionEvent};

#[derive(Properties, PartialEq)]
pub struct HomeProps {
    pub engagement: EngagementHandle,
}

#[function_component(Home)]
pub fn home(props: &HomeProps) -> Html {
    let engagement = props.engagement.clone();

    // Scroll to top only on initial mount
    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                || ()
            },
            (),
        );
    }

    let profile = engagement.profile();
    let hero = hero_copy(profile.conversion_stage);
    let cta = cta_copy(engagement.recommended_action());

    html! {
        <div class="landing-page">
            <WelcomeBanner engagement={engagement.clone()} />

            <header class="hero">
                <div class="hero-content">
                    <p class="hero-eyebrow">{hero.eyebrow}</p>
                    <h1>{hero.headline}</h1>
                    <p class="hero-subtitle">{hero.subheadline}</p>
                    <div class="hero-cta-group">
                        <CtaButton
                            engagement={engagement.clone()}
                            section_id="hero"
                            target={cta.target}
                            label={cta.label}
                            intent={cta.intent}
                        />
                        <a href="#case-studies" class="faq-link">{"See client results"}</a>
                    </div>
                </div>
            </header>

            <TrackedSection id="domain-analysis" engagement={engagement.clone()} class={classes!("feature-block")}>
                <div class="feature-content">
                    <h2>{"Domain Analysis"}</h2>
                    <p>{"Before we recommend anything we map your market: who buys, why they switch, and where competitors leave room."}</p>
                    <ul class="feature-list">
                        <li>{"Segment and buyer mapping"}</li>
                        <li>{"Competitor positioning teardown"}</li>
                        <li>{"Demand signals from search, reviews and hiring data"}</li>
                    </ul>
                </div>
            </TrackedSection>

            <TrackedSection id="value-proposition" engagement={engagement.clone()} class={classes!("feature-block")}>
                <div class="feature-content">
                    <h2>{"Pay Down Your Growth Debt"}</h2>
                    <p>{"Years of quick wins leave behind broken funnels, stale messaging and channels nobody owns. We fix the foundations first so every later bet compounds."}</p>
                </div>
            </TrackedSection>

            <TrackedSection id="roi-calculator" engagement={engagement.clone()} class={classes!("feature-block")}>
                <RoiCalculator engagement={engagement.clone()} />
            </TrackedSection>

            <TrackedSection id="case-studies" engagement={engagement.clone()} class={classes!("case-studies")}>
                <h2>{"Case Studies"}</h2>
                <div class="case-grid">
                    { for CASE_STUDIES.iter().map(|study| html! {
                        <article class="case-card">
                            <span class="case-industry">{study.industry}</span>
                            <h3>{study.client}</h3>
                            <p>{study.challenge}</p>
                            <p class="case-result">{study.result}</p>
                        </article>
                    }) }
                </div>
                <button class="text-link" onclick={{
                    let engagement = engagement.clone();
                    Callback::from(move |_: MouseEvent| {
                        engagement.record_interaction(InteractionEvent::new("case-studies", Interaction::Complete));
                    })
                }}>
                    {"I've read enough, show me pricing"}
                </button>
            </TrackedSection>

            <TrackedSection id="testimonials" engagement={engagement.clone()} class={classes!("testimonials")} dismissible=true>
                <h2>{"What Clients Say"}</h2>
                { for TESTIMONIALS.iter().map(|t| html! {
                    <blockquote class="testimonial">
                        <p>{format!("“{}”", t.quote)}</p>
                        <footer>{format!("{}, {}", t.author, t.role)}</footer>
                    </blockquote>
                }) }
            </TrackedSection>

            <TrackedSection id="pricing" engagement={engagement.clone()} class={classes!("pricing")}>
                <h2>{"Pricing"}</h2>
                <div class="pricing-grid">
                    { for PRICING_TIERS.iter().map(|tier| html! {
                        <div class="pricing-card">
                            <h3>{tier.name}</h3>
                            <p class="price">{tier.price}</p>
                            <p>{tier.summary}</p>
                            <ul>
                                { for tier.features.iter().map(|f| html! { <li>{*f}</li> }) }
                            </ul>
                            <CtaButton
                                engagement={engagement.clone()}
                                section_id="pricing"
                                target="lead-capture"
                                label={format!("Talk to us about {}", tier.name)}
                                intent={Intent::High}
                                class={classes!("pricing-cta")}
                            />
                        </div>
                    }) }
                </div>
            </TrackedSection>

            <TrackedSection id="roadmap" engagement={engagement.clone()} class={classes!("roadmap")} dismissible=true>
                <h2>{"Your First 90 Days"}</h2>
                <ol class="steps-grid">
                    { for ROADMAP_STEPS.iter().map(|(when, what)| html! {
                        <li class="step">
                            <h3>{*when}</h3>
                            <p>{*what}</p>
                        </li>
                    }) }
                </ol>
            </TrackedSection>

            <TrackedSection id="lead-capture" engagement={engagement.clone()} class={classes!("footer-cta")}>
                <LeadForm engagement={engagement.clone()} />
            </TrackedSection>

            <footer class="site-footer">
                <p>{format!("Recommended for you: {}", content::section_title(cta.target))}</p>
            </footer>
        </div>
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="not-found">
            <h1>{"Page not found"}</h1>
            <a href="/">{"Back to the homepage"}</a>
        </div>
    }
}
