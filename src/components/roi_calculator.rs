use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::engagement::{EngagementHandle, Interaction, InteractionEvent};

pub const SECTION_ID: &str = "roi-calculator";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoiInputs {
    pub monthly_revenue: String,
    pub expected_lift_pct: String,
    pub engagement_cost: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoiEstimate {
    pub annual_gain: f64,
    pub roi_pct: f64,
    /// `None` when the lift never pays back the cost.
    pub payback_months: Option<f64>,
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | ' ' | '€' | '$' | '%')).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

impl RoiInputs {
    /// Share of the form filled in, reported as section progress. Tops out below
    /// 100 so only an actual calculation completes the section.
    pub fn progress_pct(&self) -> f64 {
        let filled = [&self.monthly_revenue, &self.expected_lift_pct, &self.engagement_cost]
            .iter()
            .filter(|v| parse_amount(v).is_some())
            .count();
        filled as f64 / 3.0 * 80.0
    }

    pub fn estimate(&self) -> Option<RoiEstimate> {
        let revenue = parse_amount(&self.monthly_revenue)?;
        let lift = parse_amount(&self.expected_lift_pct)?;
        let cost = parse_amount(&self.engagement_cost)?;
        if cost == 0.0 {
            return None;
        }

        let monthly_gain = revenue * lift / 100.0;
        let annual_gain = monthly_gain * 12.0;
        let payback_months = if monthly_gain > 0.0 {
            Some(cost / monthly_gain)
        } else {
            None
        };
        Some(RoiEstimate {
            annual_gain,
            roi_pct: (annual_gain - cost) / cost * 100.0,
            payback_months,
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct RoiCalculatorProps {
    pub engagement: EngagementHandle,
}

#[function_component(RoiCalculator)]
pub fn roi_calculator(props: &RoiCalculatorProps) -> Html {
    let inputs = use_state(RoiInputs::default);
    let estimate = use_state(|| None::<RoiEstimate>);
    let error = use_state(|| None::<String>);

    let on_field = |apply: fn(&mut RoiInputs, String)| {
        let inputs = inputs.clone();
        let engagement = props.engagement.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            let mut next = (*inputs).clone();
            apply(&mut next, value);
            engagement.record_interaction(InteractionEvent::new(
                SECTION_ID,
                Interaction::Progress {
                    percent: next.progress_pct(),
                },
            ));
            inputs.set(next);
        })
    };

    let calculate = {
        let inputs = inputs.clone();
        let estimate = estimate.clone();
        let error = error.clone();
        let engagement = props.engagement.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            match inputs.estimate() {
                Some(result) => {
                    engagement.record_interaction(InteractionEvent::new(SECTION_ID, Interaction::Complete));
                    error.set(None);
                    estimate.set(Some(result));
                }
                None => error.set(Some("Fill in all three numbers to see an estimate.".to_string())),
            }
        })
    };

    html! {
        <div class="roi-calculator">
            <h2>{"What is growth worth to you?"}</h2>
            <div class="roi-fields">
                <label>
                    {"Monthly revenue (€)"}
                    <input type="text" inputmode="decimal" value={inputs.monthly_revenue.clone()}
                        onchange={on_field(|i, v| i.monthly_revenue = v)} />
                </label>
                <label>
                    {"Expected lift (%)"}
                    <input type="text" inputmode="decimal" value={inputs.expected_lift_pct.clone()}
                        onchange={on_field(|i, v| i.expected_lift_pct = v)} />
                </label>
                <label>
                    {"Engagement cost (€)"}
                    <input type="text" inputmode="decimal" value={inputs.engagement_cost.clone()}
                        onchange={on_field(|i, v| i.engagement_cost = v)} />
                </label>
            </div>
            <button class="roi-calculate" onclick={calculate}>{"Calculate"}</button>
            {
                if let Some(message) = (*error).as_ref() {
                    html! { <p class="error-message">{message}</p> }
                } else {
                    html! {}
                }
            }
            {
                if let Some(result) = (*estimate).as_ref() {
                    html! {
                        <div class="roi-result">
                            <p>{format!("Projected annual gain: €{:.0}", result.annual_gain)}</p>
                            <p>{format!("Return on investment: {:.0}%", result.roi_pct)}</p>
                            <p>{
                                match result.payback_months {
                                    Some(months) => format!("Pays for itself in {:.1} months", months),
                                    None => "No payback at this lift".to_string(),
                                }
                            }</p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(revenue: &str, lift: &str, cost: &str) -> RoiInputs {
        RoiInputs {
            monthly_revenue: revenue.to_string(),
            expected_lift_pct: lift.to_string(),
            engagement_cost: cost.to_string(),
        }
    }

    #[test]
    fn test_estimate() {
        let result = inputs("100,000", "5%", "€18000").estimate().unwrap();
        assert_eq!(result.annual_gain, 60_000.0);
        assert!((result.roi_pct - 233.333).abs() < 0.01);
        assert_eq!(result.payback_months, Some(3.6));
    }

    #[test]
    fn test_zero_lift_never_pays_back() {
        let result = inputs("50000", "0", "6500").estimate().unwrap();
        assert_eq!(result.payback_months, None);
        assert_eq!(result.roi_pct, -100.0);
    }

    #[test]
    fn test_incomplete_or_invalid_inputs() {
        assert_eq!(inputs("50000", "", "6500").estimate(), None);
        assert_eq!(inputs("50000", "3", "0").estimate(), None);
        assert_eq!(inputs("-10", "3", "100").estimate(), None);
    }

    #[test]
    fn test_progress_stays_below_complete() {
        assert_eq!(RoiInputs::default().progress_pct(), 0.0);
        assert!((inputs("1", "", "").progress_pct() - 26.666).abs() < 0.01);
        assert_eq!(inputs("1", "2", "3").progress_pct(), 80.0);
    }
}
