use contracts::shared::chart::Headline;
use contracts::shared::presentation::format_value;
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Arrow icon and modifier class for a change in percent; changes under half a point read as flat.
fn change_style(pct: f64) -> (&'static str, &'static str) {
    if pct > 0.5 {
        ("trending-up", "stat-card__change stat-card__change--up")
    } else if pct < -0.5 {
        ("trending-down", "stat-card__change stat-card__change--down")
    } else {
        ("minus", "stat-card__change stat-card__change--flat")
    }
}

/// Headline figure for numeric and delta KPIs.
#[component]
pub fn StatCard(
    headline: Headline,
    /// Suffix for the formatted value and the previous value
    unit: Option<String>,
) -> impl IntoView {
    let value_text = format_value(headline.value, unit.as_deref());

    let change_view = headline.delta_percent.map(|pct| {
        let (icon_name, cls) = change_style(pct);
        view! {
            <span class=cls>
                {icon(icon_name)}
                {format!("{:.1}%", pct.abs())}
            </span>
        }
    });

    let previous_view = headline.previous.map(|prev| {
        view! {
            <div class="stat-card__subtitle">
                {format!("previous: {}", format_value(prev, unit.as_deref()))}
            </div>
        }
    });

    view! {
        <div class="stat-card">
            <div class="stat-card__value">
                {value_text}
                {change_view}
            </div>
            {previous_view}
        </div>
    }
}
