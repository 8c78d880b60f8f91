//! Thaw `Card` with a staggered appear animation (`@keyframes card-appear`).

use leptos::prelude::*;
use thaw::Card;

/// Card for the KPI grid; `delay_ms` staggers neighbouring cards.
#[component]
pub fn CardAnimated(
    #[prop(optional)] delay_ms: u32,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let style = format!("animation: card-appear 0.28s ease-out {}ms both;", delay_ms);
    view! {
        <Card attr:style=style>
            <div class=class>{children()}</div>
        </Card>
    }
}
