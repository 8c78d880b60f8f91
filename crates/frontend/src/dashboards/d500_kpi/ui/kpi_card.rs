use contracts::shared::chart::{ChartKind, ChartSpec, KpiView};
use contracts::shared::kpi::{KpiMeta, TimeRange};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::Spinner;

use crate::dashboards::d500_kpi::api;
use crate::dashboards::d500_kpi::request_guard::RequestGuard;
use crate::shared::charts::{ChartSvg, KpiTable};
use crate::shared::components::card_animated::CardAnimated;
use crate::shared::components::stat_card::StatCard;
use crate::shared::icons::icon;

#[derive(Debug, Clone, PartialEq)]
enum CardState {
    Loading,
    /// Transport or HTTP failure; shown inline, distinct from "no data".
    Failed(String),
    Ready(KpiView),
}

fn chart_body(spec: ChartSpec) -> AnyView {
    match (spec.kind, spec.headline) {
        (ChartKind::Numeric, Some(headline)) => {
            view! { <StatCard headline=headline unit=spec.unit.clone() /> }.into_any()
        }
        (ChartKind::Delta, Some(headline)) => {
            let unit = spec.unit.clone();
            let sparkline = spec
                .series
                .iter()
                .any(|s| s.points.len() > 1)
                .then(|| view! { <ChartSvg spec=spec /> });
            view! {
                <StatCard headline=headline unit=unit />
                {sparkline}
            }
            .into_any()
        }
        _ => view! { <ChartSvg spec=spec /> }.into_any(),
    }
}

fn card_body(state: CardState) -> AnyView {
    match state {
        CardState::Loading => view! {
            <div class="kpi-card__loading">
                <Spinner />
            </div>
        }
        .into_any(),
        CardState::Failed(err) => view! {
            <div class="kpi-card__error">
                {icon("alert")}
                <span>{err}</span>
            </div>
        }
        .into_any(),
        CardState::Ready(KpiView::Empty) => view! {
            <div class="kpi-card__empty">"No data for this period"</div>
        }
        .into_any(),
        CardState::Ready(KpiView::Unsupported(variant)) => {
            let text = if variant.is_empty() {
                "Unsupported chart type".to_string()
            } else {
                format!("Unsupported chart type: {}", variant)
            };
            view! { <div class="kpi-card__empty">{text}</div> }.into_any()
        }
        CardState::Ready(KpiView::Table(model)) => view! { <KpiTable model=model /> }.into_any(),
        CardState::Ready(KpiView::Chart(spec)) => chart_body(spec),
    }
}

/// One KPI tile. Refetches on every range change; only the latest response is applied.
#[component]
pub fn KpiCard(
    meta: KpiMeta,
    #[prop(into)] range: Signal<TimeRange>,
    #[prop(optional)] delay_ms: u32,
) -> impl IntoView {
    let (state, set_state) = signal(CardState::Loading);
    let guard = RequestGuard::new();
    let kpi_key = meta.kpi_key.clone();

    let cleanup_guard = guard.clone();
    on_cleanup(move || cleanup_guard.cancel());

    Effect::new(move |_| {
        let range = range.get();
        let ticket = guard.begin();
        let guard = guard.clone();
        let kpi_key = kpi_key.clone();
        set_state.set(CardState::Loading);

        spawn_local(async move {
            let result = api::fetch_payload(&kpi_key, range).await;
            if !guard.is_current(ticket) {
                log::debug!("Dropping stale response for {} ({})", kpi_key, range.as_str());
                return;
            }
            match result {
                Ok(payload) => {
                    set_state.set(CardState::Ready(KpiView::from_payload(payload.as_ref())));
                }
                Err(e) => {
                    log::error!("Failed to load KPI {}: {}", kpi_key, e);
                    set_state.set(CardState::Failed(e));
                }
            }
        });
    });

    let title = meta.display_name().to_string();
    let axis_hint = meta.y_axis.clone();

    view! {
        <CardAnimated delay_ms=delay_ms class="kpi-card">
            <div class="kpi-card__header">
                <span class="kpi-card__title">{title}</span>
                {axis_hint.map(|hint| view! { <span class="kpi-card__hint">{hint}</span> })}
            </div>
            <div class="kpi-card__body">{move || card_body(state.get())}</div>
        </CardAnimated>
    }
}
