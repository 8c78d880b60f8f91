use contracts::shared::kpi::{KpiMeta, TimeRange};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Spinner};

use super::kpi_card::KpiCard;
use crate::dashboards::d500_kpi::api;
use crate::shared::icons::icon;

/// Stagger step between neighbouring cards.
const CARD_DELAY_STEP_MS: u32 = 60;

/// KPI grid with a shared time-range selector.
#[component]
pub fn KpiDashboard(
    /// Show only KPIs owned by this dashboard
    #[prop(optional, into)]
    dashboard: Option<String>,
) -> impl IntoView {
    let (range, set_range) = signal(TimeRange::default());
    let (catalog, set_catalog) = signal(Vec::<KpiMeta>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);

    Effect::new(move |_| {
        let dashboard = dashboard.clone();
        spawn_local(async move {
            set_loading.set(true);
            set_error.set(None);
            match api::fetch_catalog(dashboard.as_deref()).await {
                Ok(response) => {
                    log::info!("Loaded {} KPI definitions", response.kpis.len());
                    set_catalog.set(response.kpis);
                }
                Err(e) => {
                    log::error!("Failed to load KPI catalog: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    });

    let range_buttons = TimeRange::ALL
        .into_iter()
        .map(|r| {
            let appearance = Signal::derive(move || {
                if range.get() == r {
                    ButtonAppearance::Primary
                } else {
                    ButtonAppearance::Secondary
                }
            });
            view! {
                <Button appearance=appearance on_click=move |_| set_range.set(r)>
                    {r.label()}
                </Button>
            }
        })
        .collect_view();

    let grid = move || {
        if loading.get() {
            return view! {
                <div class="kpi-dashboard__loading">
                    <Spinner />
                </div>
            }
            .into_any();
        }
        if let Some(err) = error.get() {
            return view! {
                <div class="kpi-dashboard__error">
                    {icon("alert")}
                    <span>{err}</span>
                </div>
            }
            .into_any();
        }
        let kpis = catalog.get();
        if kpis.is_empty() {
            return view! { <div class="kpi-dashboard__empty">"No KPIs configured"</div> }.into_any();
        }
        kpis.into_iter()
            .enumerate()
            .map(|(i, meta)| {
                let delay_ms = i as u32 * CARD_DELAY_STEP_MS;
                view! { <KpiCard meta=meta range=range delay_ms=delay_ms /> }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div id="d500_kpi--dashboard" class="kpi-dashboard">
            <div class="kpi-dashboard__toolbar">
                <span class="kpi-dashboard__title">
                    {icon("plane")}
                    "Operations KPIs"
                </span>
                <div class="kpi-dashboard__ranges">{range_buttons}</div>
            </div>
            <div class="kpi-dashboard__grid">{grid}</div>
        </div>
    }
}
