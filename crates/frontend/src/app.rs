use crate::dashboards::d500_kpi::ui::KpiDashboard;
use leptos::prelude::*;
use thaw::{ConfigProvider, Theme};

#[component]
pub fn App() -> impl IntoView {
    let theme = RwSignal::new(Theme::light());

    view! {
        <ConfigProvider theme>
            <main class="app-main">
                <KpiDashboard />
            </main>
        </ConfigProvider>
    }
}
