use contracts::shared::presentation::Pager;
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Previous/next controls for a client-side paged table.
///
/// Boundaries are no-ops: the buttons disable and `Pager` clamps the target page.
#[component]
pub fn PaginationControls(
    pager: Pager,
    /// Current page (0-indexed)
    #[prop(into)]
    current_page: Signal<usize>,
    /// Called with the page to show next
    on_page_change: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(pager.prev(current_page.get()))
                disabled=move || !pager.has_prev(current_page.get())
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    format!(
                        "{} / {} ({} rows)",
                        pager.clamp(current_page.get()) + 1,
                        pager.total_pages().max(1),
                        pager.total_rows
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(pager.next(current_page.get()))
                disabled=move || !pager.has_next(current_page.get())
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
        </div>
    }
}
