use contracts::shared::presentation::{ColumnKind, KpiTableModel};
use leptos::prelude::*;
use thaw::{Table, TableBody, TableCell, TableHeader, TableHeaderCell, TableRow};

use crate::shared::components::pagination_controls::PaginationControls;

/// Client-side paged KPI table. Hidden columns are already filtered out of `model`.
#[component]
pub fn KpiTable(model: KpiTableModel) -> impl IntoView {
    let pager = model.pager;
    let (page, set_page) = signal(0usize);
    let model = StoredValue::new(model);

    let header = model.with_value(|m| {
        m.columns
            .iter()
            .zip(&m.kinds)
            .map(|(column, kind)| {
                let class = match kind {
                    ColumnKind::Numeric => "kpi-table__num",
                    ColumnKind::Text => "kpi-table__text",
                };
                let column = column.clone();
                view! {
                    <TableHeaderCell>
                        <span class=class>{column}</span>
                    </TableHeaderCell>
                }
            })
            .collect_view()
    });

    let rows = move || {
        model.with_value(|m| {
            let kinds = m.kinds.clone();
            m.page_cells(page.get())
                .into_iter()
                .map(|cells| {
                    let row = cells
                        .into_iter()
                        .zip(kinds.iter().copied())
                        .map(|(text, kind)| {
                            let class = match kind {
                                ColumnKind::Numeric => "kpi-table__num",
                                ColumnKind::Text => "kpi-table__text",
                            };
                            view! {
                                <TableCell>
                                    <span class=class>{text}</span>
                                </TableCell>
                            }
                        })
                        .collect_view();
                    view! { <TableRow>{row}</TableRow> }
                })
                .collect_view()
        })
    };

    view! {
        <div class="kpi-table">
            <Table>
                <TableHeader>
                    <TableRow>{header}</TableRow>
                </TableHeader>
                <TableBody>{rows}</TableBody>
            </Table>
            {(pager.total_pages() > 1).then(|| view! {
                <PaginationControls
                    pager=pager
                    current_page=page
                    on_page_change=Callback::new(move |p| set_page.set(p))
                />
            })}
        </div>
    }
}
