use yew::prelude::*;

use crate::components::report_grid::ReportGrid;

#[function_component(Reports)]
pub fn reports() -> Html {
    html! {
        <main class="reports-page">
            <ReportGrid />
        </main>
    }
}
