use yew::prelude::*;

use crate::components::funding_form::FundingForm;

#[function_component(Apply)]
pub fn apply() -> Html {
    html! {
        <main class="apply-page">
            <FundingForm />
        </main>
    }
}
