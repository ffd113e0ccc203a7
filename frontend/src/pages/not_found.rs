use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <main class="not-found">
            <h1>{"404"}</h1>
            <p>{"The page you are looking for does not exist."}</p>
            <Link<Route> to={Route::Home} classes="arrow-link">{"Back to home"}</Link<Route>>
            <style>
                {r#"
                    .not-found {
                        min-height: 60vh;
                        display: flex;
                        flex-direction: column;
                        align-items: center;
                        justify-content: center;
                        gap: 1rem;
                    }
                    .not-found h1 {
                        font-size: 96px;
                        font-weight: 300;
                    }
                "#}
            </style>
        </main>
    }
}
