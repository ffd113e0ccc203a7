use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::content::{fetch_portfolio, PortfolioCompany};

fn open_company(company: &PortfolioCompany) {
    track_event(
        AnalyticsEvent::CtaClick,
        json!({
            "cta_text": format!("Portfolio: {}", company.title),
            "destination": company.company_url,
        }),
    );
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.open_with_url_and_target_and_features(&company.company_url, "_blank", "noopener,noreferrer") {
            log::warn!("Failed to open {}: {:?}", company.company_url, e);
        }
    }
}

#[function_component(PortfolioGrid)]
pub fn portfolio_grid() -> Html {
    let companies = use_state(Vec::<PortfolioCompany>::new);

    {
        let companies = companies.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match fetch_portfolio().await {
                        Ok(list) => companies.set(list),
                        Err(e) => log::error!("Failed to load portfolio: {}", e),
                    }
                });
                || ()
            },
            (),
        );
    }

    html! {
        <section class="portfolio-grid">
            <h2>{"We give start-ups an"}<br />{"unfair advantage"}</h2>
            <div class="portfolio-grid-logos">
                { for companies.iter().map(|company| {
                    let onclick = {
                        let company = company.clone();
                        Callback::from(move |_: MouseEvent| open_company(&company))
                    };
                    html! {
                        <button key={company.slug.clone()} class="portfolio-logo" onclick={onclick} title={company.description.clone()}>
                            <img src={company.logo.clone()} alt={format!("{} logo", company.title)} />
                        </button>
                    }
                }) }
            </div>
            <style>
                {r#"
                    .portfolio-grid {
                        max-width: 1440px;
                        margin: 0 auto;
                        padding: 5rem 1.5rem;
                    }
                    .portfolio-grid h2 {
                        text-align: center;
                        font-size: clamp(56px, 8vw, 120px);
                        font-weight: 300;
                        line-height: 1.05;
                        margin-bottom: 5rem;
                    }
                    .portfolio-grid-logos {
                        display: grid;
                        grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
                        gap: 3rem;
                    }
                    .portfolio-logo {
                        height: 60px;
                        border: none;
                        background: none;
                        cursor: pointer;
                        transition: transform 0.2s;
                    }
                    .portfolio-logo:hover {
                        transform: translateY(-8px);
                    }
                    .portfolio-logo img {
                        max-width: 100%;
                        max-height: 100%;
                        object-fit: contain;
                    }
                "#}
            </style>
        </section>
    }
}
