use serde_json::json;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::components::calendly_modal::CalendlyModal;
use crate::components::portfolio_grid::PortfolioGrid;
use crate::components::video_hero::VideoHero;
use crate::config;
use crate::Route;

const CONTACT_CALENDLY_URL: &str = "https://calendly.com/creador-ventures/30min";
const HERO_PREVIEW_SRC: &str = "/videos/reel-preview.mp4";
const HERO_VIMEO_ID: &str = "76979871";

#[function_component(Home)]
pub fn home() -> Html {
    let calendly_open = use_state(|| false);

    let open_calendly = {
        let calendly_open = calendly_open.clone();
        Callback::from(move |_: MouseEvent| {
            track_event(AnalyticsEvent::CtaClick, json!({ "cta_text": "Book a Call" }));
            calendly_open.set(true);
        })
    };
    let close_calendly = {
        let calendly_open = calendly_open.clone();
        Callback::from(move |_| calendly_open.set(false))
    };

    html! {
        <main class="home">
            <section id="hero" class="hero">
                <h1>{"Building value where others overlook"}</h1>
                <p>
                    {"Creador Ventures blends AI insight with local intuition to fund and accelerate bold founders in LATAM, Africa, Eastern Europe, and the Hispanic USA."}
                </p>
            </section>

            <VideoHero
                preview_video_src={HERO_PREVIEW_SRC}
                vimeo_id={HERO_VIMEO_ID}
                poster_src={Some("/images/reel-poster.jpg".to_string())}
            />

            <PortfolioGrid />

            <section id="cta" class="cta-section">
                <h2>{"Building something bold?"}</h2>
                <div class="cta-actions">
                    <Link<Route> to={Route::Apply} classes="cta-primary">
                        {"Apply for Funding"}
                    </Link<Route>>
                    <button class="cta-secondary" onclick={open_calendly}>
                        {"Book a Call"}
                    </button>
                </div>
            </section>

            <CalendlyModal
                is_open={*calendly_open}
                on_close={close_calendly}
                calendly_url={CONTACT_CALENDLY_URL}
                fallback_email={config::CONTACT_EMAIL}
                title="Book a Call"
            />
            <style>
                {r#"
                    .hero {
                        min-height: 70vh;
                        display: flex;
                        flex-direction: column;
                        justify-content: center;
                        padding: 0 1.5rem;
                        background: #111;
                        color: #fafafa;
                    }
                    .hero h1 {
                        max-width: 1200px;
                        font-size: clamp(56px, 8vw, 120px);
                        font-weight: 300;
                        line-height: 1.05;
                        letter-spacing: -0.02em;
                    }
                    .hero p {
                        max-width: 800px;
                        font-size: 20px;
                        line-height: 28px;
                    }
                    .cta-section {
                        padding: 6rem 1.5rem;
                        text-align: center;
                    }
                    .cta-actions {
                        display: flex;
                        justify-content: center;
                        gap: 1.5rem;
                        margin-top: 2rem;
                    }
                    .cta-primary,
                    .cta-secondary {
                        padding: 0.75rem 2rem;
                        font-size: 1.1rem;
                        border: 2px solid #111;
                        text-decoration: none;
                        cursor: pointer;
                    }
                    .cta-primary {
                        background: #111;
                        color: #fff;
                    }
                    .cta-secondary {
                        background: #fff;
                        color: #111;
                    }
                "#}
            </style>
        </main>
    }
}
