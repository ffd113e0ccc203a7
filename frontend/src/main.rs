use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use web_sys::MouseEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod analytics;
mod calendly;
mod config;
mod content;
mod forms;
mod media {
    pub mod dom;
    pub mod gallery;
    pub mod guard;
    pub mod modal;
    pub mod preview;
    pub mod script_loader;
    pub mod services;
}
mod components {
    pub mod calendly_modal;
    pub mod events_archive;
    pub mod funding_form;
    pub mod media_modal;
    pub mod portfolio_grid;
    pub mod report_grid;
    pub mod team_grid;
    pub mod video_error;
    pub mod video_hero;
}
mod pages {
    pub mod apply;
    pub mod events;
    pub mod home;
    pub mod not_found;
    pub mod reports;
    pub mod team;
}

use media::services::PageServices;
use pages::{
    apply::Apply,
    events::Events,
    home::Home,
    not_found::NotFound,
    reports::Reports,
    team::Team,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/events")]
    Events,
    #[at("/reports")]
    Reports,
    #[at("/team")]
    Team,
    #[at("/apply")]
    Apply,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Events => {
            info!("Rendering Events page");
            html! { <Events /> }
        },
        Route::Reports => {
            info!("Rendering Reports page");
            html! { <Reports /> }
        },
        Route::Team => {
            info!("Rendering Team page");
            html! { <Team /> }
        },
        Route::Apply => {
            info!("Rendering Apply page");
            html! { <Apply /> }
        },
        Route::NotFound => {
            info!("Rendering 404 page");
            html! { <NotFound /> }
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = {
                let window = window.clone();
                Closure::wrap(Box::new(move || {
                    let scroll_top = window
                        .as_ref()
                        .and_then(|w| w.document())
                        .and_then(|d| d.document_element())
                        .map(|el| el.scroll_top())
                        .unwrap_or(0);
                    is_scrolled.set(scroll_top > 80);
                }) as Box<dyn FnMut()>)
            };

            if let Some(window) = &window {
                if let Err(e) = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref()) {
                    log::warn!("Failed to attach scroll listener: {:?}", e);
                }
            }

            move || {
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
        })
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Creador Ventures"}
                </Link<Route>>

                <button class="burger-menu" aria-label="Menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Events} classes="nav-link">
                            {"Events"}
                        </Link<Route>>
                    </div>
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Reports} classes="nav-link">
                            {"Reports"}
                        </Link<Route>>
                    </div>
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Team} classes="nav-link">
                            {"Team"}
                        </Link<Route>>
                    </div>
                    <div onclick={close_menu}>
                        <Link<Route> to={Route::Apply} classes="nav-apply-button">
                            {"Apply"}
                        </Link<Route>>
                    </div>
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    // One set of page services for the whole session: a single scroll lock
    // owner and one loader per third-party script.
    let services = use_state(PageServices::browser);

    html! {
        <ContextProvider<PageServices> context={(*services).clone()}>
            <BrowserRouter>
                <Nav />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<PageServices>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    analytics::init_ga4();

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
