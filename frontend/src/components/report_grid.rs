use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::content::{fetch_reports, Report};

#[function_component(ReportGrid)]
pub fn report_grid() -> Html {
    let reports = use_state(|| None::<Vec<Report>>);
    let error = use_state(|| None::<String>);

    {
        let reports = reports.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match fetch_reports().await {
                        Ok(list) => reports.set(Some(list)),
                        Err(e) => {
                            log::error!("Failed to load reports: {}", e);
                            error.set(Some("Reports are unavailable right now.".to_string()));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let body = match (&*reports, &*error) {
        (_, Some(message)) => html! { <p class="report-grid-status">{ message }</p> },
        (None, None) => html! { <p class="report-grid-status">{"Loading reports..."}</p> },
        (Some(list), None) if list.is_empty() => {
            html! { <p class="report-grid-status">{"No reports published yet."}</p> }
        }
        (Some(list), None) => list
            .iter()
            .map(|report| {
                let onclick = {
                    let title = report.title.clone();
                    Callback::from(move |_: MouseEvent| {
                        track_event(AnalyticsEvent::ReportDownload, json!({ "report_name": title }));
                    })
                };
                html! {
                    <div key={report.slug.clone()} class="news-strip">
                        <div class="news-strip-image">
                            <img src={report.thumbnail.clone()} alt={format!("{} cover", report.title)} />
                        </div>
                        <div class="news-strip-content">
                            <p class="news-strip-date">{ report.display_date() }</p>
                            <h3 class="news-strip-title">{ &report.title }</h3>
                            <p>{ &report.description }</p>
                            <a class="arrow-link" href={report.download_href()} onclick={onclick}>
                                {"Download PDF"}
                            </a>
                        </div>
                    </div>
                }
            })
            .collect::<Html>(),
    };

    html! {
        <section class="report-grid">
            <h2>{"Research Reports"}</h2>
            <p class="report-grid-intro">
                {"Free public papers build reach and trust. Custom work for clients sits behind private briefings. Browse and download the latest editions below."}
            </p>
            <div class="report-grid-list">{ body }</div>
            <style>
                {r#"
                    .report-grid {
                        max-width: 1440px;
                        margin: 0 auto;
                        padding: 5rem 1.5rem;
                    }
                    .report-grid h2 {
                        font-size: 48px;
                        font-weight: 300;
                        margin-bottom: 2rem;
                    }
                    .report-grid-intro {
                        max-width: 800px;
                        margin-bottom: 4rem;
                        font-size: 18px;
                    }
                    .news-strip {
                        display: flex;
                        flex-wrap: wrap;
                        gap: 1.5rem;
                        padding: 2.5rem 0;
                        border-top: 1px solid #111;
                        border-bottom: 1px solid #111;
                    }
                    .news-strip-image img {
                        width: 320px;
                        height: 320px;
                        object-fit: cover;
                        border: 1px solid #111;
                    }
                    .news-strip-date {
                        color: #666;
                        margin-bottom: 1rem;
                    }
                    .news-strip-title {
                        font-size: 32px;
                        font-weight: 300;
                        margin-bottom: 1.5rem;
                    }
                    .arrow-link {
                        font-size: 18px;
                        font-weight: 500;
                        color: inherit;
                    }
                "#}
            </style>
        </section>
    }
}
