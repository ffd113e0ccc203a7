use gloo_net::http::Request;
use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::config;
use crate::forms::{FieldErrors, FundingApplication, SubmitResponse};

const SUBMIT_FAILED: &str = "There was an error submitting your application. Please try again.";

#[derive(Clone, PartialEq)]
enum Field {
    Name,
    Email,
    Company,
    Message,
    DeckUrl,
}

async fn submit(application: FundingApplication) -> Result<SubmitResponse, String> {
    let response = Request::post(&format!("{}/api/apply", config::get_backend_url()))
        .json(&application)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    // 422 still carries a SubmitResponse with per-field errors.
    response.json::<SubmitResponse>().await.map_err(|e| e.to_string())
}

#[function_component(FundingForm)]
pub fn funding_form() -> Html {
    let form = use_state(FundingApplication::default);
    let errors = use_state(FieldErrors::new);
    let is_submitting = use_state(|| false);
    let result = use_state(|| None::<SubmitResponse>);

    let on_field = |field: Field| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let value = if field == Field::Message {
                e.target_unchecked_into::<HtmlTextAreaElement>().value()
            } else {
                e.target_unchecked_into::<HtmlInputElement>().value()
            };
            let mut next = (*form).clone();
            match field {
                Field::Name => next.name = value,
                Field::Email => next.email = value,
                Field::Company => next.company = value,
                Field::Message => next.message = value,
                Field::DeckUrl => next.deck_url = value,
            }
            form.set(next);
        })
    };

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let is_submitting = is_submitting.clone();
        let result = result.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_submitting {
                return;
            }
            let application = (*form).clone();
            if let Err(field_errors) = application.validate() {
                errors.set(field_errors);
                return;
            }
            errors.set(FieldErrors::new());
            is_submitting.set(true);

            let form = form.clone();
            let errors = errors.clone();
            let is_submitting = is_submitting.clone();
            let result = result.clone();
            spawn_local(async move {
                let company = application.company.clone();
                let has_deck = application.has_deck();
                match submit(application).await {
                    Ok(response) if response.success => {
                        track_event(
                            AnalyticsEvent::FundingApplySubmit,
                            json!({ "company": company, "has_deck": has_deck }),
                        );
                        form.set(FundingApplication::default());
                        result.set(Some(response));
                    }
                    Ok(response) => {
                        log::warn!("Application rejected: {}", response.message);
                        errors.set(response.errors.clone());
                        result.set(Some(response));
                    }
                    Err(e) => {
                        log::error!("Form submission error: {}", e);
                        result.set(Some(SubmitResponse {
                            success: false,
                            message: SUBMIT_FAILED.to_string(),
                            errors: FieldErrors::new(),
                        }));
                    }
                }
                is_submitting.set(false);
            });
        })
    };

    let field_error = |name: &str| -> Html {
        match errors.get(name) {
            Some(message) => html! { <p class="form-error">{ message }</p> },
            None => html! {},
        }
    };

    html! {
        <section class="form-section">
            <h2>{"Apply for Funding"}</h2>

            if let Some(response) = &*result {
                <div class={classes!("form-result", if response.success { "success" } else { "failure" })}>
                    { &response.message }
                </div>
            }

            <form onsubmit={onsubmit} novalidate=true>
                <label for="name">{"Name"}</label>
                <input id="name" type="text" value={form.name.clone()} oninput={on_field(Field::Name)} />
                { field_error("name") }

                <label for="email">{"Email"}</label>
                <input id="email" type="email" value={form.email.clone()} oninput={on_field(Field::Email)} />
                { field_error("email") }

                <label for="company">{"Company"}</label>
                <input id="company" type="text" value={form.company.clone()} oninput={on_field(Field::Company)} />
                { field_error("company") }

                <label for="message">{"Message (optional)"}</label>
                <textarea id="message" rows="4" value={form.message.clone()} oninput={on_field(Field::Message)} />

                <label for="deck_url">{"Pitch deck URL (optional)"}</label>
                <input id="deck_url" type="url" value={form.deck_url.clone()} oninput={on_field(Field::DeckUrl)} />
                { field_error("deck_url") }

                <button type="submit" disabled={*is_submitting}>
                    { if *is_submitting { "Submitting..." } else { "Submit Application" } }
                </button>
            </form>
            <style>
                {r#"
                    .form-section {
                        max-width: 800px;
                        margin: 0 auto;
                        padding: 6rem 1.5rem;
                    }
                    .form-section h2 {
                        font-weight: 300;
                        font-size: 3rem;
                        text-align: center;
                        margin-bottom: 3rem;
                    }
                    .form-section label {
                        display: block;
                        margin: 1.5rem 0 0.5rem;
                    }
                    .form-section input,
                    .form-section textarea {
                        width: 100%;
                        padding: 0.75rem;
                        border: 1px solid #111;
                        font-size: 1rem;
                    }
                    .form-section button {
                        margin-top: 2rem;
                        padding: 0.75rem 2rem;
                        border: 2px solid #111;
                        background: #111;
                        color: #fff;
                        cursor: pointer;
                    }
                    .form-section button:disabled {
                        opacity: 0.6;
                        cursor: default;
                    }
                    .form-error {
                        color: #b91c1c;
                        margin-top: 0.25rem;
                    }
                    .form-result {
                        padding: 1rem;
                        margin-bottom: 2rem;
                        border: 1px solid currentColor;
                    }
                    .form-result.success {
                        color: #166534;
                    }
                    .form-result.failure {
                        color: #b91c1c;
                    }
                "#}
            </style>
        </section>
    }
}
