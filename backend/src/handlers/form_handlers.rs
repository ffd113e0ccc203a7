use std::collections::BTreeMap;

use axum::{http::StatusCode, Json};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid email regex"));

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
pub struct FundingApplication {
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deck_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MailingListSignup {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl SubmitResponse {
    fn ok(message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: message.to_string(),
                errors: FieldErrors::new(),
            }),
        )
    }

    fn invalid(message: &str, errors: FieldErrors) -> (StatusCode, Json<Self>) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(Self {
                success: false,
                message: message.to_string(),
                errors,
            }),
        )
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

impl FundingApplication {
    fn deck_url(&self) -> Option<&str> {
        self.deck_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.insert("name".into(), "Name is required".into());
        }
        if !is_valid_email(&self.email) {
            errors.insert("email".into(), "Valid email is required".into());
        }
        if self.company.trim().is_empty() {
            errors.insert("company".into(), "Company name is required".into());
        }
        if let Some(deck) = self.deck_url() {
            if !is_http_url(deck) {
                errors.insert("deck_url".into(), "Valid URL is required".into());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub async fn submit_application(
    Json(application): Json<FundingApplication>,
) -> (StatusCode, Json<SubmitResponse>) {
    if let Err(errors) = application.validate() {
        tracing::warn!(
            layer = "email_queue",
            action = "funding_application_failed",
            fields = ?errors.keys().collect::<Vec<_>>(),
            "Rejected funding application"
        );
        return SubmitResponse::invalid(
            "Could not process your application. Please check the highlighted fields.",
            errors,
        );
    }

    tracing::info!(
        layer = "email_queue",
        action = "funding_application",
        recipient = %application.email.trim(),
        company = %application.company.trim(),
        has_deck = application.deck_url().is_some(),
        has_message = application.message.as_deref().is_some_and(|m| !m.trim().is_empty()),
        "Funding application received"
    );
    SubmitResponse::ok("Funding application received. We will contact you soon.")
}

pub async fn join_mailing_list(Json(signup): Json<MailingListSignup>) -> (StatusCode, Json<SubmitResponse>) {
    if !is_valid_email(&signup.email) {
        tracing::warn!(layer = "email_queue", action = "mailing_list_signup_failed", "Invalid email");
        let mut errors = FieldErrors::new();
        errors.insert("email".into(), "Valid email is required".into());
        return SubmitResponse::invalid("Could not add you to our mailing list. Please try again.", errors);
    }

    tracing::info!(
        layer = "email_queue",
        action = "mailing_list_signup",
        email = %signup.email.trim(),
        "Mailing list signup"
    );
    SubmitResponse::ok("You have been added to our mailing list.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post_json, state_with_assets};
    use serde_json::{json, Value};

    fn application(name: &str, email: &str, company: &str, deck: Option<&str>) -> FundingApplication {
        FundingApplication {
            name: name.to_string(),
            email: email.to_string(),
            company: company.to_string(),
            message: None,
            deck_url: deck.map(str::to_string),
        }
    }

    #[test]
    fn validation_rules() {
        assert!(application("Ana", "ana@startup.io", "Startup", None).validate().is_ok());
        assert!(application("Ana", "ana@startup.io", "Startup", Some("")).validate().is_ok());
        assert!(application("Ana", "ana@startup.io", "Startup", Some("https://x.io/deck")).validate().is_ok());

        let errors = application("A", "ana@", "", Some("javascript:alert(1)"))
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["deck_url"], "Valid URL is required");
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a.b+c@mail.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn email_regex_matches_the_shared_case_table() {
        let cases: Vec<Value> =
            serde_json::from_str(include_str!("../../../testdata/email_cases.json")).unwrap();
        for case in cases {
            let email = case["email"].as_str().unwrap();
            assert_eq!(is_valid_email(email), case["valid"].as_bool().unwrap(), "{:?}", email);
        }
    }

    #[tokio::test]
    async fn apply_endpoint_accepts_and_rejects() {
        let (state, _dir) = state_with_assets(&[]);
        let ok = json!({"name": "Ana", "email": "ana@startup.io", "company": "Startup"});
        let (status, body) = post_json(state.clone(), "/api/apply", ok).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("errors").is_none());

        let bad = json!({"name": "Ana", "email": "nope", "company": "Startup"});
        let (status, body) = post_json(state, "/api/apply", bad).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"]["email"], "Valid email is required");
    }

    #[tokio::test]
    async fn mailing_list_endpoint() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, _) = post_json(state.clone(), "/api/mailing-list", json!({"email": "x@y.org"})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = post_json(state, "/api/mailing-list", json!({"email": "xy.org"})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
