use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FundingApplication {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    pub deck_url: String,
}

/// Body of `POST /api/apply` and `POST /api/mailing-list`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub errors: FieldErrors,
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .rsplit_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
            .unwrap_or(false)
}

fn is_valid_deck_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

impl FundingApplication {
    /// Checks every field and returns all failures at once, keyed by field name.
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
        if !self.deck_url.trim().is_empty() && !is_valid_deck_url(&self.deck_url) {
            errors.insert("deck_url".into(), "Valid URL is required".into());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn has_deck(&self) -> bool {
        !self.deck_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FundingApplication {
        FundingApplication {
            name: "Ana Souza".into(),
            email: "ana@startup.io".into(),
            company: "Startup".into(),
            message: String::new(),
            deck_url: String::new(),
        }
    }

    #[test]
    fn complete_application_passes() {
        assert_eq!(valid().validate(), Ok(()));
        let with_deck = FundingApplication {
            deck_url: "https://docs.example.com/deck.pdf".into(),
            ..valid()
        };
        assert_eq!(with_deck.validate(), Ok(()));
        assert!(with_deck.has_deck());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = FundingApplication {
            name: "A".into(),
            email: "not-an-email".into(),
            company: "  ".into(),
            message: String::new(),
            deck_url: "ftp://deck".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["company", "deck_url", "email", "name"]
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn email_rule_matches_the_shared_case_table() {
        let cases: Vec<serde_json::Value> =
            serde_json::from_str(include_str!("../../testdata/email_cases.json")).unwrap();
        for case in cases {
            let email = case["email"].as_str().unwrap();
            assert_eq!(is_valid_email(email), case["valid"].as_bool().unwrap(), "{:?}", email);
        }
    }
}
