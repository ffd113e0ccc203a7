use std::sync::Arc;

use axum::{extract::State, Json};

use crate::content::{PortfolioCompany, Report};
use crate::AppState;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_reports(State(state): State<Arc<AppState>>) -> Json<Vec<Report>> {
    Json(state.content.reports().to_vec())
}

pub async fn list_portfolio(State(state): State<Arc<AppState>>) -> Json<Vec<PortfolioCompany>> {
    Json(state.content.portfolio().to_vec())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, state_with_assets};
    use axum::http::StatusCode;
    use serde_json::Value;

    #[tokio::test]
    async fn reports_are_listed_newest_first() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, _, body) = get(state, "/api/reports").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        let slugs: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, ["latam-2024", "africa-2023"]);
    }

    #[tokio::test]
    async fn portfolio_and_health() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, _, body) = get(state.clone(), "/api/portfolio").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["slug"], "the-hub");

        let (status, _, body) = get(state, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"OK");
    }
}
