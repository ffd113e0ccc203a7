use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use url::Url;

use crate::analytics;
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("asset path {0:?} escapes the asset root")]
    InvalidPath(String),
    #[error("asset url could not be built: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// Where report files live.
#[derive(Clone, Debug)]
pub enum AssetSource {
    Remote { client: reqwest::Client, base: Url },
    Local { dir: PathBuf },
}

impl AssetSource {
    /// Opens `path` (as written in the catalog) as a streaming response body.
    pub async fn open(&self, path: &str) -> Result<Body, DownloadError> {
        match self {
            AssetSource::Remote { client, base } => {
                let url = base.join(path)?;
                let response = client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(DownloadError::Status(response.status()));
                }
                Ok(Body::from_stream(response.bytes_stream()))
            }
            AssetSource::Local { dir } => {
                let file = tokio::fs::File::open(dir.join(relative_asset_path(path)?)).await?;
                Ok(Body::from_stream(ReaderStream::new(file)))
            }
        }
    }
}

fn relative_asset_path(path: &str) -> Result<PathBuf, DownloadError> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || relative.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(DownloadError::InvalidPath(path.to_string()));
    }
    Ok(relative.to_path_buf())
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    slug: Option<String>,
}

pub async fn download_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!(layer = "api_route", route = "/api/download", error = %rejection, "Malformed download query");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid download request"})),
        )
    })?;
    let slug = match query.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No report slug provided"})),
            ));
        }
    };

    let Some(report) = state.content.report_by_slug(&slug) else {
        tracing::warn!(layer = "api_route", route = "/api/download", slug = %slug, "Report not found");
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Report not found"})),
        ));
    };

    let body = state.assets.open(&report.pdf_url).await.map_err(|e| {
        tracing::error!(
            layer = "download",
            action = "report_download_failed",
            report = %report.title,
            error = %e,
            "Failed to download report"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to download the requested file"})),
        )
    })?;

    let file_name = report.download_filename();
    let mime = mime_guess::from_path(&file_name)
        .first_raw()
        .unwrap_or("application/pdf");

    analytics::track_event("report_download", json!({ "report_name": report.title }));
    tracing::info!(layer = "download", action = "report_download", report = %report.title, "Report downloaded");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
        )
        .body(body)
        .map_err(|e| {
            tracing::error!("Failed to build download response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to download the requested file"})),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get, state_with_assets};

    #[test]
    fn relative_paths_stay_inside_the_root() {
        assert_eq!(relative_asset_path("/reports/a.pdf").unwrap(), PathBuf::from("reports/a.pdf"));
        assert!(relative_asset_path("/reports/../../etc/passwd").is_err());
        assert!(relative_asset_path("/").is_err());
    }

    #[tokio::test]
    async fn known_slug_streams_the_file_as_attachment() {
        let (state, _dir) = state_with_assets(&[("reports/latam-2024.pdf", &b"%PDF-1.7 test"[..])]);
        let (status, headers, body) = get(state, "/api/download?slug=latam-2024").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"latam-2024.pdf\""
        );
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(&body[..], b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn unknown_slug_is_404_with_error() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, _, body) = get(state, "/api/download?slug=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Report not found");
    }

    #[tokio::test]
    async fn missing_or_blank_slug_is_400() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, _, body) = get(state.clone(), "/api/download").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].is_string());

        let (status, _, _) = get(state, "/api/download?slug=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn repeated_slug_is_a_json_400() {
        let (state, _dir) = state_with_assets(&[]);
        let (status, headers, body) = get(state, "/api/download?slug=latam-2024&slug=africa-2023").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid download request");
    }

    #[tokio::test]
    async fn large_local_file_streams_intact() {
        let pdf: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        let (state, _dir) = state_with_assets(&[("reports/latam-2024.pdf", &pdf[..])]);
        let (status, _, body) = get(state, "/api/download?slug=latam-2024").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), pdf.len());
        assert_eq!(&body[..], &pdf[..]);
    }

    #[tokio::test]
    async fn unreadable_file_is_500() {
        // Catalog entry exists but the file was never written.
        let (state, _dir) = state_with_assets(&[]);
        let (status, _, body) = get(state, "/api/download?slug=latam-2024").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to download the requested file");
    }
}
