use chrono::NaiveDate;
use gloo_net::http::Request;
use serde::Deserialize;

use crate::config;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Report {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub thumbnail: String,
    #[serde(default)]
    pub featured: bool,
}

impl Report {
    /// `2024-03-01` -> `March 1, 2024`. Unparseable dates are shown as given.
    pub fn display_date(&self) -> String {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }

    pub fn download_href(&self) -> String {
        format!(
            "{}/api/download?slug={}",
            config::get_backend_url(),
            urlencoding::encode(&self.slug)
        )
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PortfolioCompany {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub company_url: String,
    pub logo: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Linkedin,
    Github,
    Email,
}

impl SocialPlatform {
    pub fn name(&self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Github => "github",
            SocialPlatform::Email => "email",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SocialPlatform::Email => "✉",
            _ => "↗",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub photo: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

/// Alphabetical by name, ignoring case.
pub fn sort_team(members: &[TeamMember]) -> Vec<TeamMember> {
    let mut sorted = members.to_vec();
    sorted.sort_by_cached_key(|m| m.name.to_lowercase());
    sorted
}

async fn fetch_list<T: for<'de> Deserialize<'de>>(path: &str) -> Result<Vec<T>, String> {
    let response = Request::get(&format!("{}{}", config::get_backend_url(), path))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("{} returned {}", path, response.status()));
    }
    response.json::<Vec<T>>().await.map_err(|e| e.to_string())
}

/// Newest first, as served by the backend.
pub async fn fetch_reports() -> Result<Vec<Report>, String> {
    fetch_list("/api/reports").await
}

/// In display order, as served by the backend.
pub async fn fetch_portfolio() -> Result<Vec<PortfolioCompany>, String> {
    fetch_list("/api/portfolio").await
}
