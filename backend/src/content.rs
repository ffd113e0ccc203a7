use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("report {slug} has an invalid date {date:?}")]
    InvalidDate { slug: String, date: String },
    #[error("duplicate slug {0}")]
    DuplicateSlug(String),
}

fn default_order() -> i32 {
    999
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Report {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub pdf_url: String,
    pub thumbnail: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_order")]
    pub order: i32,
}

impl Report {
    /// Last path segment of the PDF URL, or `<slug>.pdf`.
    pub fn download_filename(&self) -> String {
        self.pdf_url
            .split('/')
            .last()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.pdf", self.slug))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PortfolioCompany {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub company_url: String,
    pub logo: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_order")]
    pub order: i32,
}

#[derive(Deserialize)]
struct Catalog {
    #[serde(default)]
    reports: Vec<Report>,
    #[serde(default)]
    portfolio: Vec<PortfolioCompany>,
}

/// Read-only content, validated and sorted once at startup.
#[derive(Clone, Debug, Default)]
pub struct ContentSource {
    reports: Vec<Report>,
    portfolio: Vec<PortfolioCompany>,
}

impl ContentSource {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let Catalog { mut reports, mut portfolio } = serde_json::from_str(raw)?;

        let mut seen = HashSet::new();
        for report in &reports {
            if !seen.insert(report.slug.clone()) {
                return Err(ContentError::DuplicateSlug(report.slug.clone()));
            }
            NaiveDate::parse_from_str(&report.date, "%Y-%m-%d").map_err(|_| ContentError::InvalidDate {
                slug: report.slug.clone(),
                date: report.date.clone(),
            })?;
        }
        reports.sort_by_cached_key(|r| Reverse(NaiveDate::parse_from_str(&r.date, "%Y-%m-%d").ok()));
        portfolio.sort_by_key(|company| company.order);

        Ok(Self { reports, portfolio })
    }

    /// Newest first.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Ascending `order`.
    pub fn portfolio(&self) -> &[PortfolioCompany] {
        &self.portfolio
    }

    pub fn report_by_slug(&self, slug: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "reports": [
            {"slug": "old", "title": "Old", "description": "", "date": "2023-01-10",
             "pdf_url": "/reports/old-edition.pdf", "thumbnail": "/t/old.jpg"},
            {"slug": "new", "title": "New", "description": "", "date": "2024-06-01",
             "pdf_url": "/reports/", "thumbnail": "/t/new.jpg", "featured": true}
        ],
        "portfolio": [
            {"slug": "b", "title": "B", "description": "", "company_url": "https://b.example",
             "logo": "/l/b.svg", "order": 2},
            {"slug": "z", "title": "Z", "description": "", "company_url": "https://z.example",
             "logo": "/l/z.svg"},
            {"slug": "a", "title": "A", "description": "", "company_url": "https://a.example",
             "logo": "/l/a.svg", "order": 1}
        ]
    }"#;

    #[test]
    fn sorts_reports_and_portfolio() {
        let content = ContentSource::from_json(CATALOG).unwrap();
        let slugs: Vec<_> = content.reports().iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old"]);
        let order: Vec<_> = content.portfolio().iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(order, ["a", "b", "z"]);
        assert_eq!(content.portfolio()[2].order, 999);
    }

    #[test]
    fn filename_falls_back_to_slug() {
        let content = ContentSource::from_json(CATALOG).unwrap();
        assert_eq!(content.report_by_slug("old").unwrap().download_filename(), "old-edition.pdf");
        assert_eq!(content.report_by_slug("new").unwrap().download_filename(), "new.pdf");
        assert!(content.report_by_slug("missing").is_none());
    }

    #[test]
    fn rejects_bad_dates_and_duplicates() {
        let bad_date = r#"{"reports": [{"slug": "x", "title": "X", "description": "",
            "date": "June 2024", "pdf_url": "/x.pdf", "thumbnail": "/x.jpg"}]}"#;
        assert!(matches!(
            ContentSource::from_json(bad_date),
            Err(ContentError::InvalidDate { .. })
        ));

        let duplicate = r#"{"reports": [
            {"slug": "x", "title": "X", "description": "", "date": "2024-01-01", "pdf_url": "/x.pdf", "thumbnail": "/x.jpg"},
            {"slug": "x", "title": "X", "description": "", "date": "2024-01-02", "pdf_url": "/x.pdf", "thumbnail": "/x.jpg"}
        ]}"#;
        assert!(matches!(
            ContentSource::from_json(duplicate),
            Err(ContentError::DuplicateSlug(slug)) if slug == "x"
        ));
    }
}
