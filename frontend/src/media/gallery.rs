use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::config;

/// Raw gallery entry as it comes from page data, before validation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub preview_image: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub vimeo_id: Option<String>,
    #[serde(default)]
    pub preview_video_src: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VimeoId(u64);

impl VimeoId {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(VimeoId)
    }

    pub fn player_url(&self) -> String {
        format!(
            "{}/{}?badge=0&autopause=0&player_id=0&app_id=58479&autoplay=1",
            config::VIMEO_PLAYER_BASE,
            self.0
        )
    }
}

impl fmt::Display for VimeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What selecting a tile plays at full length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewKind {
    /// No full-length media. The tile can still toggle its preview clip inline.
    Image,
    /// A self-hosted recording shown in the modal with a plain `<video>`.
    LocalVideo { src: String },
    /// A recording on the hosted player, embedded in the modal as an iframe.
    ExternalVideo { id: VimeoId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Padding-bottom percentage that keeps a box at this ratio.
    pub fn padding_percent(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width) * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    #[error("item {id} has neither a preview image nor a preview video")]
    MissingPreview { id: String },
    #[error("item {id} has an invalid aspect ratio {width}x{height}")]
    InvalidAspect { id: String, width: u32, height: u32 },
    #[error("item {id} has a non-numeric vimeo id {raw:?}")]
    InvalidVimeoId { id: String, raw: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub preview_image: Option<String>,
    pub preview_video: Option<String>,
    pub kind: PreviewKind,
    pub aspect: AspectRatio,
    sort_date: Option<NaiveDate>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl GalleryItem {
    pub fn new(record: EventRecord) -> Result<Self, GalleryError> {
        let EventRecord {
            id,
            title,
            date,
            preview_image,
            video_url,
            vimeo_id,
            preview_video_src,
            width,
            height,
        } = record;

        let preview_image = non_empty(preview_image);
        let preview_video = non_empty(preview_video_src);
        if preview_image.is_none() && preview_video.is_none() {
            return Err(GalleryError::MissingPreview { id });
        }
        if width == 0 || height == 0 {
            return Err(GalleryError::InvalidAspect { id, width, height });
        }

        let kind = match (non_empty(vimeo_id), non_empty(video_url)) {
            (Some(raw), _) => match VimeoId::parse(&raw) {
                Some(vimeo) => PreviewKind::ExternalVideo { id: vimeo },
                None => return Err(GalleryError::InvalidVimeoId { id, raw }),
            },
            (None, Some(src)) => PreviewKind::LocalVideo { src },
            (None, None) => PreviewKind::Image,
        };

        let sort_date = parse_display_date(&date);

        Ok(Self {
            id,
            title,
            date,
            preview_image,
            preview_video,
            kind,
            aspect: AspectRatio { width, height },
            sort_date,
        })
    }

    pub fn opens_modal(&self) -> bool {
        !matches!(self.kind, PreviewKind::Image)
    }

    pub fn needs_player_script(&self) -> bool {
        matches!(self.kind, PreviewKind::ExternalVideo { .. })
    }

    pub fn is_interactive(&self) -> bool {
        self.opens_modal() || self.preview_video.is_some()
    }
}

fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%B %d, %Y", "%Y-%m-%d", "%b %d, %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Newest first. Items whose date cannot be parsed keep their relative order at the end.
pub fn sort_newest_first(items: &mut [GalleryItem]) {
    items.sort_by(|a, b| match (a.sort_date, b.sort_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Builds the gallery from raw records, skipping (and logging) invalid entries
/// and repeated ids. The first record with a given id wins.
pub fn build_gallery(records: &[EventRecord]) -> Vec<GalleryItem> {
    let mut seen = HashSet::new();
    let mut items: Vec<GalleryItem> = records
        .iter()
        .cloned()
        .filter_map(|record| match GalleryItem::new(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping gallery item: {}", e);
                None
            }
        })
        .filter(|item| {
            let fresh = seen.insert(item.id.clone());
            if !fresh {
                log::warn!("Skipping gallery item with duplicate id {}", item.id);
            }
            fresh
        })
        .collect();
    sort_newest_first(&mut items);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: format!("Event {}", id),
            date: date.to_string(),
            preview_image: Some(format!("/images/{}.jpg", id)),
            width: 16,
            height: 9,
            ..Default::default()
        }
    }

    #[test]
    fn vimeo_id_wins_over_local_video() {
        let item = GalleryItem::new(EventRecord {
            vimeo_id: Some("123456".to_string()),
            video_url: Some("/videos/a.mp4".to_string()),
            ..record("a", "November 15, 2023")
        })
        .unwrap();
        assert!(matches!(item.kind, PreviewKind::ExternalVideo { .. }));
        assert!(item.needs_player_script());
        assert!(item.opens_modal());
    }

    #[test]
    fn local_video_opens_modal_without_script() {
        let item = GalleryItem::new(EventRecord {
            video_url: Some("/videos/a.mp4".to_string()),
            ..record("a", "November 15, 2023")
        })
        .unwrap();
        assert_eq!(item.kind, PreviewKind::LocalVideo { src: "/videos/a.mp4".to_string() });
        assert!(item.opens_modal());
        assert!(!item.needs_player_script());
    }

    #[test]
    fn preview_clip_only_is_interactive_but_stays_inline() {
        let item = GalleryItem::new(EventRecord {
            preview_image: None,
            preview_video_src: Some("/videos/clip.mp4".to_string()),
            ..record("a", "November 15, 2023")
        })
        .unwrap();
        assert_eq!(item.kind, PreviewKind::Image);
        assert!(!item.opens_modal());
        assert!(item.is_interactive());
    }

    #[test]
    fn rejects_items_without_any_preview() {
        let err = GalleryItem::new(EventRecord {
            preview_image: Some("  ".to_string()),
            ..record("a", "November 15, 2023")
        })
        .unwrap_err();
        assert_eq!(err, GalleryError::MissingPreview { id: "a".to_string() });
    }

    #[test]
    fn rejects_zero_aspect_and_bad_vimeo_ids() {
        let zero = GalleryItem::new(EventRecord { width: 0, ..record("a", "") });
        assert!(matches!(zero, Err(GalleryError::InvalidAspect { .. })));

        let bad = GalleryItem::new(EventRecord {
            vimeo_id: Some("abc".to_string()),
            ..record("b", "")
        });
        assert!(matches!(bad, Err(GalleryError::InvalidVimeoId { .. })));
    }

    #[test]
    fn gallery_sorts_newest_first_with_undated_last() {
        let records = vec![
            record("old", "September 5, 2023"),
            record("undated", "sometime"),
            record("new", "November 15, 2023"),
            record("iso", "2023-10-20"),
        ];
        let ids: Vec<String> = build_gallery(&records).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["new", "iso", "old", "undated"]);
    }

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let items = build_gallery(&[
            record("a", "November 15, 2023"),
            EventRecord {
                title: "Second A".to_string(),
                ..record("a", "December 1, 2023")
            },
            record("b", "October 2, 2023"),
        ]);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(items[0].title, "Event a");
    }

    #[test]
    fn player_url_embeds_id() {
        let id = VimeoId::parse(" 76979871 ").unwrap();
        assert!(id.player_url().starts_with("https://player.vimeo.com/video/76979871?"));
        assert!(id.player_url().contains("autoplay=1"));
    }

    #[test]
    fn aspect_padding() {
        let ratio = AspectRatio { width: 16, height: 9 };
        assert!((ratio.padding_percent() - 56.25).abs() < f64::EPSILON);
    }
}
