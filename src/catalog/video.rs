use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Canonical external page for a video.
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
/// Embeddable player page for a video.
const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// A single catalog entry, immutable once fetched.
///
/// Decoded through `RawVideo` so a row may carry both the documented
/// camelCase names and the service's raw column names at once.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawVideo")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<u64>,
    pub thumbnail_url: String,
    pub description: Option<String>,
}

/// Wire shape of a video row. Every spelling is its own optional field, so
/// rows holding several of them never trip serde's duplicate-field check.
/// Unknown fields are ignored.
#[derive(Deserialize)]
struct RawVideo {
    /// Either the YouTube id or the service's integer primary key.
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default, rename = "videoId")]
    video_id_camel: Option<String>,
    title: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
    #[serde(default, rename = "channelTitle")]
    channel_title_camel: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at_camel: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default, rename = "viewCount", deserialize_with = "deserialize_view_count")]
    view_count_camel: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_view_count")]
    view_count: Option<u64>,
    #[serde(default, rename = "thumbnailUrl")]
    thumbnail_url_camel: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawVideo> for Video {
    type Error = String;

    fn try_from(raw: RawVideo) -> Result<Self, Self::Error> {
        // `video_id` wins; `id` is only the video id when it is a string.
        let id = raw
            .video_id
            .or(raw.video_id_camel)
            .or(match raw.id {
                Some(serde_json::Value::String(s)) => Some(s),
                _ => None,
            })
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| "missing video id".to_string())?;

        let channel = raw
            .channel
            .or(raw.channel_title)
            .or(raw.channel_title_camel)
            .ok_or_else(|| "missing channel".to_string())?;

        let timestamp = raw
            .published_at_camel
            .or(raw.published_at)
            .ok_or_else(|| "missing publish timestamp".to_string())?;
        let published_at = parse_timestamp(&timestamp)
            .ok_or_else(|| format!("unrecognized timestamp '{}'", timestamp))?;

        Ok(Video {
            id,
            title: raw.title,
            channel,
            published_at,
            view_count: raw.view_count_camel.or(raw.view_count),
            thumbnail_url: raw
                .thumbnail_url_camel
                .or(raw.thumbnail_url)
                .or(raw.thumbnail)
                .unwrap_or_default(),
            description: raw.description,
        })
    }
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_BASE, self.id)
    }

    pub fn embed_url(&self) -> String {
        format!(
            "{}{}?autoplay=1&rel=0&modestbranding=1",
            EMBED_BASE, self.id
        )
    }

    /// Compact view count, e.g. `1.2K views`. Empty when the count is unknown.
    pub fn views_label(&self) -> String {
        match self.view_count {
            None => String::new(),
            Some(1) => "1 view".to_string(),
            Some(n) => format!("{} views", compact_count(n)),
        }
    }

    /// Calendar date of publication, e.g. `Mar 14, 2024`.
    pub fn published_label(&self) -> String {
        self.published_at.format("%b %d, %Y").to_string()
    }
}

/// Abbreviate a count with K/M/B suffixes, one decimal below 10 units.
pub fn compact_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];
    for (scale, suffix) in UNITS {
        if n >= scale {
            let whole = n / scale;
            if whole >= 10 {
                return format!("{}{}", whole, suffix);
            }
            let tenth = (n % scale) * 10 / scale;
            return if tenth == 0 {
                format!("{}{}", whole, suffix)
            } else {
                format!("{}.{}{}", whole, tenth, suffix)
            };
        }
    }
    n.to_string()
}

// ============================================================================
// Tolerant field decoders
// ============================================================================

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), or a
/// bare date.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Float(f64),
    Text(String),
}

/// View counts arrive as integers, floats, numeric strings, or null.
fn deserialize_view_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawCount> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawCount::Number(n)) => Some(n),
        Some(RawCount::Float(f)) if f.is_finite() && f >= 0.0 => Some(f as u64),
        Some(RawCount::Float(_)) => None,
        Some(RawCount::Text(s)) => s.trim().parse::<u64>().ok(),
    })
}
