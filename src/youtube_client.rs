// YouTube Data API v3 client for video metadata reads and writes
// Docs: https://developers.google.com/youtube/v3

use crate::error::{Service, ServiceError};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    access_token: String,
}

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub snippet: Option<Snippet>,
}

/// The snippet part of a video resource, for both list and update responses.
#[derive(Debug, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "channelId")]
    pub channel_id: String,
    #[serde(default, rename = "categoryId")]
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub maxres: Option<ThumbnailInfo>,
    pub standard: Option<ThumbnailInfo>,
    pub high: Option<ThumbnailInfo>,
    pub medium: Option<ThumbnailInfo>,
    pub default: Option<ThumbnailInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailInfo {
    pub url: String,
}

/// videos.update answers with a single video resource, not an items list.
#[derive(Debug, Deserialize)]
struct UpdatedVideo {
    snippet: Option<Snippet>,
}

// ============================================================================
// Request Inputs
// ============================================================================

/// Tags arrive from editors either as a JSON array or as one comma-delimited
/// string; both collapse through normalize_tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Delimited(String),
}

/// Category IDs are numeric strings on the wire, but editors send numbers too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Text(String),
    Number(u64),
}

impl CategoryId {
    pub fn to_string_value(&self) -> String {
        match self {
            CategoryId::Text(s) => s.clone(),
            CategoryId::Number(n) => n.to_string(),
        }
    }
}

/// Video metadata as this service reports it. Fetch responses carry a
/// thumbnail and no tags; update responses carry tags and no thumbnail.
#[derive(Debug, Clone, Serialize)]
pub struct VideoData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// Video Reference Parsing
// ============================================================================

lazy_static! {
    static ref BARE_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
    // Domain and path match case-insensitively; the captured ID stays as given.
    static ref URL_PATTERNS: [Regex; 3] = [
        Regex::new(r"(?i)youtu\.be/([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"(?i)youtube\.com/(?:embed/|shorts/|watch\?v=)([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"(?i)youtube\.com/.+&v=([A-Za-z0-9_-]{11})").unwrap(),
    ];
}

/// Extract a canonical 11-character video ID from a bare ID or a YouTube URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    // Already a bare video ID
    if BARE_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    for pattern in URL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(input) {
            if let Some(id) = captures.get(1) {
                return Some(id.as_str().to_string());
            }
        }
    }

    None
}

/// Pick the best thumbnail the API returned, highest quality first.
pub fn select_thumbnail(thumbnails: Option<&Thumbnails>) -> String {
    thumbnails
        .and_then(|t| {
            t.maxres
                .as_ref()
                .or(t.standard.as_ref())
                .or(t.high.as_ref())
                .or(t.medium.as_ref())
                .or(t.default.as_ref())
        })
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Normalize a tags parameter to an ordered list of non-empty strings.
pub fn normalize_tags(input: Option<&TagsInput>) -> Vec<String> {
    let raw: Vec<String> = match input {
        None => return Vec::new(),
        Some(TagsInput::List(list)) => list.clone(),
        Some(TagsInput::Delimited(s)) => s.split(',').map(str::to_string).collect(),
    };

    raw.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// YouTube Client Implementation
// ============================================================================

impl YouTubeClient {
    pub fn new(api_key: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            access_token,
        }
    }

    /// Fetch the snippet metadata of a video by ID or URL.
    pub async fn fetch_video_data(&self, reference: &str) -> Result<VideoData, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingApiKey);
        }

        let video_id = extract_video_id(reference).ok_or(ServiceError::InvalidVideo)?;

        tracing::debug!("Fetching YouTube video data: {}", video_id);

        let response = self
            .client
            .get(VIDEOS_URL)
            .query(&[
                ("part", "snippet"),
                ("id", video_id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::transport(Service::YouTube, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("YouTube videos.list failed with status {}", status);
            return Err(ServiceError::RequestFailed {
                service: Service::YouTube,
                status: status.as_u16(),
                message: "YouTube API request failed.".to_string(),
            });
        }

        let listing: VideoListResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(Service::YouTube, e))?;

        let snippet = listing
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .ok_or(ServiceError::NotFound)?;

        let thumbnail = select_thumbnail(snippet.thumbnails.as_ref());

        Ok(VideoData {
            id: video_id,
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            category_id: snippet.category_id,
            thumbnail: Some(thumbnail),
            tags: None,
        })
    }

    /// Update the snippet of a video (title, description, tags, category).
    ///
    /// Required scope: https://www.googleapis.com/auth/youtube.force-ssl
    pub async fn update_video_metadata(
        &self,
        reference: &str,
        title: &str,
        description: &str,
        tags: Option<&TagsInput>,
        category_id: Option<&CategoryId>,
    ) -> Result<VideoData, ServiceError> {
        // Token check comes before reference resolution so callers learn about
        // credential problems even when the reference is also bad.
        if self.access_token.is_empty() {
            return Err(ServiceError::MissingToken);
        }

        let video_id = extract_video_id(reference).ok_or(ServiceError::InvalidVideo)?;
        let tags = normalize_tags(tags);
        let category = category_id.map(CategoryId::to_string_value).unwrap_or_default();

        tracing::info!("📝 Updating YouTube video metadata: {}", video_id);

        let body = json!({
            "id": video_id,
            "snippet": {
                "title": title,
                "description": description,
                "tags": tags,
                "categoryId": category,
            }
        });

        let response = self
            .client
            .put(VIDEOS_URL)
            .query(&[("part", "snippet")])
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(Service::YouTube, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "YouTube API request failed.".to_string());
            tracing::warn!("YouTube videos.update failed ({}): {}", status, message);
            return Err(ServiceError::RequestFailed {
                service: Service::YouTube,
                status: status.as_u16(),
                message,
            });
        }

        let updated: UpdatedVideo = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(Service::YouTube, e))?;

        let snippet = updated.snippet.ok_or(ServiceError::NotFound)?;

        tracing::info!("✅ Video metadata updated: {}", video_id);

        Ok(VideoData {
            id: video_id,
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            category_id: snippet.category_id,
            thumbnail: None,
            tags: Some(snippet.tags),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_passes_through() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("a_b-C1d2E3f").as_deref(), Some("a_b-C1d2E3f"));
    }

    #[test]
    fn test_url_shapes_resolve_to_id() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "failed for {}", url);
        }
    }

    #[test]
    fn test_garbage_does_not_resolve() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        // Ten characters is one short of a video ID
        assert_eq!(extract_video_id("dQw4w9WgXc"), None);
    }

    #[test]
    fn test_thumbnail_preference_order() {
        let thumbs = Thumbnails {
            high: Some(ThumbnailInfo { url: "H".to_string() }),
            default: Some(ThumbnailInfo { url: "D".to_string() }),
            ..Default::default()
        };
        assert_eq!(select_thumbnail(Some(&thumbs)), "H");

        let maxres = Thumbnails {
            maxres: Some(ThumbnailInfo { url: "M".to_string() }),
            default: Some(ThumbnailInfo { url: "D".to_string() }),
            ..Default::default()
        };
        assert_eq!(select_thumbnail(Some(&maxres)), "M");

        assert_eq!(select_thumbnail(Some(&Thumbnails::default())), "");
        assert_eq!(select_thumbnail(None), "");
    }

    #[test]
    fn test_normalize_tags_from_delimited_string() {
        let input = TagsInput::Delimited("a, b ,, c".to_string());
        assert_eq!(normalize_tags(Some(&input)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_tags_from_list_and_absent() {
        let list = TagsInput::List(vec![" one ".to_string(), String::new(), "two".to_string()]);
        assert_eq!(normalize_tags(Some(&list)), vec!["one", "two"]);
        assert_eq!(normalize_tags(Some(&TagsInput::List(Vec::new()))), Vec::<String>::new());
        assert_eq!(normalize_tags(None), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_fetch_without_api_key_fails_fast() {
        let client = YouTubeClient::new(String::new(), "token".to_string());
        let err = client.fetch_video_data("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey));
        assert_eq!(err.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_update_without_token_fails_before_ref_resolution() {
        let client = YouTubeClient::new("key".to_string(), String::new());
        // Even an unparseable reference reports the missing token first
        let err = client
            .update_video_metadata("not a url", "t", "d", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingToken));
        assert_eq!(err.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_update_with_token_but_bad_reference() {
        let client = YouTubeClient::new("key".to_string(), "token".to_string());
        let err = client
            .update_video_metadata("not a url", "t", "d", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidVideo));
    }

    #[test]
    fn test_category_id_stringifies() {
        assert_eq!(CategoryId::Number(22).to_string_value(), "22");
        assert_eq!(CategoryId::Text("27".to_string()).to_string_value(), "27");
    }
}
