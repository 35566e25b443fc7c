//! URL scraping gateway with a provider fallback chain.
//!
//! The chain is plain data: an ordered list of providers, each a name, an
//! endpoint, and a pure normalizer from its JSON shape to [`SourceMaterial`].
//! Known video hosts try the media extractor first; everything else starts
//! with the article extractor. Any provider failure logs and falls through;
//! chain exhaustion (including an unconfigured scraper) degrades to a bare
//! hyperlink record — scraping never fails the user action.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Article,
    Video,
    Image,
    Link,
}

/// Normalized scrape result handed to the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMaterial {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<String>,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const VIDEO_HOSTS: &[&str] = &[
    "douyin.com",
    "v.douyin.com",
    "bilibili.com",
    "b23.tv",
    "youtube.com",
    "youtu.be",
    "tiktok.com",
];

/// One entry in the fallback chain.
pub struct ScrapeProvider {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub normalize: fn(&Value, &str) -> Option<SourceMaterial>,
}

static ARTICLE: ScrapeProvider = ScrapeProvider {
    name: "article",
    endpoint: "extract/article",
    normalize: normalize_article,
};

static MEDIA: ScrapeProvider = ScrapeProvider {
    name: "media",
    endpoint: "extract/media",
    normalize: normalize_media,
};

static READABILITY: ScrapeProvider = ScrapeProvider {
    name: "readability",
    endpoint: "extract/readability",
    normalize: normalize_readability,
};

/// Priority order for a URL: media-first for known video hosts, article-first
/// otherwise, readability always last.
pub fn provider_chain(url: &str) -> [&'static ScrapeProvider; 3] {
    if VIDEO_HOSTS.iter().any(|host| url.contains(host)) {
        [&MEDIA, &ARTICLE, &READABILITY]
    } else {
        [&ARTICLE, &MEDIA, &READABILITY]
    }
}

#[derive(Clone)]
pub struct ScrapeClient {
    client: Client,
    base: Option<String>,
    api_key: Option<String>,
}

impl ScrapeClient {
    pub fn new(base: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base,
            api_key,
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.base.as_deref(), self.api_key.as_deref()) {
            (Some(base), Some(key)) if !base.is_empty() && !key.is_empty() => Some((base, key)),
            _ => None,
        }
    }

    /// Scrapes `url` through the provider chain. Infallible by design: the
    /// worst outcome is a bare link record.
    pub async fn scrape(&self, url: &str) -> SourceMaterial {
        let Some((base, key)) = self.credentials() else {
            warn!("scraper gateway not configured, degrading to link record");
            return link_record(url);
        };
        for provider in provider_chain(url) {
            match self.attempt(base, key, provider, url).await {
                Ok(material) => {
                    debug!(provider = provider.name, "scrape succeeded");
                    return material;
                }
                Err(reason) => {
                    warn!(provider = provider.name, %reason, "scrape provider failed, falling through");
                }
            }
        }
        link_record(url)
    }

    async fn attempt(
        &self,
        base: &str,
        key: &str,
        provider: &ScrapeProvider,
        url: &str,
    ) -> Result<SourceMaterial, String> {
        let response = self
            .client
            .post(format!("{}/{}", base.trim_end_matches('/'), provider.endpoint))
            .header("x-api-key", key)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        let value: Value = response.json().await.map_err(|e| e.to_string())?;
        (provider.normalize)(&value, url).ok_or_else(|| "response missing required fields".to_string())
    }
}

/// Terminal fallback: a bare hyperlink record for the URL.
pub fn link_record(url: &str) -> SourceMaterial {
    SourceMaterial {
        title: host_of(url).to_string(),
        content: String::new(),
        author: None,
        kind: MaterialKind::Link,
        image_url: None,
        source_url: Some(url.to_string()),
        date: None,
        media_url: None,
        images: Vec::new(),
    }
}

fn host_of(url: &str) -> &str {
    let rest = url.split("://").nth(1).unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

fn str_field<'v>(value: &'v Value, keys: &[&str]) -> Option<&'v str> {
    keys.iter()
        .find_map(|k| value.get(k).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        })
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_article(value: &Value, url: &str) -> Option<SourceMaterial> {
    let title = str_field(value, &["title"])?;
    let content = str_field(value, &["content", "body", "text"]).unwrap_or("");
    let images = string_list(value, "images");
    let image_url = str_field(value, &["image_url", "cover", "cover_url"])
        .map(str::to_string)
        .or_else(|| images.first().cloned());
    let kind = if content.trim().is_empty() && !images.is_empty() {
        MaterialKind::Image
    } else {
        MaterialKind::Article
    };
    Some(SourceMaterial {
        title: title.trim().to_string(),
        content: content.trim().to_string(),
        author: str_field(value, &["author"]).map(str::to_string),
        kind,
        image_url,
        source_url: Some(
            str_field(value, &["source_url", "url"]).unwrap_or(url).to_string(),
        ),
        date: value
            .get("published_at")
            .or_else(|| value.get("date"))
            .and_then(parse_date),
        media_url: None,
        images,
    })
}

fn normalize_media(value: &Value, url: &str) -> Option<SourceMaterial> {
    let media_url = str_field(value, &["video_url", "media_url"])?;
    Some(SourceMaterial {
        title: str_field(value, &["title"]).unwrap_or(host_of(url)).trim().to_string(),
        content: str_field(value, &["description", "desc"]).unwrap_or("").trim().to_string(),
        author: str_field(value, &["author"]).map(str::to_string),
        kind: MaterialKind::Video,
        image_url: str_field(value, &["cover", "cover_url", "image_url"]).map(str::to_string),
        source_url: Some(url.to_string()),
        date: value.get("published_at").and_then(parse_date),
        media_url: Some(media_url.to_string()),
        images: Vec::new(),
    })
}

fn normalize_readability(value: &Value, url: &str) -> Option<SourceMaterial> {
    let title = str_field(value, &["title"])?;
    let content = str_field(value, &["text_content", "content"])?;
    Some(SourceMaterial {
        title: title.trim().to_string(),
        content: content.trim().to_string(),
        author: str_field(value, &["byline", "author"]).map(str::to_string),
        kind: MaterialKind::Article,
        image_url: None,
        source_url: Some(url.to_string()),
        date: None,
        media_url: None,
        images: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_hosts_try_media_first() {
        let chain = provider_chain("https://v.douyin.com/abc123/");
        assert_eq!(chain[0].name, "media");
        assert_eq!(chain[2].name, "readability");
    }

    #[test]
    fn test_plain_urls_try_article_first() {
        let chain = provider_chain("https://example.com/a-blog-post");
        assert_eq!(chain[0].name, "article");
        assert_eq!(chain[2].name, "readability");
    }

    #[test]
    fn test_normalize_article_full_response() {
        let value = json!({
            "title": " 一篇文章 ",
            "content": "正文内容",
            "author": "作者",
            "cover": "https://cdn.example.com/cover.jpg",
            "published_at": "2024-05-01T08:00:00+08:00",
            "images": ["https://cdn.example.com/1.jpg"],
        });
        let material = normalize_article(&value, "https://example.com/p/1").unwrap();
        assert_eq!(material.title, "一篇文章");
        assert_eq!(material.kind, MaterialKind::Article);
        assert_eq!(material.image_url.as_deref(), Some("https://cdn.example.com/cover.jpg"));
        assert!(material.date.is_some());
        assert_eq!(material.images.len(), 1);
    }

    #[test]
    fn test_normalize_article_without_title_is_rejected() {
        assert!(normalize_article(&json!({"content": "无标题"}), "https://x").is_none());
    }

    #[test]
    fn test_images_without_content_classify_as_image() {
        let value = json!({
            "title": "图集",
            "images": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"],
        });
        let material = normalize_article(&value, "https://x").unwrap();
        assert_eq!(material.kind, MaterialKind::Image);
        assert_eq!(material.image_url.as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_normalize_media_requires_a_media_url() {
        assert!(normalize_media(&json!({"title": "视频"}), "https://x").is_none());
        let material = normalize_media(
            &json!({"title": "视频", "video_url": "https://cdn.example.com/v.mp4"}),
            "https://v.douyin.com/abc/",
        )
        .unwrap();
        assert_eq!(material.kind, MaterialKind::Video);
        assert_eq!(material.media_url.as_deref(), Some("https://cdn.example.com/v.mp4"));
    }

    #[test]
    fn test_link_record_uses_the_host_as_title() {
        let record = link_record("https://example.com/some/deep/path");
        assert_eq!(record.title, "example.com");
        assert_eq!(record.kind, MaterialKind::Link);
        assert_eq!(record.source_url.as_deref(), Some("https://example.com/some/deep/path"));
    }

    #[test]
    fn test_wire_shape_uses_camel_case_and_type() {
        let record = link_record("https://example.com");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "link");
        assert!(json.get("sourceUrl").is_some());
        assert!(json.get("media_url").is_none());
    }
}
