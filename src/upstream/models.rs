//! Upstream API models
//!
//! Response shapes of the photo-sharing API, limited to what the feed needs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::grid::GridItem;

/// Status block carried by every upstream response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Meta {
    pub code: u16,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// `{ "meta": ..., "data": ... }` wrapper around every payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub meta: Meta,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, turning a non-200 meta code into an upstream error.
    pub fn into_data(self) -> Result<T> {
        if self.meta.code != 200 {
            let message = self
                .meta
                .error_message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("upstream returned meta code {}", self.meta.code));
            return Err(FeedError::Upstream(message));
        }
        self.data
            .ok_or_else(|| FeedError::Upstream("upstream response has no data".to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile_picture: String,
}

/// Unix seconds encoded as a decimal string, e.g. `"1296710327"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UnixTimeString(pub String);

impl UnixTimeString {
    /// Parses the timestamp; `None` if it is not an integer or out of range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs: i64 = self.0.trim().parse().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Location ids arrive either as strings or as integers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocationId {
    Text(String),
    Number(i64),
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationId::Text(id) => f.write_str(id),
            LocationId::Number(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<LocationId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Images {
    #[serde(default)]
    pub low_resolution: Option<Image>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub standard_resolution: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Videos {
    #[serde(default)]
    pub low_resolution: Option<Image>,
    #[serde(default)]
    pub standard_resolution: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_time: UnixTimeString,
    #[serde(default)]
    pub from: Option<User>,
}

/// Counter plus a sample of the entries (comments, likes).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Counted<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub data: Vec<T>,
}

/// A single photo or video post.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Media {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_time: UnixTimeString,
    #[serde(default)]
    pub caption: Option<Comment>,
    #[serde(default)]
    pub comments: Option<Counted<Comment>>,
    #[serde(default)]
    pub likes: Option<Counted<User>>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub videos: Option<Videos>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub user_has_liked: bool,
}

impl Media {
    /// Best image for a grid cell: low resolution, then standard, then thumbnail.
    pub fn display_image(&self) -> Option<&Image> {
        let images = self.images.as_ref()?;
        images
            .low_resolution
            .as_ref()
            .or(images.standard_resolution.as_ref())
            .or(images.thumbnail.as_ref())
    }

    pub fn caption_text(&self) -> &str {
        self.caption.as_ref().map_or("", |caption| caption.text.as_str())
    }

    pub fn like_count(&self) -> u64 {
        self.likes.as_ref().map_or(0, |likes| likes.count)
    }
}

impl GridItem for Media {
    fn href(&self) -> String {
        self.link.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECENT_MEDIA: &str = r#"{
        "meta": {"code": 200},
        "data": [{
            "type": "image",
            "id": "22987123_3",
            "link": "https://example.com/p/abc/",
            "filter": "Valencia",
            "tags": ["flowers"],
            "created_time": "1296710327",
            "caption": {"id": "26621", "text": "Peonies", "created_time": "1296710352",
                        "from": {"id": "3", "username": "mimozaflowers"}},
            "comments": {"count": 2, "data": []},
            "likes": {"count": 15, "data": [{"id": "4", "username": "someone"}]},
            "user": {"id": "3", "username": "mimozaflowers", "profile_picture": "p.jpg"},
            "images": {
                "low_resolution": {"url": "low.jpg", "width": 306, "height": 306},
                "thumbnail": {"url": "thumb.jpg", "width": 150, "height": 150},
                "standard_resolution": {"url": "std.jpg", "width": 612, "height": 612}
            },
            "location": {"id": 833, "name": "Market", "latitude": 37.77, "longitude": -122.41},
            "user_has_liked": false
        }]
    }"#;

    #[test]
    fn test_decode_recent_media() {
        let envelope: ApiEnvelope<Vec<Media>> = serde_json::from_str(RECENT_MEDIA).unwrap();
        let media = envelope.into_data().unwrap();

        assert_eq!(media.len(), 1);
        let item = &media[0];
        assert_eq!(item.kind, "image");
        assert_eq!(item.caption_text(), "Peonies");
        assert_eq!(item.like_count(), 15);
        assert_eq!(item.display_image().unwrap().url, "low.jpg");
        assert_eq!(item.href(), "https://example.com/p/abc/");
        assert_eq!(
            item.location.as_ref().unwrap().id,
            Some(LocationId::Number(833))
        );
    }

    #[test]
    fn test_error_meta_becomes_upstream_error() {
        let body = r#"{"meta": {"code": 400, "error_type": "OAuthParameterException",
                                "error_message": "The client_id provided is invalid"}}"#;
        let envelope: ApiEnvelope<Vec<User>> = serde_json::from_str(body).unwrap();

        match envelope.into_data() {
            Err(FeedError::Upstream(message)) => {
                assert_eq!(message, "The client_id provided is invalid")
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_payload_without_default() {
        #[derive(Debug, Deserialize)]
        struct Token {
            value: String,
        }

        let envelope: ApiEnvelope<Token> =
            serde_json::from_str(r#"{"meta": {"code": 200}, "data": {"value": "t"}}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap().value, "t");

        let envelope: ApiEnvelope<Token> =
            serde_json::from_str(r#"{"meta": {"code": 200}}"#).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let envelope: ApiEnvelope<Vec<User>> =
            serde_json::from_str(r#"{"meta": {"code": 200}}"#).unwrap();
        assert!(matches!(envelope.into_data(), Err(FeedError::Upstream(_))));
    }

    #[test]
    fn test_location_id_variants() {
        let text: LocationId = serde_json::from_str(r#""abc""#).unwrap();
        let number: LocationId = serde_json::from_str("514276").unwrap();

        assert_eq!(text.to_string(), "abc");
        assert_eq!(number.to_string(), "514276");
    }

    #[test]
    fn test_unix_time_string() {
        let time = UnixTimeString("1296710327".to_string()).to_datetime().unwrap();
        assert_eq!(time.timestamp(), 1_296_710_327);

        assert!(UnixTimeString("yesterday".to_string()).to_datetime().is_none());
    }

    #[test]
    fn test_display_image_fallback() {
        let media = Media {
            images: Some(Images {
                thumbnail: Some(Image {
                    url: "thumb.jpg".to_string(),
                    ..Image::default()
                }),
                ..Images::default()
            }),
            ..Media::default()
        };
        assert_eq!(media.display_image().unwrap().url, "thumb.jpg");
        assert!(Media::default().display_image().is_none());
    }
}
