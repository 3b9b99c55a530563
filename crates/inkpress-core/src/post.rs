//! Post data model for the WordPress REST boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Publish => "publish",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            other => Err(format!("Unknown post status: {other}")),
        }
    }
}

/// Body of the post creation request.
///
/// `categories`, `tags`, and `featured_media` are omitted from the wire
/// representation when unset; the CMS treats a missing key as "leave unset",
/// which is not the same as an empty list.
#[derive(Debug, Clone, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<u64>,
}

/// Outcome of a publish call.
///
/// `id` 0 is reserved for dry-run results that never touched the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub id: u64,
    pub status: PostStatus,
    pub link: Option<String>,
    pub preview_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [PostStatus::Draft, PostStatus::Publish] {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
        assert!("published".parse::<PostStatus>().is_err());
    }

    #[test]
    fn payload_omits_unset_keys() {
        let payload = PostPayload {
            title: "T".to_string(),
            content: "<p>x</p>".to_string(),
            status: PostStatus::Draft,
            categories: None,
            tags: None,
            featured_media: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("categories"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj.contains_key("featured_media"));
        assert_eq!(obj["status"], "draft");
    }

    #[test]
    fn payload_keeps_set_keys() {
        let payload = PostPayload {
            title: "T".to_string(),
            content: "<p>x</p>".to_string(),
            status: PostStatus::Publish,
            categories: Some(vec![1, 2]),
            tags: Some(vec![5]),
            featured_media: Some(77),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["categories"], serde_json::json!([1, 2]));
        assert_eq!(json["tags"], serde_json::json!([5]));
        assert_eq!(json["featured_media"], 77);
    }
}
