//! Publish workflow and connectivity probe.

use crate::media::upload_featured_media;
use crate::session::{WpSession, ensure_success};
use crate::terms::merge_terms;
use inkpress_core::config::AppConfig;
use inkpress_core::{Error, PostPayload, PostStatus, PublishResult, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const POST_TIMEOUT: Duration = Duration::from_secs(20);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one WordPress site.
#[derive(Debug, Clone)]
pub struct WpConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub app_password: Option<String>,
    pub user_agent: String,
    pub max_media_bytes: u64,
    pub dry_run: bool,
}

impl From<&AppConfig> for WpConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            base_url: cfg.wp_url.clone(),
            username: cfg.wp_user.clone(),
            app_password: cfg.wp_app_pass.clone(),
            user_agent: cfg.user_agent.clone(),
            max_media_bytes: cfg.max_media_bytes,
            dry_run: cfg.dry_run,
        }
    }
}

/// Inputs to one publish call.
///
/// Categories and tags can be given as raw remote ids, as names to resolve
/// or create, or both; the two are merged without duplicates.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub title: String,
    pub content_html: String,
    pub status: PostStatus,
    pub categories: Vec<u64>,
    pub category_names: Vec<String>,
    pub tags: Vec<u64>,
    pub tag_names: Vec<String>,
    pub featured_image: Option<String>,
}

/// Result of the connectivity probe.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub status_code: Option<u16>,
    pub user: Option<serde_json::Value>,
    /// Response body on a non-OK status, or a message for credential and
    /// transport failures.
    pub error: Option<serde_json::Value>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    id: u64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

/// Resolved auth context shared by the term and media calls of one publish.
pub(crate) struct ApiContext<'a> {
    pub session: &'a WpSession,
    pub base: &'a str,
    pub user: &'a str,
    pub pass: &'a str,
    pub max_media_bytes: u64,
}

impl ApiContext<'_> {
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// WordPress client for a single site.
pub struct WpClient {
    config: WpConfig,
}

impl WpClient {
    pub fn new(config: WpConfig) -> Self {
        Self { config }
    }

    /// Create a post, resolving terms and uploading the featured image
    /// first.
    ///
    /// In dry-run mode this performs zero network calls and returns a
    /// deterministic result with id 0. Otherwise the steps run in order:
    /// category merge, tag merge, media upload, post creation. There is no
    /// rollback; terms or media created before a later failure remain on the
    /// CMS.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishResult> {
        if self.config.dry_run {
            return Ok(self.dry_run_result(request.status));
        }

        let (base, user, pass) = self.credentials()?;
        let session = WpSession::new(&self.config.user_agent)?;
        let cx = ApiContext {
            session: &session,
            base,
            user,
            pass,
            max_media_bytes: self.config.max_media_bytes,
        };

        let categories =
            merge_terms(&cx, &request.categories, &request.category_names, "categories").await?;
        let tags = merge_terms(&cx, &request.tags, &request.tag_names, "tags").await?;
        let featured_media = upload_featured_media(&cx, request.featured_image.as_deref()).await?;

        let payload = PostPayload {
            title: request.title.clone(),
            content: request.content_html.clone(),
            status: request.status,
            categories,
            tags,
            featured_media,
        };

        let endpoint = cx.api_url("/wp-json/wp/v2/posts");
        let response = session
            .execute(|client| {
                Ok(client
                    .post(&endpoint)
                    .json(&payload)
                    .basic_auth(user, Some(pass))
                    .timeout(POST_TIMEOUT))
            })
            .await?;
        let created: PostResponse = ensure_success(response)?.json().await?;

        let status = created
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(request.status);
        let preview_link = preview_link(base, status, created.id, created.link.as_deref());
        info!(id = created.id, %status, "created post");

        Ok(PublishResult {
            id: created.id,
            status,
            link: created.link,
            preview_link,
        })
    }

    /// Probe the site with basic auth against `users/me`.
    ///
    /// Never fails: missing credentials and transport errors are reported in
    /// the returned status so front ends can render them.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let (base, user, pass) = match self.credentials() {
            Ok(creds) => creds,
            Err(_) => {
                return ConnectionStatus {
                    ok: false,
                    status_code: None,
                    user: None,
                    error: Some("Missing WordPress credentials in config".into()),
                    url: None,
                };
            }
        };
        let endpoint = format!("{base}/wp-json/wp/v2/users/me");

        let session = match WpSession::new(&self.config.user_agent) {
            Ok(session) => session,
            Err(err) => {
                return ConnectionStatus {
                    ok: false,
                    status_code: None,
                    user: None,
                    error: Some(err.to_string().into()),
                    url: Some(endpoint),
                };
            }
        };

        let sent = session
            .client()
            .get(&endpoint)
            .basic_auth(user, Some(pass))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match sent {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let ok = response.status().is_success();
                let text = response.text().await.unwrap_or_default();
                let body: serde_json::Value = serde_json::from_str(&text).unwrap_or_else(|_| {
                    serde_json::json!({ "raw": text.chars().take(500).collect::<String>() })
                });
                ConnectionStatus {
                    ok,
                    status_code: Some(status_code),
                    user: ok.then(|| body.clone()),
                    error: (!ok).then_some(body),
                    url: Some(endpoint),
                }
            }
            Err(err) => ConnectionStatus {
                ok: false,
                status_code: None,
                user: None,
                error: Some(err.to_string().into()),
                url: Some(endpoint),
            },
        }
    }

    fn credentials(&self) -> Result<(&str, &str, &str)> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or(Error::MissingConfig("WP_URL"))?;
        let user = self
            .config
            .username
            .as_deref()
            .ok_or(Error::MissingConfig("WP_USER"))?;
        let pass = self
            .config
            .app_password
            .as_deref()
            .ok_or(Error::MissingConfig("WP_APP_PASS"))?;
        Ok((base.trim_end_matches('/'), user, pass))
    }

    fn dry_run_result(&self, status: PostStatus) -> PublishResult {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();
        let link = match status {
            PostStatus::Publish => format!("{base}/posts/0"),
            PostStatus::Draft => format!("{base}/?p=0&preview=true"),
        };
        PublishResult {
            id: 0,
            status,
            link: Some(link.clone()),
            preview_link: link,
        }
    }
}

/// Navigable URL for the created post.
///
/// Published posts use the CMS-provided permalink when there is one; drafts
/// (and anything without a link) get a synthesized preview URL, which the
/// CMS does not otherwise expose.
fn preview_link(base: &str, status: PostStatus, post_id: u64, link: Option<&str>) -> String {
    match (status, link) {
        (PostStatus::Publish, Some(link)) => link.to_string(),
        _ => format!("{base}/?p={post_id}&preview=true"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_link_uses_cms_link_for_published_posts() {
        assert_eq!(
            preview_link("https://example.com", PostStatus::Publish, 9, Some("https://x/y")),
            "https://x/y"
        );
    }

    #[test]
    fn preview_link_is_synthesized_for_drafts() {
        assert_eq!(
            preview_link("https://example.com", PostStatus::Draft, 123, Some("https://x/y")),
            "https://example.com/?p=123&preview=true"
        );
        assert_eq!(
            preview_link("https://example.com", PostStatus::Publish, 7, None),
            "https://example.com/?p=7&preview=true"
        );
    }
}
