//! Featured media upload.

use crate::publish::ApiContext;
use crate::session::ensure_success;
use futures::StreamExt;
use inkpress_core::{Error, Result};
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Image types the CMS may receive. Anything else is rejected outright.
const ALLOWED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Deserialize)]
struct MediaResponse {
    id: u64,
}

/// Fetch or read the asset at `locator`, validate it, and upload it to the
/// media endpoint. Returns the CMS-assigned id, or `None` for a `None`
/// locator.
pub(crate) async fn upload_featured_media(
    cx: &ApiContext<'_>,
    locator: Option<&str>,
) -> Result<Option<u64>> {
    let Some(locator) = locator else {
        return Ok(None);
    };

    let (filename, content) = if locator.starts_with("http://") || locator.starts_with("https://") {
        let filename = url_filename(locator);
        let content = fetch_bounded(cx, locator).await?;
        (filename, content)
    } else {
        let filename = Path::new(locator)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content = tokio::fs::read(locator).await?;
        (filename, content)
    };

    let mime = mime_for(&filename);
    if !ALLOWED_MEDIA_TYPES.contains(&mime) {
        return Err(Error::UnsupportedMediaType {
            mime: mime.to_string(),
        });
    }

    let endpoint = cx.api_url("/wp-json/wp/v2/media");
    let response = cx
        .session
        .execute(|client| {
            let part = multipart::Part::bytes(content.clone())
                .file_name(filename.clone())
                .mime_str(mime)?;
            Ok(client
                .post(&endpoint)
                .multipart(multipart::Form::new().part("file", part))
                .basic_auth(cx.user, Some(cx.pass))
                .timeout(UPLOAD_TIMEOUT))
        })
        .await?;
    let media: MediaResponse = ensure_success(response)?.json().await?;
    info!(id = media.id, filename, "uploaded featured media");
    Ok(Some(media.id))
}

/// Download a remote asset, aborting as soon as the accumulated size passes
/// the configured cap. The body is never buffered past the limit.
async fn fetch_bounded(cx: &ApiContext<'_>, url: &str) -> Result<Vec<u8>> {
    let response = cx
        .session
        .execute(|client| Ok(client.get(url).timeout(FETCH_TIMEOUT)))
        .await?;
    let response = ensure_success(response)?;

    let mut content = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if content.len() as u64 + chunk.len() as u64 > cx.max_media_bytes {
            return Err(Error::MediaTooLarge {
                limit_bytes: cx.max_media_bytes,
            });
        }
        content.extend_from_slice(&chunk);
    }
    Ok(content)
}

/// Last path segment of the URL, percent-decoded; "image" when empty.
fn url_filename(raw: &str) -> String {
    let segment = Url::parse(raw)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .unwrap_or_default();
    let decoded = percent_decode(&segment);
    if decoded.is_empty() {
        "image".to_string()
    } else {
        decoded
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// MIME type inferred from the filename extension.
fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for("a.png"), "image/png");
        assert_eq!(mime_for("anim.gif"), "image/gif");
        assert_eq!(mime_for("pic.webp"), "image/webp");
        assert_eq!(mime_for("script.exe"), "application/octet-stream");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }

    #[test]
    fn url_filename_takes_decoded_last_segment() {
        assert_eq!(
            url_filename("https://cdn.example.com/a/b/img.jpg"),
            "img.jpg"
        );
        assert_eq!(
            url_filename("https://cdn.example.com/my%20photo.png?size=big"),
            "my photo.png"
        );
        assert_eq!(url_filename("https://cdn.example.com/"), "image");
    }
}
