//! Taxonomy term resolution.

use crate::publish::ApiContext;
use crate::session::ensure_success;
use inkpress_core::Result;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

const TERM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct Term {
    id: u64,
    #[serde(default)]
    name: String,
}

/// Resolve taxonomy names to remote ids, creating missing terms when
/// permitted. Blank names are skipped. Any non-success response from the
/// taxonomy endpoint fails the whole resolution; a publish must not proceed
/// with a partial term set.
pub(crate) async fn resolve_terms(
    cx: &ApiContext<'_>,
    taxonomy: &str,
    names: &[String],
    create_missing: bool,
) -> Result<Vec<u64>> {
    let endpoint = cx.api_url(&format!("/wp-json/wp/v2/{taxonomy}"));
    let mut ids = Vec::new();

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let response = cx
            .session
            .execute(|client| {
                Ok(client
                    .get(&endpoint)
                    .query(&[("search", name), ("per_page", "100")])
                    .basic_auth(cx.user, Some(cx.pass))
                    .timeout(TERM_TIMEOUT))
            })
            .await?;
        let terms: Vec<Term> = ensure_success(response)?.json().await?;

        if let Some(hit) = terms
            .iter()
            .find(|t| t.name.trim().eq_ignore_ascii_case(name))
        {
            debug!(taxonomy, name, id = hit.id, "matched existing term");
            ids.push(hit.id);
            continue;
        }

        if create_missing {
            let response = cx
                .session
                .execute(|client| {
                    Ok(client
                        .post(&endpoint)
                        .json(&serde_json::json!({ "name": name }))
                        .basic_auth(cx.user, Some(cx.pass))
                        .timeout(TERM_TIMEOUT))
                })
                .await?;
            let created: Term = ensure_success(response)?.json().await?;
            debug!(taxonomy, name, id = created.id, "created term");
            ids.push(created.id);
        }
    }

    Ok(ids)
}

/// Union of explicit ids and ids resolved from names, de-duplicated.
///
/// `None` when both inputs are empty (or resolve to nothing), so callers can
/// distinguish "leave the taxonomy unset" from "set it to these ids".
pub(crate) async fn merge_terms(
    cx: &ApiContext<'_>,
    existing: &[u64],
    names: &[String],
    taxonomy: &str,
) -> Result<Option<Vec<u64>>> {
    if existing.is_empty() && names.is_empty() {
        return Ok(None);
    }
    let resolved = if names.is_empty() {
        Vec::new()
    } else {
        resolve_terms(cx, taxonomy, names, true).await?
    };

    let merged: BTreeSet<u64> = existing.iter().copied().chain(resolved).collect();
    if merged.is_empty() {
        return Ok(None);
    }
    Ok(Some(merged.into_iter().collect()))
}
