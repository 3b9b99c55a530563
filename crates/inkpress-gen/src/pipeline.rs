//! Scaffold/hydrate orchestration.

use crate::llm::{ChatMessage, LlmClient};
use inkpress_cache::{FileCache, MemoCache};
use inkpress_core::{Error, Result};
use tracing::info;

const SCAFFOLD_SYSTEM_PROMPT: &str = "You are an article scaffold generator. Output a detailed \
     outline with headings and bullets.";
const HYDRATE_SYSTEM_PROMPT: &str = "You are a writing assistant. Transform the outline into a \
     full article with context, examples, transitions.";

const SCAFFOLD_NAMESPACE: &str = "scaffold";
const HYDRATE_NAMESPACE: &str = "hydrate";

/// Inputs to one generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub links: Option<Vec<String>>,
    pub scaffold_model: String,
    pub hydrate_model: String,
    /// When false, the durable cache is neither consulted nor written.
    pub use_cache: bool,
}

/// Two-stage article generator over the fingerprint cache.
///
/// Each stage checks the durable cache first; the in-process memo only
/// short-circuits repeated calls within one process.
pub struct ArticleGenerator {
    llm: LlmClient,
    cache: FileCache,
    scaffold_memo: MemoCache,
    hydrate_memo: MemoCache,
}

impl ArticleGenerator {
    pub fn new(llm: LlmClient, cache: FileCache) -> Self {
        Self {
            llm,
            cache,
            scaffold_memo: MemoCache::default(),
            hydrate_memo: MemoCache::default(),
        }
    }

    /// Drop the in-process memo entries. The durable cache is untouched.
    pub fn clear_memos(&self) {
        self.scaffold_memo.clear();
        self.hydrate_memo.clear();
    }

    /// Generate the outline for `prompt`.
    pub async fn scaffold(
        &self,
        prompt: &str,
        links: Option<&[String]>,
        model: &str,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::EmptyInput("prompt"));
        }

        let memo_parts = memo_key(prompt, links, model);
        if let Some(outline) = self.scaffold_memo.get(&memo_parts) {
            return Ok(outline);
        }

        let mut messages = vec![
            ChatMessage::system(SCAFFOLD_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        if let Some(links) = links.filter(|l| !l.is_empty()) {
            messages.push(ChatMessage::user(format!("Links: {links:?}")));
        }

        let outline = self.llm.chat(model, &messages).await?;
        self.scaffold_memo.put(&memo_parts, &outline);
        Ok(outline)
    }

    /// Expand `outline` into full prose.
    pub async fn hydrate(&self, outline: &str, model: &str) -> Result<String> {
        if outline.trim().is_empty() {
            return Err(Error::EmptyInput("outline"));
        }

        let memo_parts = [outline.to_string(), model.to_string()];
        if let Some(article) = self.hydrate_memo.get(&memo_parts) {
            return Ok(article);
        }

        let messages = [
            ChatMessage::system(HYDRATE_SYSTEM_PROMPT),
            ChatMessage::user(outline),
        ];
        let article = self.llm.chat(model, &messages).await?;
        self.hydrate_memo.put(&memo_parts, &article);
        Ok(article)
    }

    /// Run both stages, consulting the durable cache around each one, and
    /// append a references section when links were supplied.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let links = request.links.as_deref();
        let scaffold_parts = memo_key(&request.prompt, links, &request.scaffold_model);

        let mut outline = None;
        if request.use_cache {
            outline = self.cache.read(SCAFFOLD_NAMESPACE, &scaffold_parts).await;
        }
        let outline = match outline {
            Some(outline) => outline,
            None => {
                let outline = self
                    .scaffold(&request.prompt, links, &request.scaffold_model)
                    .await?;
                if request.use_cache {
                    self.cache
                        .write(SCAFFOLD_NAMESPACE, &scaffold_parts, &outline)
                        .await?;
                }
                outline
            }
        };

        let hydrate_parts = [outline.clone(), request.hydrate_model.clone()];
        let mut article = None;
        if request.use_cache {
            article = self.cache.read(HYDRATE_NAMESPACE, &hydrate_parts).await;
        }
        let mut article = match article {
            Some(article) => article,
            None => {
                let article = self.hydrate(&outline, &request.hydrate_model).await?;
                if request.use_cache {
                    self.cache
                        .write(HYDRATE_NAMESPACE, &hydrate_parts, &article)
                        .await?;
                }
                article
            }
        };

        if let Some(links) = links.filter(|l| !l.is_empty()) {
            let refs: Vec<String> = links.iter().map(|l| format!("- {l}")).collect();
            article.push_str("\n## References\n");
            article.push_str(&refs.join("\n"));
        }

        info!(prompt = %request.prompt, chars = article.len(), "generated article");
        Ok(article)
    }
}

/// Cache key parts for the scaffold stage: prompt, link list, model, in that
/// order. `None` and an empty link list produce distinct keys on purpose.
fn memo_key(prompt: &str, links: Option<&[String]>, model: &str) -> [String; 3] {
    [
        prompt.to_string(),
        format!("{links:?}"),
        model.to_string(),
    ]
}
