//! WordPress REST publishing client.
//!
//! Resolves taxonomy terms, uploads featured media, and creates posts over
//! the `wp-json/wp/v2` API. All calls for one publish invocation share a
//! single retrying session; a dry-run configuration flag replaces every
//! network effect with a deterministic stub.

mod media;
mod publish;
mod session;
mod terms;

pub use publish::{ConnectionStatus, PublishRequest, WpClient, WpConfig};
