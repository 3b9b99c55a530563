//! Core types for Inkpress.
//!
//! Configuration, the shared error taxonomy, and the post data model used by
//! the cache, generation, and publishing crates.

pub mod config;
pub mod error;
pub mod post;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use post::{PostPayload, PostStatus, PublishResult};
