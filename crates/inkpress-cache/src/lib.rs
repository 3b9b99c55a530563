//! Content-addressed cache for Inkpress.
//!
//! Generated text is keyed by a fingerprint of its semantic inputs (prompt,
//! links, model) so that repeated generation requests short-circuit the
//! expensive LLM call. The durable [`FileCache`] is authoritative; the
//! in-process [`MemoCache`] is a bounded latency layer over the same keys.

pub mod fingerprint;
pub mod memo;
pub mod store;

pub use fingerprint::fingerprint;
pub use memo::MemoCache;
pub use store::FileCache;
