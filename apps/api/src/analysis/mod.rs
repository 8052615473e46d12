//! Resume analysis pipeline.
//!
//! Uploaded bytes flow through text recovery, signal extraction, additive
//! scoring, and narrative generation; an optional provider pass can then
//! rewrite the narrative before the result is persisted and returned.

pub mod enhance;
pub mod engine;
pub mod handlers;
pub mod narrative;
pub mod profile;
pub mod scoring;
pub mod signals;
pub mod text;
