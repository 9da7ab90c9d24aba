//! Property tests for ursync.
//!
//! Randomized inputs guard invariants like "never panics" and
//! "normalizing twice changes nothing".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/catalog_parse.rs"]
mod catalog_parse;

#[path = "properties/notify_render.rs"]
mod notify_render;

#[path = "properties/path_normalization.rs"]
mod path_normalization;

#[path = "properties/remote_spec.rs"]
mod remote_spec;
