//! Terminal presentation for the `ursync` binary.

pub mod context;
pub mod events;
pub mod icon;
pub mod json;
pub mod output;
pub mod prompt;
pub mod table;
pub mod terminal;
pub mod theme;
