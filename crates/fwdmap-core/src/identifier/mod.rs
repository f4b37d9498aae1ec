//! Forwarder identification module.

mod matcher;

pub use matcher::{normalize_text, ForwarderMatcher};
