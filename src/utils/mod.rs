//! Shared utility modules.

pub mod ifaces;

pub use ifaces::{expand_range, parse_range, ParsedRange};
