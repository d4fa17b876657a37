//! Interface slot and range parsing.
//!
//! Interface numbers are dotted slot paths (`0/1`, `1/0/3`). EtherChannel
//! bundles reference an inclusive range of slots of a single type, written
//! `0/1-3` or `1/0/1-4`; a bare slot like `0/1` denotes a one-member range.

use crate::topology::types::InterfaceType;
use regex::Regex;
use std::sync::LazyLock;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+/)+)(\d+)-(\d+)$").unwrap());
static SINGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+/)+)(\d+)$").unwrap());

/// A parsed contiguous interface range within one slot prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    /// Slot prefix including the trailing slash (`0/`, `1/0/`).
    pub prefix: String,
    pub start: u32,
    pub end: u32,
}

impl ParsedRange {
    /// Number of member interfaces in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Member slot paths in ascending order (`0/1`, `0/2`, `0/3`).
    pub fn slots(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..=self.end).map(move |n| format!("{}{}", self.prefix, n))
    }

    /// Canonical range text (`0/1-3`), collapsing one-member ranges to the
    /// bare slot (`0/1`).
    pub fn display(&self) -> String {
        if self.start == self.end {
            format!("{}{}", self.prefix, self.start)
        } else {
            format!("{}{}-{}", self.prefix, self.start, self.end)
        }
    }
}

/// Parse a range string. Returns `None` for malformed input or a descending
/// range, which callers report as a conflict on the offending link.
pub fn parse_range(text: &str) -> Option<ParsedRange> {
    if let Some(caps) = RANGE_RE.captures(text) {
        let start: u32 = caps[2].parse().ok()?;
        let end: u32 = caps[3].parse().ok()?;
        if start > end {
            return None;
        }
        return Some(ParsedRange {
            prefix: caps[1].to_string(),
            start,
            end,
        });
    }
    if let Some(caps) = SINGLE_RE.captures(text) {
        let slot: u32 = caps[2].parse().ok()?;
        return Some(ParsedRange {
            prefix: caps[1].to_string(),
            start: slot,
            end: slot,
        });
    }
    None
}

/// Expand a range into full interface names for link emission
/// (`FastEthernet0/1`, `FastEthernet0/2`, ...).
pub fn expand_range(iface_type: InterfaceType, range: &ParsedRange) -> Vec<String> {
    range
        .slots()
        .map(|slot| format!("{}{}", iface_type, slot))
        .collect()
}
