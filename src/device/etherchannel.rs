//! EtherChannel bundle composer.
//!
//! Turns an EtherChannel link into the per-endpoint command blocks: the
//! member `interface range` with its `channel-group`, and the matching
//! port-channel interface. Negotiation modes follow the protocol and side:
//!
//! |        | from side   | to side  |
//! |--------|-------------|----------|
//! | LACP   | `active`    | `passive`|
//! | PAgP   | `desirable` | `auto`   |

use crate::device::command::{Block, BlockKind};
use crate::error::{GenError, Result};
use crate::topology::{EcProtocol, EtherChannelSpec, InterfaceType};
use crate::utils::ifaces;

/// Negotiation keyword for one side of the bundle.
fn channel_mode(protocol: EcProtocol, is_from: bool) -> &'static str {
    match (protocol, is_from) {
        (EcProtocol::Lacp, true) => "active",
        (EcProtocol::Lacp, false) => "passive",
        (EcProtocol::Pagp, true) => "desirable",
        (EcProtocol::Pagp, false) => "auto",
    }
}

/// Build the blocks this endpoint contributes: the member range and the
/// port-channel interface. Range validity was established when the graph
/// rebuilt interface ownership; a parse failure here means the plan is
/// inconsistent.
pub fn bundle_blocks(spec: &EtherChannelSpec, is_from: bool) -> Result<Vec<Block>> {
    let (iface_type, range_text) = side_range(spec, is_from);
    let range = ifaces::parse_range(range_text).ok_or_else(|| {
        GenError::ConfigBuildFailure(format!(
            "etherchannel range '{}' survived validation but does not parse",
            range_text
        ))
    })?;
    let mode = channel_mode(spec.protocol, is_from);

    Ok(vec![
        Block {
            kind: BlockKind::Interface,
            lines: vec![
                format!("interface range {}{}", iface_type, range.display()),
                "switchport mode trunk".to_string(),
                format!("channel-group {} mode {}", spec.group, mode),
                "no shutdown".to_string(),
            ],
        },
        Block {
            kind: BlockKind::Interface,
            lines: vec![
                format!("interface Port-channel{}", spec.group),
                "switchport mode trunk".to_string(),
            ],
        },
    ])
}

/// Full member interface names for one side, for physical link emission.
pub fn member_interfaces(spec: &EtherChannelSpec, is_from: bool) -> Vec<String> {
    let (iface_type, range_text) = side_range(spec, is_from);
    match ifaces::parse_range(range_text) {
        Some(range) => ifaces::expand_range(iface_type, &range),
        None => Vec::new(),
    }
}

fn side_range(spec: &EtherChannelSpec, is_from: bool) -> (InterfaceType, &str) {
    if is_from {
        (spec.from_type, &spec.from_range)
    } else {
        (spec.to_type, &spec.to_range)
    }
}
