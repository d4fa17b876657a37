//! Layer-3 core switch configurator.
//!
//! A core routes between VLANs itself: `ip routing` globally, one SVI per
//! owned VLAN acting as the gateway, `no switchport` backbone uplinks toward
//! routers and other cores, trunks toward plain switches, access ports for
//! attached hosts, DHCP pools, and the terminal routes block.

use crate::device::command::{BlockKind, CommandStream};
use crate::device::etherchannel;
use crate::device::router::{push_backbone_interfaces, push_routes};
use crate::error::{GenError, Result};
use crate::plan::Plan;
use crate::topology::types::vlan_id_from_name;
use crate::topology::{edge_end, ConnectionType, DeviceKind, Node, Topology};

pub fn build_switch_core(topo: &Topology, plan: &Plan, core: &Node) -> Result<CommandStream> {
    let mut stream = CommandStream::new(&core.data.name);
    stream.push(
        BlockKind::Global,
        vec![
            format!("hostname {}", core.data.name),
            "enable secret cisco".to_string(),
            "ip routing".to_string(),
        ],
    );

    push_vlan_database(topo, plan, core, &mut stream);
    push_backbone_interfaces(topo, plan, &core.id, &mut stream);
    push_access_ports(topo, &core.id, &mut stream);
    push_trunks_and_bundles(topo, plan, core, &mut stream)?;

    let owned = plan.owned_vlans(&core.id);
    for vlan in &owned {
        stream.push(
            BlockKind::Interface,
            vec![
                format!("interface vlan {}", vlan.vlan_id),
                format!("ip address {} {}", vlan.gateway, vlan.subnet.netmask()),
                "no shutdown".to_string(),
            ],
        );
    }
    for vlan in &owned {
        stream.push(
            BlockKind::Pool,
            vec![
                format!(
                    "ip dhcp excluded-address {} {}",
                    vlan.excluded_first, vlan.excluded_last
                ),
                format!("ip dhcp pool vlan{}", vlan.vlan_id),
                format!("network {} {}", vlan.subnet.network(), vlan.subnet.netmask()),
                format!("default-router {}", vlan.gateway),
            ],
        );
    }

    push_routes(plan, &core.id, &mut stream);
    Ok(stream)
}

/// VLAN database. With a plain switch downstream the core declares every
/// VLAN in the project so its trunks carry them; otherwise only the VLANs it
/// terminates.
fn push_vlan_database(topo: &Topology, plan: &Plan, core: &Node, stream: &mut CommandStream) {
    let has_plain_switch = topo.incident_edges(&core.id).iter().any(|idx| {
        edge_end(&topo.edges[*idx], &core.id)
            .map(|end| topo.kind(end.peer_id()) == Some(DeviceKind::Switch))
            .unwrap_or(false)
    });

    let mut lines = Vec::new();
    if has_plain_switch {
        for vlan in &plan.vlans {
            lines.push(format!("vlan {}", vlan.vlan_id));
            lines.push(format!("name {}", vlan.name.to_lowercase()));
        }
    } else {
        for vlan in plan.owned_vlans(&core.id) {
            lines.push(format!("vlan {}", vlan.vlan_id));
            lines.push(format!("name {}", vlan.name.to_lowercase()));
        }
    }
    stream.push(BlockKind::VlanDb, lines);
}

/// Trunk ports and EtherChannel bundles toward plain switches.
fn push_trunks_and_bundles(
    topo: &Topology,
    plan: &Plan,
    core: &Node,
    stream: &mut CommandStream,
) -> Result<()> {
    for idx in topo.incident_edges(&core.id) {
        let edge = &topo.edges[*idx];
        let Some(end) = edge_end(edge, &core.id) else {
            continue;
        };
        match edge.data.connection_type {
            ConnectionType::Etherchannel => {
                let spec = edge.data.ether_channel.as_ref().ok_or_else(|| {
                    GenError::ConfigBuildFailure(format!(
                        "link '{}' lost its etherchannel data after validation",
                        edge.id
                    ))
                })?;
                for block in etherchannel::bundle_blocks(spec, end.is_from)? {
                    stream.push_block(block);
                }
            }
            ConnectionType::Normal => {
                if topo.kind(end.peer_id()) != Some(DeviceKind::Switch) {
                    continue;
                }
                let mut lines = vec![
                    format!("interface {}", end.local_interface()),
                    "switchport trunk encapsulation dot1Q".to_string(),
                    "switchport mode trunk".to_string(),
                ];
                if let Some(native) = plan.native_vlan_id() {
                    lines.push(format!("switchport trunk native vlan {}", native));
                }
                lines.push("no shutdown".to_string());
                stream.push(BlockKind::Interface, lines);
            }
        }
    }
    Ok(())
}

/// Access ports for hosts hanging directly off a switch, in edge submission
/// order. Shared with the layer-2 configurator.
pub(crate) fn push_access_ports(topo: &Topology, device_id: &str, stream: &mut CommandStream) {
    for idx in topo.incident_edges(device_id) {
        let edge = &topo.edges[*idx];
        let Some(end) = edge_end(edge, device_id) else {
            continue;
        };
        let Some(peer) = topo.node(end.peer_id()) else {
            continue;
        };
        if peer.data.kind != DeviceKind::Host {
            continue;
        }
        let Some(vlan_id) = peer.data.vlan.as_deref().and_then(vlan_id_from_name) else {
            log::debug!(
                "host '{}' on '{}' has no VLAN; leaving its port unconfigured",
                peer.data.name,
                topo.label(device_id)
            );
            continue;
        };
        stream.push(
            BlockKind::Interface,
            vec![
                format!("interface {}", end.local_interface()),
                format!("switchport access vlan {}", vlan_id),
                "no shutdown".to_string(),
            ],
        );
    }
}
