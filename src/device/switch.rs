//! Layer-2 switch configurator.
//!
//! No IP routing here: the switch declares the project's VLAN database,
//! trunks toward routers, cores, and sibling switches, joins its EtherChannel
//! bundles, and assigns access ports for attached hosts. Remote management
//! goes through an SSHv2 block with a local user.

use crate::device::command::{BlockKind, CommandStream};
use crate::device::etherchannel;
use crate::device::switch_core::push_access_ports;
use crate::error::{GenError, Result};
use crate::plan::Plan;
use crate::topology::{edge_end, ConnectionType, DeviceKind, Node, Topology};

pub fn build_switch(topo: &Topology, plan: &Plan, switch: &Node) -> Result<CommandStream> {
    let mut stream = CommandStream::new(&switch.data.name);
    stream.push(
        BlockKind::Global,
        vec![
            format!("hostname {}", switch.data.name),
            "enable secret cisco".to_string(),
        ],
    );
    push_ssh_management(&mut stream);

    let mut vlan_lines = Vec::new();
    for vlan in &plan.vlans {
        vlan_lines.push(format!("vlan {}", vlan.vlan_id));
        vlan_lines.push(format!("name {}", vlan.name.to_lowercase()));
    }
    stream.push(BlockKind::VlanDb, vlan_lines);

    push_access_ports(topo, &switch.id, &mut stream);

    for idx in topo.incident_edges(&switch.id) {
        let edge = &topo.edges[*idx];
        let Some(end) = edge_end(edge, &switch.id) else {
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
                let peer_kind = topo.kind(end.peer_id());
                let is_uplink = matches!(
                    peer_kind,
                    Some(DeviceKind::Router | DeviceKind::SwitchCore | DeviceKind::Switch)
                );
                if !is_uplink {
                    continue;
                }
                let mut lines = vec![
                    format!("interface {}", end.local_interface()),
                    "switchport mode trunk".to_string(),
                ];
                // Untagged frames toward the core travel on the native VLAN.
                if peer_kind == Some(DeviceKind::SwitchCore) {
                    if let Some(native) = plan.native_vlan_id() {
                        lines.push(format!("switchport trunk native vlan {}", native));
                    }
                }
                lines.push("no shutdown".to_string());
                stream.push(BlockKind::Interface, lines);
            }
        }
    }

    Ok(stream)
}

/// SSHv2 remote access with a local user, standard on every managed switch.
fn push_ssh_management(stream: &mut CommandStream) {
    stream.push(
        BlockKind::Global,
        vec![
            "ip domain-name cisco.com".to_string(),
            "crypto key generate rsa general-keys modulus 2048".to_string(),
            "username admin password cisco".to_string(),
            "ip ssh ver 2".to_string(),
        ],
    );
    stream.push(
        BlockKind::Line,
        vec![
            "line vty 0 15".to_string(),
            "transport input ssh".to_string(),
            "login local".to_string(),
        ],
    );
}
