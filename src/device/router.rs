//! Router configurator.
//!
//! Emits backbone interface addressing, the dot1Q subinterface fan-out for
//! every VLAN the router owns, the matching DHCP pools, and the terminal
//! static-routes block. All subinterfaces live on the router's first
//! interface facing a plain layer-2 switch; IOS only supports trunking a
//! VLAN set through one physical port.

use crate::device::command::{BlockKind, CommandStream};
use crate::error::{GenError, Result};
use crate::plan::Plan;
use crate::topology::{edge_end, DeviceKind, InterfaceRef, Node, Topology};

pub fn build_router(topo: &Topology, plan: &Plan, router: &Node) -> Result<CommandStream> {
    let mut stream = CommandStream::new(&router.data.name);
    stream.push(
        BlockKind::Global,
        vec![
            format!("hostname {}", router.data.name),
            "enable secret cisco".to_string(),
        ],
    );

    push_backbone_interfaces(topo, plan, &router.id, &mut stream);

    let owned = plan.owned_vlans(&router.id);
    if !owned.is_empty() {
        let trunk = primary_l2_interface(topo, &router.id).ok_or_else(|| {
            GenError::ConfigBuildFailure(format!(
                "router '{}' owns VLAN gateways but has no switch-facing interface",
                router.data.name
            ))
        })?;

        stream.push(
            BlockKind::Interface,
            vec![format!("interface {}", trunk), "no shutdown".to_string()],
        );
        for vlan in &owned {
            stream.push(
                BlockKind::Interface,
                vec![
                    format!("interface {}.{}", trunk, vlan.vlan_id),
                    format!("encapsulation dot1Q {}", vlan.vlan_id),
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
    }

    push_routes(plan, &router.id, &mut stream);
    Ok(stream)
}

/// Backbone interface blocks shared by routers and core switches. Core
/// switch ports additionally need `no switchport` before they accept an
/// address.
pub(crate) fn push_backbone_interfaces(
    topo: &Topology,
    plan: &Plan,
    device_id: &str,
    stream: &mut CommandStream,
) {
    let no_switchport = topo.kind(device_id) == Some(DeviceKind::SwitchCore);
    for idx in topo.incident_edges(device_id) {
        let edge = &topo.edges[*idx];
        let Some(link) = plan.link(&edge.id) else {
            continue;
        };
        let Some(endpoint) = link.endpoint(device_id) else {
            continue;
        };
        let mut lines = vec![format!("interface {}", endpoint.iface)];
        if no_switchport {
            lines.push("no switchport".to_string());
        }
        lines.push(format!(
            "ip address {} {}",
            endpoint.ip,
            link.subnet.netmask()
        ));
        lines.push("no shutdown".to_string());
        stream.push(BlockKind::Interface, lines);
    }
}

/// Terminal static-routes block, present on every layer-3 device.
pub(crate) fn push_routes(plan: &Plan, device_id: &str, stream: &mut CommandStream) {
    let lines = plan
        .routes_for(device_id)
        .iter()
        .map(|route| {
            format!(
                "ip route {} {} {}",
                route.destination.network(),
                route.destination.netmask(),
                route.next_hop
            )
        })
        .collect();
    stream.push(BlockKind::Routes, lines);
}

/// The router's first interface (submission order) facing a plain switch.
fn primary_l2_interface(topo: &Topology, router_id: &str) -> Option<InterfaceRef> {
    for idx in topo.incident_edges(router_id) {
        let Some(end) = edge_end(&topo.edges[*idx], router_id) else {
            continue;
        };
        if topo.kind(end.peer_id()) == Some(DeviceKind::Switch) {
            return Some(end.local_interface().clone());
        }
    }
    None
}
