//! Simulator driver script.
//!
//! A scripted placement-and-configuration program for the external network
//! simulator: `addDevice` with remapped coordinates for every device,
//! expansion modules for routers, `configureIosDevice` with the full command
//! stream folded onto one line, physical `addLink` statements mirroring the
//! graph (EtherChannel bundles become one cable per member pair), and DHCP
//! activation for every endpoint machine.

use crate::coords;
use crate::device::etherchannel;
use crate::emit::RenderedConfig;
use crate::physical::driver_model_tag;
use crate::topology::{ConnectionType, DeviceKind, Topology};

/// Router expansion slots populated with single-port Ethernet WICs.
const ROUTER_MODULE_SLOTS: [&str; 4] = ["0/0", "0/1", "0/2", "0/3"];
const ROUTER_MODULE: &str = "WIC-1ENET";

pub fn render_driver(topo: &Topology, configs: &[RenderedConfig], scale: f64) -> String {
    let positions = coords::remap_positions(&topo.nodes, scale);
    let mut out: Vec<String> = Vec::new();

    for node in &topo.nodes {
        let (x, y) = positions
            .get(&node.id)
            .copied()
            .unwrap_or((coords::TARGET_CENTER_X as i32, coords::TARGET_CENTER_Y as i32));
        let model = driver_model_tag(node.data.kind, node.data.model.as_deref(), topo.mode);
        out.push(format!(
            "addDevice(\"{}\", \"{}\", {}, {});",
            node.data.name, model, x, y
        ));
    }
    out.push(String::new());

    for node in topo.devices_of_kind(DeviceKind::Router) {
        for slot in ROUTER_MODULE_SLOTS {
            out.push(format!(
                "addModule(\"{}\", \"{}\", \"{}\");",
                node.data.name, slot, ROUTER_MODULE
            ));
        }
    }
    out.push(String::new());

    for config in configs {
        out.push(format!(
            "configureIosDevice(\"{}\", \"{}\");",
            config.name,
            fold_config(&config.lines)
        ));
    }
    out.push(String::new());

    for edge in &topo.edges {
        let from_name = topo.label(&edge.from);
        let to_name = topo.label(&edge.to);
        match edge.data.connection_type {
            ConnectionType::Etherchannel => {
                let Some(spec) = edge.data.ether_channel.as_ref() else {
                    continue;
                };
                let from_members = etherchannel::member_interfaces(spec, true);
                let to_members = etherchannel::member_interfaces(spec, false);
                for (from_if, to_if) in from_members.iter().zip(to_members.iter()) {
                    out.push(link_line(from_name, from_if, to_name, to_if));
                }
            }
            ConnectionType::Normal => {
                out.push(link_line(
                    from_name,
                    &edge.data.from_interface.to_string(),
                    to_name,
                    &edge.data.to_interface.to_string(),
                ));
            }
        }
    }
    out.push(String::new());

    for node in topo.devices_of_kind(DeviceKind::Host) {
        out.push(format!("configurePcIp(\"{}\", true);", node.data.name));
    }

    out.join("\n") + "\n"
}

/// Fold a command stream onto a single script line: blank lines dropped,
/// newlines escaped, embedded quotes escaped.
fn fold_config(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.replace('"', "\\\""))
        .collect::<Vec<_>>()
        .join("\\n")
}

fn link_line(from_name: &str, from_if: &str, to_name: &str, to_if: &str) -> String {
    format!(
        "addLink(\"{}\", \"{}\", \"{}\", \"{}\", \"straight\");",
        from_name, from_if, to_name, to_if
    )
}
