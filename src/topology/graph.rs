//! Normalized in-memory topology graph.
//!
//! Builds lookup maps and adjacency from the submitted payload, materializes
//! port-attached endpoint machines as real host nodes, and rebuilds the
//! per-device used-interface sets from the submitted link endpoints. Any
//! client-side interface cache is discarded; the graph is the single source
//! of truth for interface ownership.

use std::collections::{HashMap, HashSet};

use crate::error::{GenError, Result};
use crate::topology::types::{
    ConnectionType, DeviceKind, Edge, EdgeData, GenerationMode, InterfaceRef, InterfaceType, Node,
    NodeData, RoutingDirection, TopologyRequest, VlanDef,
};
use crate::utils::ifaces;

/// Horizontal spacing between synthesized host nodes placed under a switch.
const HOST_SPACING: f64 = 75.0;
const HOST_DROP: f64 = 50.0;

/// One side of an edge as seen from a specific device.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEnd<'a> {
    pub edge: &'a Edge,
    pub is_from: bool,
}

impl<'a> EdgeEnd<'a> {
    pub fn peer_id(&self) -> &'a str {
        if self.is_from {
            &self.edge.to
        } else {
            &self.edge.from
        }
    }

    pub fn local_interface(&self) -> &'a InterfaceRef {
        if self.is_from {
            &self.edge.data.from_interface
        } else {
            &self.edge.data.to_interface
        }
    }

    pub fn peer_interface(&self) -> &'a InterfaceRef {
        if self.is_from {
            &self.edge.data.to_interface
        } else {
            &self.edge.data.from_interface
        }
    }
}

/// View an edge from the side of `device_id`, or `None` if the edge does not
/// touch that device.
pub fn edge_end<'a>(edge: &'a Edge, device_id: &str) -> Option<EdgeEnd<'a>> {
    if edge.from == device_id {
        Some(EdgeEnd {
            edge,
            is_from: true,
        })
    } else if edge.to == device_id {
        Some(EdgeEnd {
            edge,
            is_from: false,
        })
    } else {
        None
    }
}

/// Normalized topology: nodes and edges in submission order plus the derived
/// indices the planners operate on.
#[derive(Debug)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub vlans: Vec<VlanDef>,
    pub base_octet: u8,
    pub mode: GenerationMode,
    node_index: HashMap<String, usize>,
    name_index: HashMap<String, usize>,
    incident: HashMap<String, Vec<usize>>,
    out_neighbors: HashMap<String, Vec<(String, usize)>>,
    used_interfaces: HashMap<String, HashSet<(InterfaceType, String)>>,
}

impl Topology {
    pub fn from_request(request: TopologyRequest) -> Result<Self> {
        if !(1..=223).contains(&request.base_network_octet) {
            return Err(GenError::InvalidTopology(format!(
                "base network octet {} outside the valid range 1-223",
                request.base_network_octet
            )));
        }

        let mut nodes = request.nodes;
        let mut edges = request.edges;
        synthesize_hosts(&mut nodes, &mut edges);

        let mut node_index = HashMap::new();
        let mut name_index = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), idx).is_some() {
                return Err(GenError::InvalidTopology(format!(
                    "duplicate device id '{}'",
                    node.id
                )));
            }
            if name_index.insert(node.data.name.clone(), idx).is_some() {
                return Err(GenError::InvalidTopology(format!(
                    "two devices share the name '{}'",
                    node.data.name
                )));
            }
        }

        for edge in &edges {
            for endpoint in [&edge.from, &edge.to] {
                if !node_index.contains_key(endpoint) {
                    return Err(GenError::InvalidTopology(format!(
                        "link '{}' references unknown device id '{}'",
                        edge.id, endpoint
                    )));
                }
            }
        }

        let mut incident: HashMap<String, Vec<usize>> = HashMap::new();
        let mut out_neighbors: HashMap<String, Vec<(String, usize)>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            incident.entry(edge.from.clone()).or_default().push(idx);
            incident.entry(edge.to.clone()).or_default().push(idx);

            match edge.data.routing_direction {
                RoutingDirection::Bidirectional => {
                    out_neighbors
                        .entry(edge.from.clone())
                        .or_default()
                        .push((edge.to.clone(), idx));
                    out_neighbors
                        .entry(edge.to.clone())
                        .or_default()
                        .push((edge.from.clone(), idx));
                }
                RoutingDirection::FromTo => {
                    out_neighbors
                        .entry(edge.from.clone())
                        .or_default()
                        .push((edge.to.clone(), idx));
                }
                RoutingDirection::ToFrom => {
                    out_neighbors
                        .entry(edge.to.clone())
                        .or_default()
                        .push((edge.from.clone(), idx));
                }
                RoutingDirection::None => {}
            }
        }

        let topo = Topology {
            used_interfaces: HashMap::new(),
            node_index,
            name_index,
            incident,
            out_neighbors,
            nodes,
            edges,
            vlans: request.vlans,
            base_octet: request.base_network_octet,
            mode: request.mode,
        };
        let used_interfaces = topo.rebuild_used_interfaces()?;
        Ok(Topology {
            used_interfaces,
            ..topo
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.name_index.get(name).map(|&idx| &self.nodes[idx])
    }

    pub fn kind(&self, id: &str) -> Option<DeviceKind> {
        self.node(id).map(|n| n.data.kind)
    }

    /// Human label for diagnostics; falls back to the raw id for nodes that
    /// vanished from the graph (which validation should have rejected).
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map(|n| n.data.name.as_str()).unwrap_or(id)
    }

    /// Edge indices incident to a device, in submission order.
    pub fn incident_edges(&self, id: &str) -> &[usize] {
        self.incident.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direction-respecting out-neighbors, in submission order.
    pub fn out_neighbors(&self, id: &str) -> &[(String, usize)] {
        self.out_neighbors
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn used_interfaces(&self, id: &str) -> Option<&HashSet<(InterfaceType, String)>> {
        self.used_interfaces.get(id)
    }

    /// Devices of one kind, in submission order.
    pub fn devices_of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.data.kind == kind)
    }

    /// Reconstruct which interfaces every device occupies, from link
    /// endpoints and EtherChannel member ranges. Two claims on the same
    /// `{type, number}` of one device are a hard conflict.
    fn rebuild_used_interfaces(
        &self,
    ) -> Result<HashMap<String, HashSet<(InterfaceType, String)>>> {
        let mut used: HashMap<String, HashSet<(InterfaceType, String)>> = HashMap::new();

        let claim = |used: &mut HashMap<String, HashSet<(InterfaceType, String)>>,
                         device_id: &str,
                         label: &str,
                         iface_type: InterfaceType,
                         number: String|
         -> Result<()> {
            let slot = (iface_type, number);
            if !used.entry(device_id.to_string()).or_default().insert(slot.clone()) {
                return Err(GenError::InterfaceConflict(format!(
                    "device '{}': interface {}{} is assigned twice",
                    label, slot.0, slot.1
                )));
            }
            Ok(())
        };

        for edge in &self.edges {
            match edge.data.connection_type {
                ConnectionType::Normal => {
                    claim(
                        &mut used,
                        &edge.from,
                        self.label(&edge.from),
                        edge.data.from_interface.iface_type,
                        edge.data.from_interface.number.clone(),
                    )?;
                    claim(
                        &mut used,
                        &edge.to,
                        self.label(&edge.to),
                        edge.data.to_interface.iface_type,
                        edge.data.to_interface.number.clone(),
                    )?;
                }
                ConnectionType::Etherchannel => {
                    let spec = edge.data.ether_channel.as_ref().ok_or_else(|| {
                        GenError::InvalidTopology(format!(
                            "link '{}' is marked etherchannel but carries no bundle data",
                            edge.id
                        ))
                    })?;
                    for kind in [self.kind(&edge.from), self.kind(&edge.to)] {
                        if !matches!(kind, Some(DeviceKind::Switch | DeviceKind::SwitchCore)) {
                            return Err(GenError::InvalidTopology(format!(
                                "etherchannel link '{}' must join two switches, got {} and {}",
                                edge.id,
                                self.label(&edge.from),
                                self.label(&edge.to)
                            )));
                        }
                    }
                    let from_range = ifaces::parse_range(&spec.from_range).ok_or_else(|| {
                        GenError::InterfaceConflict(format!(
                            "link '{}': etherchannel range '{}' is not a contiguous range",
                            edge.id, spec.from_range
                        ))
                    })?;
                    let to_range = ifaces::parse_range(&spec.to_range).ok_or_else(|| {
                        GenError::InterfaceConflict(format!(
                            "link '{}': etherchannel range '{}' is not a contiguous range",
                            edge.id, spec.to_range
                        ))
                    })?;
                    if from_range.len() != to_range.len() {
                        return Err(GenError::InterfaceConflict(format!(
                            "link '{}': etherchannel ranges '{}' and '{}' differ in length",
                            edge.id, spec.from_range, spec.to_range
                        )));
                    }
                    for slot in from_range.slots() {
                        claim(
                            &mut used,
                            &edge.from,
                            self.label(&edge.from),
                            spec.from_type,
                            slot,
                        )?;
                    }
                    for slot in to_range.slots() {
                        claim(
                            &mut used,
                            &edge.to,
                            self.label(&edge.to),
                            spec.to_type,
                            slot,
                        )?;
                    }
                }
            }
        }

        Ok(used)
    }
}

/// Materialize port-attached endpoint machines as host nodes with synthetic
/// edges, so every later stage (access ports, placement, link emission) sees
/// one uniform graph. Names are globally unique (`PC1`, `PC2`, ...) in
/// submission order.
fn synthesize_hosts(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let mut pc_counter = 1usize;
    let mut new_nodes = Vec::new();
    let mut new_edges = Vec::new();

    for node in nodes.iter() {
        if !matches!(node.data.kind, DeviceKind::Switch | DeviceKind::SwitchCore) {
            continue;
        }
        let mut offset = 0.0;
        for pc in &node.data.computers {
            let host_name = format!("PC{}", pc_counter);
            pc_counter += 1;
            let host_id = format!("{}_pc_{}", node.id, pc.name);

            new_nodes.push(Node {
                id: host_id.clone(),
                label: Some(host_name.clone()),
                x: node.x.map(|x| x + HOST_SPACING - offset),
                y: node.y.map(|y| y + HOST_DROP),
                data: NodeData {
                    kind: DeviceKind::Host,
                    name: host_name,
                    model: None,
                    computers: Vec::new(),
                    vlan: pc.vlan.clone(),
                },
            });
            new_edges.push(Edge {
                id: format!("edge_{}_to_{}", node.id, host_id),
                from: node.id.clone(),
                to: host_id,
                data: EdgeData {
                    from_interface: InterfaceRef::new(pc.port_type, pc.port_number.clone()),
                    to_interface: InterfaceRef::new(InterfaceType::FastEthernet, "0"),
                    routing_direction: RoutingDirection::None,
                    connection_type: ConnectionType::Normal,
                    ether_channel: None,
                },
            });
            offset += HOST_SPACING;
        }
    }

    nodes.extend(new_nodes);
    edges.extend(new_edges);
}
