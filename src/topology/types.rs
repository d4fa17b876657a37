//! Topology payload type definitions.
//!
//! This file contains the serde model for the topology document submitted by
//! the designer front end: devices, links, VLAN declarations, and the
//! per-request generation settings.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Device classification used throughout the pipeline.
///
/// `Host` covers endpoint machines; the wire format historically spelled it
/// `computer` (and `server` for rack machines), both of which are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Router,
    SwitchCore,
    Switch,
    #[serde(alias = "computer", alias = "server")]
    Host,
}

impl DeviceKind {
    /// Layer-3 devices terminate routed links and carry static routes.
    pub fn is_l3(self) -> bool {
        matches!(self, DeviceKind::Router | DeviceKind::SwitchCore)
    }

    /// Ordering priority for deterministic /30 host assignment:
    /// routers sort before core switches.
    pub fn backbone_priority(self) -> u8 {
        match self {
            DeviceKind::Router => 0,
            DeviceKind::SwitchCore => 1,
            DeviceKind::Switch => 2,
            DeviceKind::Host => 3,
        }
    }
}

/// Interface hardware families understood by the generator.
///
/// The designer sends full names on link endpoints but short names (`fa`,
/// `gi`, `eth`) on EtherChannel records; both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum InterfaceType {
    #[serde(rename = "FastEthernet", alias = "fa")]
    FastEthernet,
    #[serde(rename = "GigabitEthernet", alias = "gi")]
    GigabitEthernet,
    #[serde(rename = "Ethernet", alias = "eth")]
    Ethernet,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterfaceType::FastEthernet => "FastEthernet",
            InterfaceType::GigabitEthernet => "GigabitEthernet",
            InterfaceType::Ethernet => "Ethernet",
        };
        f.write_str(name)
    }
}

/// One interface endpoint: family plus dotted slot path (`0/1`, `1/0/3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct InterfaceRef {
    #[serde(rename = "type")]
    pub iface_type: InterfaceType,
    pub number: String,
}

impl InterfaceRef {
    pub fn new(iface_type: InterfaceType, number: impl Into<String>) -> Self {
        Self {
            iface_type,
            number: number.into(),
        }
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.iface_type, self.number)
    }
}

/// Which way static routes may flow across a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingDirection {
    #[default]
    Bidirectional,
    FromTo,
    ToFrom,
    None,
}

/// Physical connection style of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Normal,
    Etherchannel,
}

/// Link-aggregation negotiation protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcProtocol {
    Lacp,
    Pagp,
}

/// EtherChannel bundle description attached to a link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherChannelSpec {
    pub protocol: EcProtocol,
    pub group: u8,
    pub from_type: InterfaceType,
    pub to_type: InterfaceType,
    /// Inclusive contiguous range like `0/1-3`, or a single slot `0/1`.
    pub from_range: String,
    pub to_range: String,
}

/// Endpoint machine attached to a switch by port rather than by graph edge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedHost {
    pub name: String,
    pub port_type: InterfaceType,
    pub port_number: String,
    #[serde(default)]
    pub vlan: Option<String>,
}

/// Payload of one device node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeData {
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub computers: Vec<AttachedHost>,
    #[serde(default)]
    pub vlan: Option<String>,
}

/// One device on the canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    pub data: NodeData,
}

/// Payload of one link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub from_interface: InterfaceRef,
    pub to_interface: InterfaceRef,
    #[serde(default)]
    pub routing_direction: RoutingDirection,
    #[serde(default)]
    pub connection_type: ConnectionType,
    #[serde(default)]
    pub ether_channel: Option<EtherChannelSpec>,
}

/// One link between two devices. Direction carries routing semantics only;
/// physical connectivity is symmetric.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub from: String,
    #[serde(deserialize_with = "id_string")]
    pub to: String,
    pub data: EdgeData,
}

/// Declared VLAN: the numeric id is the digit run embedded in the name
/// (`VLAN10` becomes 10).
#[derive(Debug, Clone, Deserialize)]
pub struct VlanDef {
    pub name: String,
    pub prefix: u8,
    #[serde(default, rename = "isNative")]
    pub is_native: bool,
}

/// Generation mode: digital uses the generic interface catalogue, physical
/// requires a concrete model tag on every routed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Digital,
    Physical,
}

/// The complete request document as received from the front end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub vlans: Vec<VlanDef>,
    #[serde(default = "default_base_octet")]
    pub base_network_octet: u8,
    #[serde(default)]
    pub mode: GenerationMode,
}

fn default_base_octet() -> u8 {
    19
}

/// Extract the numeric VLAN id from a VLAN name ("VLAN10" -> 10).
pub fn vlan_id_from_name(name: &str) -> Option<u16> {
    let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Node ids arrive as either JSON strings or integers depending on the
/// designer version; normalize both to strings.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
