//! Derived plan values.
//!
//! A `Plan` is everything the configurators need, computed once per request:
//! the subnet registry, per-link /30 assignments, per-VLAN subnets with
//! gateway and DHCP policy, VLAN gateway ownership, and the solved static
//! routes. Plans are never mutated after the planners finish.

pub mod links;
pub mod routing;
pub mod vlans;

use ipnet::Ipv4Net;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::ip::SubnetRegistry;
use crate::topology::InterfaceRef;

/// First usable host of a subnet (network address + 1). Only meaningful for
/// prefixes of /30 and shorter, which is all this pipeline allocates.
pub fn first_usable(net: Ipv4Net) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(net.network()) + 1)
}

/// Last usable host of a subnet (broadcast - 1).
pub fn last_usable(net: Ipv4Net) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(net.broadcast()) - 1)
}

/// One side of a planned backbone link.
#[derive(Debug, Clone)]
pub struct EndpointPlan {
    pub device_id: String,
    pub iface: InterfaceRef,
    pub ip: Ipv4Addr,
}

/// A routed link with its /30 and both host assignments. `low` holds the
/// numerically lower host address.
#[derive(Debug, Clone)]
pub struct LinkPlan {
    pub edge_id: String,
    pub subnet: Ipv4Net,
    pub low: EndpointPlan,
    pub high: EndpointPlan,
}

impl LinkPlan {
    pub fn endpoint(&self, device_id: &str) -> Option<&EndpointPlan> {
        if self.low.device_id == device_id {
            Some(&self.low)
        } else if self.high.device_id == device_id {
            Some(&self.high)
        } else {
            None
        }
    }

    pub fn peer_endpoint(&self, device_id: &str) -> Option<&EndpointPlan> {
        if self.low.device_id == device_id {
            Some(&self.high)
        } else if self.high.device_id == device_id {
            Some(&self.low)
        } else {
            None
        }
    }
}

/// Planned VLAN: subnet, gateway (last usable host), and the fixed DHCP
/// exclusion window (first ten usable hosts, clamped to what exists).
#[derive(Debug, Clone)]
pub struct VlanPlan {
    pub name: String,
    pub vlan_id: u16,
    pub subnet: Ipv4Net,
    pub gateway: Ipv4Addr,
    pub excluded_first: Ipv4Addr,
    pub excluded_last: Ipv4Addr,
    pub is_native: bool,
}

/// One static route: destination network via a directly connected next hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    pub destination: Ipv4Net,
    pub next_hop: Ipv4Addr,
}

/// The complete derived plan for one generation request.
#[derive(Debug)]
pub struct Plan {
    pub registry: SubnetRegistry,
    /// Link plans keyed by edge id.
    pub links: HashMap<String, LinkPlan>,
    /// VLAN plans in declaration order.
    pub vlans: Vec<VlanPlan>,
    /// VLAN name -> id of the device that owns its gateway.
    pub vlan_owner: HashMap<String, String>,
    /// Device id -> solved static routes, destination ascending.
    pub routes: HashMap<String, Vec<StaticRoute>>,
}

impl Plan {
    pub fn link(&self, edge_id: &str) -> Option<&LinkPlan> {
        self.links.get(edge_id)
    }

    pub fn vlan(&self, name: &str) -> Option<&VlanPlan> {
        self.vlans.iter().find(|v| v.name == name)
    }

    /// VLANs whose gateway lives on the given device, declaration order.
    pub fn owned_vlans(&self, device_id: &str) -> Vec<&VlanPlan> {
        self.vlans
            .iter()
            .filter(|v| self.vlan_owner.get(&v.name).map(String::as_str) == Some(device_id))
            .collect()
    }

    pub fn routes_for(&self, device_id: &str) -> &[StaticRoute] {
        self.routes
            .get(device_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The native VLAN id, if one was declared.
    pub fn native_vlan_id(&self) -> Option<u16> {
        self.vlans.iter().find(|v| v.is_native).map(|v| v.vlan_id)
    }
}
