//! VLAN subnet planner and gateway ownership.
//!
//! Each declared VLAN gets exactly one subnet of its declared prefix,
//! allocated in declaration order. The gateway is pinned to the last usable
//! host and the DHCP exclusion window to the first ten usable hosts; neither
//! is user-configurable.
//!
//! Ownership rule: a core switch owns every VLAN referenced by hosts attached
//! to it or to plain switches in its layer-2 reach; a router that faces at
//! least one plain switch owns the VLANs referenced through those switches
//! that no core has claimed. A router whose only switch neighbors are cores
//! owns nothing.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::net::Ipv4Addr;

use crate::error::{GenError, Result};
use crate::ip::{SubnetAllocator, SubnetRegistry};
use crate::plan::{first_usable, last_usable, VlanPlan};
use crate::topology::types::vlan_id_from_name;
use crate::topology::{edge_end, DeviceKind, Topology};

/// How many leading usable hosts the DHCP server must never lease.
const DHCP_EXCLUDED_HOSTS: u32 = 10;

pub fn plan_vlans(
    topo: &Topology,
    alloc: &mut SubnetAllocator,
    registry: &mut SubnetRegistry,
) -> Result<Vec<VlanPlan>> {
    let mut seen_names = HashSet::new();
    let mut native_count = 0usize;
    let mut plans = Vec::with_capacity(topo.vlans.len());

    for vlan in &topo.vlans {
        if !seen_names.insert(vlan.name.as_str()) {
            return Err(GenError::InvalidVlan(format!(
                "VLAN '{}' is declared twice",
                vlan.name
            )));
        }
        if vlan.is_native {
            native_count += 1;
            if native_count > 1 {
                return Err(GenError::InvalidVlan(format!(
                    "'{}' marks a second native VLAN; at most one is allowed",
                    vlan.name
                )));
            }
        }
        if vlan.prefix < 8 || vlan.prefix > 30 {
            return Err(GenError::InvalidVlan(format!(
                "'{}': prefix /{} outside the supported range /8-/30 (a DHCP \
                 pool needs at least two usable hosts)",
                vlan.name, vlan.prefix
            )));
        }
        let vlan_id = vlan_id_from_name(&vlan.name).ok_or_else(|| {
            GenError::InvalidVlan(format!(
                "'{}' carries no numeric VLAN id in its name",
                vlan.name
            ))
        })?;

        let subnet = alloc.allocate(vlan.prefix)?;
        let gateway = last_usable(subnet);
        let excluded_first = first_usable(subnet);
        let excluded_last = Ipv4Addr::from(
            (u32::from(subnet.network()) + DHCP_EXCLUDED_HOSTS).min(u32::from(gateway) - 1),
        );

        log::info!(
            "vlan {} ({}): {} gateway {}",
            vlan_id,
            vlan.name,
            subnet,
            gateway
        );
        registry.record_vlan(&vlan.name, subnet);
        plans.push(VlanPlan {
            name: vlan.name.clone(),
            vlan_id,
            subnet,
            gateway,
            excluded_first,
            excluded_last,
            is_native: vlan.is_native,
        });
    }

    Ok(plans)
}

/// Decide which layer-3 device owns each VLAN gateway. Core switches claim
/// first (submission order), then routers pick up what remains through their
/// plain-switch neighborhoods. First claimant wins.
pub fn assign_owners(topo: &Topology, plans: &[VlanPlan]) -> HashMap<String, String> {
    let declared: HashSet<&str> = plans.iter().map(|p| p.name.as_str()).collect();
    let mut owner: HashMap<String, String> = HashMap::new();

    let claim = |owner: &mut HashMap<String, String>,
                     device_id: &str,
                     names: &BTreeSet<String>| {
        for name in names {
            if declared.contains(name.as_str()) && !owner.contains_key(name) {
                owner.insert(name.clone(), device_id.to_string());
            }
        }
    };

    for core in topo.devices_of_kind(DeviceKind::SwitchCore) {
        let mut names = host_vlans_of(topo, &core.id);
        for idx in topo.incident_edges(&core.id) {
            let end = match edge_end(&topo.edges[*idx], &core.id) {
                Some(end) => end,
                None => continue,
            };
            if topo.kind(end.peer_id()) == Some(DeviceKind::Switch) {
                names.extend(l2_domain_vlans(topo, end.peer_id()));
            }
        }
        claim(&mut owner, &core.id, &names);
    }

    for router in topo.devices_of_kind(DeviceKind::Router) {
        let mut names = BTreeSet::new();
        for idx in topo.incident_edges(&router.id) {
            let end = match edge_end(&topo.edges[*idx], &router.id) {
                Some(end) => end,
                None => continue,
            };
            if topo.kind(end.peer_id()) == Some(DeviceKind::Switch) {
                names.extend(l2_domain_vlans(topo, end.peer_id()));
            }
        }
        claim(&mut owner, &router.id, &names);
    }

    owner
}

/// VLAN names referenced by hosts directly attached to one device.
fn host_vlans_of(topo: &Topology, device_id: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for idx in topo.incident_edges(device_id) {
        let end = match edge_end(&topo.edges[*idx], device_id) {
            Some(end) => end,
            None => continue,
        };
        if let Some(peer) = topo.node(end.peer_id()) {
            if peer.data.kind == DeviceKind::Host {
                if let Some(vlan) = &peer.data.vlan {
                    names.insert(vlan.clone());
                }
            }
        }
    }
    names
}

/// Walk the plain-switch broadcast domain starting at one switch and collect
/// every VLAN its hosts reference. Stops at routers and cores.
fn l2_domain_vlans(topo: &Topology, start_switch: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start_switch);
    queue.push_back(start_switch.to_string());

    while let Some(switch_id) = queue.pop_front() {
        names.extend(host_vlans_of(topo, &switch_id));
        for idx in topo.incident_edges(&switch_id) {
            let end = match edge_end(&topo.edges[*idx], &switch_id) {
                Some(end) => end,
                None => continue,
            };
            if topo.kind(end.peer_id()) == Some(DeviceKind::Switch) {
                if let Some(peer) = topo.node(end.peer_id()) {
                    if visited.insert(peer.id.as_str()) {
                        queue.push_back(peer.id.clone());
                    }
                }
            }
        }
    }

    names
}
