//! Static route solver.
//!
//! Runs a direction-respecting BFS from every layer-3 device over the routed
//! links. Everything a visited device knows (its backbone /30s and the VLAN
//! subnets it owns) becomes a candidate destination; networks the origin is
//! directly connected to are dropped, and the first-hop recorded when BFS
//! first left the origin is the next hop. BFS order guarantees the shortest
//! path wins on duplicates.

use ipnet::Ipv4Net;
use std::collections::{HashMap, HashSet, VecDeque};
use std::net::Ipv4Addr;

use crate::plan::{LinkPlan, StaticRoute, VlanPlan};
use crate::topology::Topology;

pub fn solve_routes(
    topo: &Topology,
    links: &HashMap<String, LinkPlan>,
    vlans: &[VlanPlan],
    vlan_owner: &HashMap<String, String>,
) -> HashMap<String, Vec<StaticRoute>> {
    let mut all_routes = HashMap::new();

    for device in topo.nodes.iter().filter(|n| n.data.kind.is_l3()) {
        let known = device_networks(topo, links, vlans, vlan_owner, &device.id);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(device.id.clone());
        let mut queue: VecDeque<(String, Ipv4Addr)> = VecDeque::new();

        for (neighbor, edge_idx) in topo.out_neighbors(&device.id) {
            let edge = &topo.edges[*edge_idx];
            let Some(link) = links.get(&edge.id) else {
                continue;
            };
            let Some(peer) = link.endpoint(neighbor) else {
                continue;
            };
            if visited.insert(neighbor.clone()) {
                queue.push_back((neighbor.clone(), peer.ip));
            }
        }

        let mut seen: HashSet<Ipv4Net> = HashSet::new();
        let mut reachable: Vec<StaticRoute> = Vec::new();
        while let Some((current, first_hop)) = queue.pop_front() {
            for net in device_networks(topo, links, vlans, vlan_owner, &current) {
                if !known.contains(&net) && seen.insert(net) {
                    reachable.push(StaticRoute {
                        destination: net,
                        next_hop: first_hop,
                    });
                }
            }
            for (neighbor, edge_idx) in topo.out_neighbors(&current) {
                let edge = &topo.edges[*edge_idx];
                if !links.contains_key(&edge.id) {
                    continue;
                }
                if visited.insert(neighbor.clone()) {
                    queue.push_back((neighbor.clone(), first_hop));
                }
            }
        }

        reachable.sort_by_key(|r| r.destination);
        log::debug!(
            "{}: {} static route(s) solved",
            device.data.name,
            reachable.len()
        );
        all_routes.insert(device.id.clone(), reachable);
    }

    all_routes
}

/// Every network one device is directly connected to: the /30 of each of its
/// planned links plus the subnets of the VLANs it owns.
fn device_networks(
    topo: &Topology,
    links: &HashMap<String, LinkPlan>,
    vlans: &[VlanPlan],
    vlan_owner: &HashMap<String, String>,
    device_id: &str,
) -> Vec<Ipv4Net> {
    let mut nets = Vec::new();
    for idx in topo.incident_edges(device_id) {
        if let Some(link) = links.get(&topo.edges[*idx].id) {
            nets.push(link.subnet);
        }
    }
    for vlan in vlans {
        if vlan_owner.get(&vlan.name).map(String::as_str) == Some(device_id) {
            nets.push(vlan.subnet);
        }
    }
    nets
}
