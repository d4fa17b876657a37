//! Backbone link planner.
//!
//! Assigns one /30 to every routed link. A link is routed iff both endpoints
//! are layer-3 devices and its routing direction is not `none`; EtherChannel
//! bundles stay at layer 2 and are never given a subnet. Host assignment is
//! deterministic: endpoints ordered by (kind priority, name) take the lower
//! and upper usable address.

use std::collections::HashMap;

use crate::error::Result;
use crate::ip::{SubnetAllocator, SubnetRegistry};
use crate::plan::{first_usable, EndpointPlan, LinkPlan};
use crate::topology::{ConnectionType, RoutingDirection, Topology};

pub fn plan_links(
    topo: &Topology,
    alloc: &mut SubnetAllocator,
    registry: &mut SubnetRegistry,
) -> Result<HashMap<String, LinkPlan>> {
    let mut plans = HashMap::new();

    for edge in &topo.edges {
        if edge.data.connection_type != ConnectionType::Normal {
            continue;
        }
        if edge.data.routing_direction == RoutingDirection::None {
            continue;
        }
        let from_kind = match topo.kind(&edge.from) {
            Some(k) if k.is_l3() => k,
            _ => continue,
        };
        let to_kind = match topo.kind(&edge.to) {
            Some(k) if k.is_l3() => k,
            _ => continue,
        };

        let subnet = alloc.allocate(30)?;
        let lower_ip = first_usable(subnet);
        let upper_ip = std::net::Ipv4Addr::from(u32::from(lower_ip) + 1);

        let from_name = topo.label(&edge.from).to_string();
        let to_name = topo.label(&edge.to).to_string();
        let from_first = (from_kind.backbone_priority(), from_name.as_str())
            <= (to_kind.backbone_priority(), to_name.as_str());

        let from_endpoint = |ip| EndpointPlan {
            device_id: edge.from.clone(),
            iface: edge.data.from_interface.clone(),
            ip,
        };
        let to_endpoint = |ip| EndpointPlan {
            device_id: edge.to.clone(),
            iface: edge.data.to_interface.clone(),
            ip,
        };

        let (low, high) = if from_first {
            (from_endpoint(lower_ip), to_endpoint(upper_ip))
        } else {
            (to_endpoint(lower_ip), from_endpoint(upper_ip))
        };

        log::info!(
            "backbone {}: {} {} <-> {} {}",
            subnet,
            topo.label(&low.device_id),
            low.ip,
            topo.label(&high.device_id),
            high.ip
        );
        registry.record_backbone(
            &edge.id,
            topo.label(&low.device_id),
            topo.label(&high.device_id),
            subnet,
        );
        plans.insert(
            edge.id.clone(),
            LinkPlan {
                edge_id: edge.id.clone(),
                subnet,
                low,
                high,
            },
        );
    }

    Ok(plans)
}
