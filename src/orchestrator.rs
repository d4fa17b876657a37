//! Generation orchestrator.
//!
//! Coordinates one request through the fixed pipeline: normalize the graph,
//! plan backbone links, plan VLANs and gateway ownership, solve static
//! routes, build per-device command streams, and run the emitters. The whole
//! computation is pure and per-request; failures surface as one categorized
//! error and emit nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::device::{build_router, build_switch, build_switch_core};
use crate::emit::{render_bundles, render_driver, render_report, Bundles, RenderedConfig};
use crate::error::{GenError, Result};
use crate::ip::{SubnetAllocator, SubnetRegistry};
use crate::physical::validate_inventories;
use crate::plan::links::plan_links;
use crate::plan::routing::solve_routes;
use crate::plan::vlans::{assign_owners, plan_vlans};
use crate::plan::Plan;
use crate::topology::{DeviceKind, GenerationMode, Topology, TopologyRequest};

/// Cooperative cancellation handle. The pipeline polls it between stages
/// only; a cancelled run returns `GenError::Cancelled` and produces nothing.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-request generation settings supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Coordinate scale factor for the simulator driver; 0 or unset means 1.0.
    pub scale: Option<f64>,
    pub cancel: Option<CancelFlag>,
}

/// Everything one successful run produces.
#[derive(Debug)]
pub struct GenerationOutput {
    pub bundles: Bundles,
    pub report: String,
    /// Absent in physical mode, where no simulator build is scripted.
    pub driver: Option<String>,
    pub configs: Vec<RenderedConfig>,
    pub plan: Plan,
}

pub fn generate(request: TopologyRequest, options: &GenerationOptions) -> Result<GenerationOutput> {
    let check_cancel = || -> Result<()> {
        if options.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            Err(GenError::Cancelled)
        } else {
            Ok(())
        }
    };

    check_cancel()?;
    let topo = Topology::from_request(request)?;
    validate_inventories(&topo)?;
    log::info!(
        "topology normalized: {} devices, {} links, {} VLANs, base {}.0.0.0/8",
        topo.nodes.len(),
        topo.edges.len(),
        topo.vlans.len(),
        topo.base_octet
    );

    check_cancel()?;
    let mut alloc = SubnetAllocator::for_octet(topo.base_octet);
    let mut registry = SubnetRegistry::new();
    let links = plan_links(&topo, &mut alloc, &mut registry)?;

    check_cancel()?;
    let vlans = plan_vlans(&topo, &mut alloc, &mut registry)?;
    let vlan_owner = assign_owners(&topo, &vlans);

    check_cancel()?;
    let routes = solve_routes(&topo, &links, &vlans, &vlan_owner);
    let plan = Plan {
        registry,
        links,
        vlans,
        vlan_owner,
        routes,
    };

    check_cancel()?;
    let mut configs = Vec::new();
    for node in &topo.nodes {
        let stream = match node.data.kind {
            DeviceKind::Router => build_router(&topo, &plan, node)?,
            DeviceKind::SwitchCore => build_switch_core(&topo, &plan, node)?,
            DeviceKind::Switch => build_switch(&topo, &plan, node)?,
            DeviceKind::Host => continue,
        };
        configs.push(RenderedConfig {
            name: node.data.name.clone(),
            kind: node.data.kind,
            lines: stream.render(),
        });
    }

    check_cancel()?;
    let bundles = render_bundles(&configs);
    let report = render_report(&plan);
    let scale = options.scale.filter(|s| *s > 0.0).unwrap_or(1.0);
    let driver = match topo.mode {
        GenerationMode::Digital => Some(render_driver(&topo, &configs, scale)),
        GenerationMode::Physical => None,
    };

    log::info!(
        "generation complete: {} device configs, {} subnets allocated",
        configs.len(),
        plan.registry.records().len()
    );
    Ok(GenerationOutput {
        bundles,
        report,
        driver,
        configs,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::*;

    fn empty_request() -> TopologyRequest {
        TopologyRequest {
            nodes: Vec::new(),
            edges: Vec::new(),
            vlans: Vec::new(),
            base_network_octet: 19,
            mode: GenerationMode::Digital,
        }
    }

    #[test]
    fn test_empty_topology_emits_wellformed_artifacts() {
        let output = generate(empty_request(), &GenerationOptions::default()).unwrap();
        assert!(output.bundles.routers.contains("ROUTER CONFIGURATIONS"));
        assert!(output.report.contains("=== BACKBONE ==="));
        assert!(output.driver.is_some());
        assert!(output.configs.is_empty());
    }

    #[test]
    fn test_cancelled_request_produces_nothing() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let options = GenerationOptions {
            scale: None,
            cancel: Some(cancel),
        };
        let err = generate(empty_request(), &options).unwrap_err();
        assert!(matches!(err, GenError::Cancelled));
    }

    #[test]
    fn test_determinism_two_runs_byte_identical() {
        let request = |octet| TopologyRequest {
            nodes: vec![
                Node {
                    id: "1".to_string(),
                    label: None,
                    x: Some(-120.0),
                    y: Some(0.0),
                    data: NodeData {
                        kind: DeviceKind::Router,
                        name: "R1".to_string(),
                        model: None,
                        computers: Vec::new(),
                        vlan: None,
                    },
                },
                Node {
                    id: "2".to_string(),
                    label: None,
                    x: Some(120.0),
                    y: Some(0.0),
                    data: NodeData {
                        kind: DeviceKind::Router,
                        name: "R2".to_string(),
                        model: None,
                        computers: Vec::new(),
                        vlan: None,
                    },
                },
            ],
            edges: vec![Edge {
                id: "e1".to_string(),
                from: "1".to_string(),
                to: "2".to_string(),
                data: EdgeData {
                    from_interface: InterfaceRef::new(InterfaceType::FastEthernet, "0/0"),
                    to_interface: InterfaceRef::new(InterfaceType::FastEthernet, "0/0"),
                    routing_direction: RoutingDirection::Bidirectional,
                    connection_type: ConnectionType::Normal,
                    ether_channel: None,
                },
            }],
            vlans: Vec::new(),
            base_network_octet: octet,
            mode: GenerationMode::Digital,
        };

        let first = generate(request(19), &GenerationOptions::default()).unwrap();
        let second = generate(request(19), &GenerationOptions::default()).unwrap();
        assert_eq!(first.bundles.full, second.bundles.full);
        assert_eq!(first.report, second.report);
        assert_eq!(first.driver, second.driver);
    }
}
