//! Topology model: payload types and the normalized graph.
//!
//! `types` is the serde-facing shape of the submitted document; `graph`
//! turns it into the indexed structure the planners consume.

pub mod graph;
pub mod types;

pub use graph::{edge_end, EdgeEnd, Topology};
pub use types::{
    AttachedHost, ConnectionType, DeviceKind, EcProtocol, Edge, EdgeData, EtherChannelSpec,
    GenerationMode, InterfaceRef, InterfaceType, Node, NodeData, RoutingDirection,
    TopologyRequest, VlanDef,
};
