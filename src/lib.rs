//! Topogen - deterministic Cisco IOS configuration generator.
//!
//! Takes a visually designed network topology (routers, core switches,
//! layer-2 switches, hosts, links, VLANs) and produces per-device IOS
//! command scripts, an IP allocation report, and a scripted build program
//! for an external network simulator.

pub mod coords;
pub mod device;
pub mod emit;
pub mod error;
pub mod ip;
pub mod orchestrator;
pub mod physical;
pub mod plan;
pub mod topology;
pub mod utils;

pub use error::{GenError, Result};
pub use orchestrator::{generate, CancelFlag, GenerationOptions, GenerationOutput};
pub use topology::TopologyRequest;
