//! Error types for the generation pipeline.
//!
//! Every planner and configurator step returns a categorized error from this
//! taxonomy. The orchestrator short-circuits on the first failure; no partial
//! artifacts are emitted.

use ipnet::Ipv4Net;
use thiserror::Error;

/// Categorized failure raised anywhere in the generation pipeline.
///
/// Each variant carries a human-readable message naming the offending
/// device, VLAN, or link by its label.
#[derive(Debug, Error)]
pub enum GenError {
    /// The submitted graph is malformed: unknown ids, duplicate names,
    /// dangling edge endpoints.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A VLAN definition cannot be honored (prefix out of range, more than
    /// one native VLAN, unusable name).
    #[error("invalid VLAN: {0}")]
    InvalidVlan(String),

    /// Two link endpoints on the same device claim the same interface, or an
    /// EtherChannel range collides with an existing assignment.
    #[error("interface conflict: {0}")]
    InterfaceConflict(String),

    /// The allocator ran out of free space in the base block.
    #[error("address space exhausted: no free /{prefix} block left in {base}")]
    AddressExhausted { prefix: u8, base: Ipv4Net },

    /// Physical mode requires every routed device to carry a model tag.
    #[error("physical mode requires a model for device '{device}'")]
    PhysicalModelMissing { device: String },

    /// A configurator observed an internally inconsistent plan. This always
    /// indicates a bug in an earlier pipeline stage.
    #[error("configuration build failure: {0}")]
    ConfigBuildFailure(String),

    /// The caller's cancellation signal was raised between pipeline stages.
    #[error("generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, GenError>;
