//! Output emitters.
//!
//! Deterministic functions from the finished plan to the three artifact
//! families: per-category config bundles, the allocation report, and the
//! simulator driver script. Emitting the same plan twice yields byte-equal
//! output.

pub mod bundles;
pub mod driver;
pub mod report;

use crate::topology::DeviceKind;

pub use bundles::{render_bundles, Bundles};
pub use driver::render_driver;
pub use report::render_report;

/// One device's rendered configuration, ready for bundling.
#[derive(Debug, Clone)]
pub struct RenderedConfig {
    pub name: String,
    pub kind: DeviceKind,
    pub lines: Vec<String>,
}
