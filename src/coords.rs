//! Canvas-to-simulator coordinate remapping.
//!
//! The designer canvas has an arbitrary origin; the simulator works in a
//! fixed window centered at (2000, 2000). The topology's bounding-box center
//! is translated onto that point and relative offsets are scaled, so shape
//! and relative distances survive the move.

use std::collections::HashMap;

use crate::topology::Node;

pub const TARGET_CENTER_X: f64 = 2000.0;
pub const TARGET_CENTER_Y: f64 = 2000.0;

/// Valid placement window of the simulator.
pub const X_RANGE: (i32, i32) = (-7500, 11500);
pub const Y_RANGE: (i32, i32) = (-1600, 5600);

/// Remap every device position. Devices without coordinates (and the whole
/// topology, when nothing carries coordinates) land on the target center.
pub fn remap_positions(nodes: &[Node], scale: f64) -> HashMap<String, (i32, i32)> {
    let xs: Vec<f64> = nodes.iter().filter_map(|n| n.x).collect();
    let ys: Vec<f64> = nodes.iter().filter_map(|n| n.y).collect();

    let center = match (bounds(&xs), bounds(&ys)) {
        (Some((x_min, x_max)), Some((y_min, y_max))) => {
            ((x_min + x_max) / 2.0, (y_min + y_max) / 2.0)
        }
        _ => (0.0, 0.0),
    };

    nodes
        .iter()
        .map(|node| {
            let x = match node.x {
                Some(x) => TARGET_CENTER_X + (x - center.0) * scale,
                None => TARGET_CENTER_X,
            };
            let y = match node.y {
                Some(y) => TARGET_CENTER_Y + (y - center.1) * scale,
                None => TARGET_CENTER_Y,
            };
            (
                node.id.clone(),
                (
                    clamp(x.round() as i32, X_RANGE),
                    clamp(y.round() as i32, Y_RANGE),
                ),
            )
        })
        .collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    }))
}

fn clamp(value: i32, (lo, hi): (i32, i32)) -> i32 {
    value.max(lo).min(hi)
}
