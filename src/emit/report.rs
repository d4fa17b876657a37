//! Allocation report.
//!
//! Human-readable summary of every allocated subnet: the backbone /30s with
//! both endpoint addresses, then each VLAN subnet with its gateway and
//! broadcast. Entries appear in allocation order.

use crate::ip::SubnetPurpose;
use crate::plan::Plan;

pub fn render_report(plan: &Plan) -> String {
    let mut out = Vec::new();

    out.push("=== BACKBONE ===".to_string());
    let backbones: Vec<_> = plan.registry.backbones().collect();
    if let Some(first) = backbones.first() {
        out.push(format!("Mask: {}", first.net.netmask()));
    }
    for record in &backbones {
        let SubnetPurpose::Backbone {
            link_id,
            endpoint_a,
            endpoint_b,
        } = &record.purpose
        else {
            continue;
        };
        out.push(String::new());
        out.push(format!("{}-{}", endpoint_a, endpoint_b));
        out.push(format!("|{}", record.net.network()));
        match plan.link(link_id) {
            Some(link) => {
                out.push(format!("|{}", link.low.ip));
                out.push("|".to_string());
                out.push(format!("|{}", link.high.ip));
            }
            None => {
                // Registry and link plans are built together; a miss here
                // would be a pipeline bug, but the report stays printable.
                out.push("|".to_string());
                out.push("|".to_string());
                out.push(format!("|{}", record.net.broadcast()));
            }
        }
    }

    out.push(String::new());
    out.push("=== VLANS ===".to_string());
    for vlan in &plan.vlans {
        out.push(String::new());
        out.push(format!("{} - Mask: {}", vlan.name, vlan.subnet.netmask()));
        out.push(format!("|{}", vlan.subnet.network()));
        out.push(format!("|Gateway: {}", vlan.gateway));
        out.push("|".to_string());
        out.push(format!("|{}", vlan.subnet.broadcast()));
    }

    out.join("\n") + "\n"
}
