//! Subnet registry.
//!
//! Records every allocated subnet together with the purpose it serves, in
//! allocation order. The report emitter walks this record list, and the
//! overlap invariant is checked against it in tests.

use ipnet::Ipv4Net;
use std::collections::HashMap;

/// Why a subnet was allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetPurpose {
    /// Point-to-point /30 on a routed link; endpoint names in /30 host order.
    Backbone {
        link_id: String,
        endpoint_a: String,
        endpoint_b: String,
    },
    /// Subnet serving one declared VLAN.
    Vlan { name: String },
}

/// One allocation entry.
#[derive(Debug, Clone)]
pub struct SubnetRecord {
    pub net: Ipv4Net,
    pub purpose: SubnetPurpose,
}

/// Ordered record of every allocation in one generation run, with lookup
/// maps keyed by link id and VLAN name.
#[derive(Debug, Default)]
pub struct SubnetRegistry {
    records: Vec<SubnetRecord>,
    by_link: HashMap<String, usize>,
    by_vlan: HashMap<String, usize>,
}

impl SubnetRegistry {
    pub fn new() -> Self {
        SubnetRegistry::default()
    }

    pub fn record_backbone(
        &mut self,
        link_id: &str,
        endpoint_a: &str,
        endpoint_b: &str,
        net: Ipv4Net,
    ) {
        let idx = self.records.len();
        self.records.push(SubnetRecord {
            net,
            purpose: SubnetPurpose::Backbone {
                link_id: link_id.to_string(),
                endpoint_a: endpoint_a.to_string(),
                endpoint_b: endpoint_b.to_string(),
            },
        });
        self.by_link.insert(link_id.to_string(), idx);
    }

    pub fn record_vlan(&mut self, name: &str, net: Ipv4Net) {
        let idx = self.records.len();
        self.records.push(SubnetRecord {
            net,
            purpose: SubnetPurpose::Vlan {
                name: name.to_string(),
            },
        });
        self.by_vlan.insert(name.to_string(), idx);
    }

    /// All allocations, oldest first.
    pub fn records(&self) -> &[SubnetRecord] {
        &self.records
    }

    pub fn backbone_for_link(&self, link_id: &str) -> Option<&SubnetRecord> {
        self.by_link.get(link_id).map(|&idx| &self.records[idx])
    }

    pub fn subnet_for_vlan(&self, name: &str) -> Option<Ipv4Net> {
        self.by_vlan.get(name).map(|&idx| self.records[idx].net)
    }

    /// Backbone records in allocation order.
    pub fn backbones(&self) -> impl Iterator<Item = &SubnetRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.purpose, SubnetPurpose::Backbone { .. }))
    }

    /// VLAN records in allocation order.
    pub fn vlan_subnets(&self) -> impl Iterator<Item = &SubnetRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.purpose, SubnetPurpose::Vlan { .. }))
    }
}
