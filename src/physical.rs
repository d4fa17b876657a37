//! Physical model catalogue.
//!
//! Maps concrete Cisco model tags to their interface inventories. Digital
//! mode uses the generic inventories; physical mode requires a model tag on
//! every routed device and carries that tag into the simulator driver.

use crate::error::{GenError, Result};
use crate::topology::{DeviceKind, GenerationMode, InterfaceRef, InterfaceType, Topology};

/// Simulator model tags used when the designer did not pick hardware.
pub const DEFAULT_ROUTER_MODEL: &str = "2811";
pub const DEFAULT_SWITCH_MODEL: &str = "2960-24TT";
pub const DEFAULT_CORE_MODEL: &str = "3560-24PS";
pub const DEFAULT_HOST_MODEL: &str = "PC-PT";

/// Interface inventory for a known (kind, model) pair, or `None` for an
/// unknown model.
pub fn model_interfaces(kind: DeviceKind, model: &str) -> Option<Vec<InterfaceRef>> {
    use InterfaceType::*;
    let ifaces = match (kind, model) {
        (DeviceKind::Router, "2900") => numbered(GigabitEthernet, "0/", 0, 2),
        (DeviceKind::Router, "4200") => numbered(GigabitEthernet, "0/", 0, 3),
        (DeviceKind::Switch, "2960") => numbered(FastEthernet, "0/", 1, 24),
        (DeviceKind::Switch, "2960-S") => numbered(GigabitEthernet, "1/0/", 1, 28),
        (DeviceKind::Switch, "1000") => numbered(GigabitEthernet, "0/", 1, 24),
        (DeviceKind::SwitchCore, "3560G") => numbered(GigabitEthernet, "0/", 1, 28),
        _ => return None,
    };
    Some(ifaces)
}

/// Inventory used in digital mode, one per device role.
pub fn generic_interfaces(kind: DeviceKind) -> Vec<InterfaceRef> {
    use InterfaceType::*;
    match kind {
        DeviceKind::Router => vec![
            InterfaceRef::new(FastEthernet, "0/0"),
            InterfaceRef::new(FastEthernet, "0/1"),
            InterfaceRef::new(Ethernet, "0/0/0"),
            InterfaceRef::new(Ethernet, "0/1/0"),
            InterfaceRef::new(Ethernet, "0/2/0"),
            InterfaceRef::new(Ethernet, "0/3/0"),
        ],
        DeviceKind::Switch => {
            let mut ifaces = numbered(FastEthernet, "0/", 1, 24);
            ifaces.extend(numbered(GigabitEthernet, "0/", 1, 2));
            ifaces
        }
        DeviceKind::SwitchCore => {
            let mut ifaces = numbered(GigabitEthernet, "1/0/", 1, 24);
            ifaces.extend(numbered(GigabitEthernet, "1/1/", 1, 4));
            ifaces
        }
        DeviceKind::Host => vec![InterfaceRef::new(FastEthernet, "0")],
    }
}

/// Model tag to hand the simulator for one device.
pub fn driver_model_tag(kind: DeviceKind, model: Option<&str>, mode: GenerationMode) -> String {
    if mode == GenerationMode::Physical {
        if let Some(model) = model {
            return model.to_string();
        }
    }
    match kind {
        DeviceKind::Router => DEFAULT_ROUTER_MODEL,
        DeviceKind::Switch => DEFAULT_SWITCH_MODEL,
        DeviceKind::SwitchCore => DEFAULT_CORE_MODEL,
        DeviceKind::Host => DEFAULT_HOST_MODEL,
    }
    .to_string()
}

/// Check every device's used interfaces against its inventory: the model's
/// in physical mode (where a model tag is mandatory), the generic catalogue
/// in digital mode. Out-of-inventory interfaces are tolerated with a
/// warning, matching how the designer behaves with customized hardware;
/// only a missing model tag in physical mode is a hard failure.
pub fn validate_inventories(topo: &Topology) -> Result<()> {
    for node in &topo.nodes {
        if node.data.kind == DeviceKind::Host {
            continue;
        }
        let inventory = match topo.mode {
            GenerationMode::Physical => {
                let Some(model) = node.data.model.as_deref() else {
                    return Err(GenError::PhysicalModelMissing {
                        device: node.data.name.clone(),
                    });
                };
                match model_interfaces(node.data.kind, model) {
                    Some(inventory) => inventory,
                    None => {
                        log::warn!(
                            "device '{}': unknown model '{}', using the generic inventory",
                            node.data.name,
                            model
                        );
                        generic_interfaces(node.data.kind)
                    }
                }
            }
            GenerationMode::Digital => generic_interfaces(node.data.kind),
        };
        if let Some(used) = topo.used_interfaces(&node.id) {
            for (iface_type, number) in used {
                let iface = InterfaceRef::new(*iface_type, number.clone());
                if !inventory.contains(&iface) {
                    log::warn!(
                        "device '{}': interface {} is outside its interface inventory",
                        node.data.name,
                        iface
                    );
                }
            }
        }
    }
    Ok(())
}

fn numbered(
    iface_type: InterfaceType,
    slot_prefix: &str,
    start: u32,
    end: u32,
) -> Vec<InterfaceRef> {
    (start..=end)
        .map(|n| InterfaceRef::new(iface_type, format!("{}{}", slot_prefix, n)))
        .collect()
}
