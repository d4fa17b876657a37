//! Per-category configuration bundles.
//!
//! Four text files: routers, core switches, plain switches, and the
//! consolidated bundle. Every device is introduced by a banner bearing its
//! name, so an operator can split the file by eye.

use crate::emit::RenderedConfig;
use crate::topology::DeviceKind;

/// The four bundle texts of one generation run.
#[derive(Debug, Clone)]
pub struct Bundles {
    pub routers: String,
    pub switch_cores: String,
    pub switches: String,
    pub full: String,
}

pub fn render_bundles(configs: &[RenderedConfig]) -> Bundles {
    let routers: Vec<&RenderedConfig> = of_kind(configs, DeviceKind::Router);
    let cores: Vec<&RenderedConfig> = of_kind(configs, DeviceKind::SwitchCore);
    let switches: Vec<&RenderedConfig> = of_kind(configs, DeviceKind::Switch);

    Bundles {
        routers: category_file("ROUTER CONFIGURATIONS", "ROUTER", &routers),
        switch_cores: category_file("SWITCH CORE CONFIGURATIONS", "SWITCH CORE", &cores),
        switches: category_file("SWITCH CONFIGURATIONS", "SWITCH", &switches),
        full: full_file(&routers, &cores, &switches),
    }
}

fn of_kind(configs: &[RenderedConfig], kind: DeviceKind) -> Vec<&RenderedConfig> {
    configs.iter().filter(|c| c.kind == kind).collect()
}

fn banner() -> String {
    "=".repeat(80)
}

fn category_file(title: &str, device_label: &str, configs: &[&RenderedConfig]) -> String {
    let mut out = Vec::new();
    out.push(banner());
    out.push(title.to_string());
    out.push(banner());
    out.push(String::new());

    for config in configs {
        out.push(banner());
        out.push(format!("{}: {}", device_label, config.name));
        out.push(banner());
        out.extend(config.lines.iter().cloned());
        out.push(String::new());
        out.push(String::new());
    }

    out.join("\n") + "\n"
}

fn full_file(
    routers: &[&RenderedConfig],
    cores: &[&RenderedConfig],
    switches: &[&RenderedConfig],
) -> String {
    let mut out = Vec::new();
    out.push(banner());
    out.push("FULL TOPOLOGY CONFIGURATION".to_string());
    out.push(banner());
    out.push(String::new());

    for (title, configs) in [
        ("ROUTERS", routers),
        ("SWITCH CORES", cores),
        ("SWITCHES", switches),
    ] {
        if configs.is_empty() {
            continue;
        }
        out.push(banner());
        out.push(title.to_string());
        out.push(banner());
        out.push(String::new());
        for config in configs {
            out.push(format!("--- {} ---", config.name));
            out.extend(config.lines.iter().cloned());
            out.push(String::new());
            out.push(String::new());
        }
    }

    out.join("\n") + "\n"
}
