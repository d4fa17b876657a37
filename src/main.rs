use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use topogen::{generate, GenerationOptions, TopologyRequest};

/// Configuration generator for visually designed Cisco network topologies
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology JSON document
    #[arg(short, long)]
    topology: PathBuf,

    /// Output directory for the generated artifacts
    #[arg(short, long, default_value = "config_output")]
    output: PathBuf,

    /// Coordinate scale factor for the simulator driver script
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting topology configuration generator");
    info!("Topology file: {:?}", args.topology);
    info!("Output directory: {:?}", args.output);

    let payload = std::fs::read_to_string(&args.topology)
        .wrap_err_with(|| format!("Failed to read topology file {:?}", args.topology))?;
    let request: TopologyRequest =
        serde_json::from_str(&payload).wrap_err("Topology document is not valid JSON")?;

    let options = GenerationOptions {
        scale: Some(args.scale),
        cancel: None,
    };
    let output = generate(request, &options).wrap_err("Configuration generation failed")?;

    std::fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory {:?}", args.output))?;

    let artifacts = [
        ("config_routers.txt", output.bundles.routers.as_str()),
        ("config_switch_cores.txt", output.bundles.switch_cores.as_str()),
        ("config_switches.txt", output.bundles.switches.as_str()),
        ("config_full.txt", output.bundles.full.as_str()),
        ("subnet_report.txt", output.report.as_str()),
    ];
    for (file_name, content) in artifacts {
        let path = args.output.join(file_name);
        std::fs::write(&path, content)
            .wrap_err_with(|| format!("Failed to write {:?}", path))?;
        info!("Wrote {:?}", path);
    }
    if let Some(driver) = &output.driver {
        let path = args.output.join("topology_driver.txt");
        std::fs::write(&path, driver).wrap_err_with(|| format!("Failed to write {:?}", path))?;
        info!("Wrote {:?}", path);
    } else {
        info!("Physical mode: simulator driver skipped");
    }

    info!(
        "Generated {} device configuration(s), {} subnet(s) allocated",
        output.configs.len(),
        output.plan.registry.records().len()
    );
    Ok(())
}
