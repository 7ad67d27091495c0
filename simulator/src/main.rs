use anyhow::{bail, Context};
use clap::Parser;
use generator::template::{scenario, SCENARIOS};
use guardcore::interface::EvidenceSink;
use guardcore::scanner::ScanProfile;
use gui_bridge::bridge::{dashboard_bind_address, GuiBridge};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::evidence::JsonLinesSink;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Receive-only spectrum guard driver")]
struct Args {
    /// Run the configured sweeps once and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Scan preset used when no workflow file is given
    #[arg(long, default_value = "ism")]
    profile: ScanProfile,
    #[arg(long, default_value_t = 3)]
    sweeps: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Canned emitter layout replacing the configured generator
    #[arg(long)]
    scenario: Option<String>,
    /// Append detector events to this file as JSON lines
    #[arg(long)]
    evidence: Option<PathBuf>,
    /// Keep the dashboard endpoint alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.profile, args.sweeps, args.seed)
    };
    if let Some(name) = args.scenario.as_deref() {
        match scenario(name, workflow_config.generator.seed) {
            Some(generator) => workflow_config.generator = generator,
            None => bail!(
                "unknown scenario '{}', expected one of {}",
                name,
                SCENARIOS.join(", ")
            ),
        }
    }

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone());

    if args.offline {
        let sink: Option<Box<dyn EvidenceSink + Send>> = match args.evidence.as_ref() {
            Some(path) => Some(Box::new(JsonLinesSink::open(path)?)),
            None => None,
        };
        let result = runner.execute(sink).context("running offline workflow")?;
        let report = &result.report;

        println!(
            "Offline run -> sweeps {}, samples {}, devices {}, jamming {:?}, spoofing {:?}, threat {:?}",
            result.sweeps_completed,
            report.metrics.samples,
            report.devices.len(),
            report.jamming_status,
            report.spoofing_status,
            report.max_threat_level
        );
        for device in &report.devices {
            println!(
                "  device {:>2} {:<24} risk {:>3} freqs {}",
                device.device_id,
                device.name,
                device.risk_score,
                device.frequency_count()
            );
        }

        gui_bridge.publish_result(&result, workflow_config.generator.description.clone())?;
        gui_bridge.publish_status("Offline sweep results ready.");

        let line = format!(
            "profile={} sweeps={} samples={} devices={} high_risk={} jamming_events={} spoofing_events={} threats={} rejections={}\n",
            workflow_config.pipeline.profile.label(),
            result.sweeps_completed,
            report.metrics.samples,
            report.devices.len(),
            report.high_risk_devices(),
            report.jamming_events.len(),
            report.spoofing_events.len(),
            report.threats.len(),
            report.metrics.rejections
        );
        let report_path = PathBuf::from("tools/data/offline_guard.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report log {}", report_path.display()))?;
        file.write_all(line.as_bytes())?;
    }
    if args.serve {
        let address = dashboard_bind_address();
        gui_bridge.serve(address);
        gui_bridge.publish_status(&format!(
            "Dashboard on http://{}/report (Ctrl+C to stop)...",
            address
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
