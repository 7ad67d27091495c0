use crate::generator::profile::{GeneratorConfig, SyntheticFrontEnd};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use guardcore::interface::EvidenceSink;
use guardcore::{GuardPipeline, GuardReport};
use log::info;

pub struct WorkflowResult {
    pub report: GuardReport,
    pub sweeps_completed: usize,
    pub measurements: u64,
    /// Simulated clock at the end of the run.
    pub elapsed_ms: u32,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(
        &self,
        sink: Option<Box<dyn EvidenceSink + Send>>,
    ) -> anyhow::Result<WorkflowResult> {
        self.execute_with(&self.config.generator, sink)
    }

    /// Runs the configured sweeps against a front-end built from `generator`.
    pub fn execute_with(
        &self,
        generator: &GeneratorConfig,
        sink: Option<Box<dyn EvidenceSink + Send>>,
    ) -> anyhow::Result<WorkflowResult> {
        let mut pipeline = GuardPipeline::new();
        if let Some(sink) = sink {
            pipeline = pipeline.with_sink(sink);
        }
        pipeline
            .configure(&self.config.pipeline)
            .context("configuring guard pipeline")?;

        let mut front_end = SyntheticFrontEnd::new(generator.clone());
        let mut clock_ms: u32 = 0;
        let dwell_ms = self.config.dwell_ms.max(1);

        for sweep in 0..self.config.sweeps {
            pipeline
                .start()
                .with_context(|| format!("starting sweep {}", sweep + 1))?;
            while pipeline.tick(&mut front_end, clock_ms).is_some() {
                clock_ms = clock_ms.saturating_add(dwell_ms);
            }
            pipeline.analyze_all();
            info!(
                "[runner] sweep {} done at {} ms, {} devices",
                sweep + 1,
                clock_ms,
                pipeline.consolidator().device_count()
            );
        }

        Ok(WorkflowResult {
            report: pipeline.report(),
            sweeps_completed: self.config.sweeps,
            measurements: front_end.measurements(),
            elapsed_ms: clock_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::scenario;
    use guardcore::profiler::DeviceType;
    use guardcore::scanner::{ScanProfile, ScanStatus};
    use guardcore::security::{JammingStatus, SpoofingStatus};

    fn runner_for(profile: ScanProfile, scenario_name: &str) -> Runner {
        let mut cfg = WorkflowConfig::from_args(profile, 1, 5);
        cfg.generator = scenario(scenario_name, 5).unwrap();
        Runner::new(cfg)
    }

    #[test]
    fn runner_executes_workflow() {
        let runner = runner_for(ScanProfile::Ism, "quiet");
        let result = runner.execute(None).unwrap();
        assert_eq!(result.report.scan_status, ScanStatus::Complete);
        assert_eq!(result.sweeps_completed, 1);
        assert_eq!(result.measurements, result.report.metrics.samples as u64);
        assert!(result.report.devices.is_empty());
        assert!(result.elapsed_ms > 0);
    }

    #[test]
    fn zero_sweeps_reports_configured_idle_state() {
        let mut cfg = WorkflowConfig::from_args(ScanProfile::Cellular, 0, 0);
        cfg.sweeps = 0;
        let result = Runner::new(cfg).execute(None).unwrap();
        assert_eq!(result.report.scan_status, ScanStatus::Idle);
        assert_eq!(result.measurements, 0);
    }

    #[test]
    fn maritime_scenario_finds_ais_transponder() {
        let runner = runner_for(ScanProfile::Maritime, "maritime");
        let report = runner.execute(None).unwrap().report;
        assert!(report
            .devices
            .iter()
            .any(|d| d.device_type == DeviceType::AisTransponder));
    }

    #[test]
    fn spoofer_scenario_confirms_spoofing() {
        let runner = runner_for(ScanProfile::Satellite, "gps_spoofer");
        let report = runner.execute(None).unwrap().report;
        assert!(report.spoofing_status >= SpoofingStatus::Confirmed);
        assert!(!report.spoofing_events.is_empty());
    }

    #[test]
    fn jammer_scenario_raises_jamming_status() {
        let runner = runner_for(ScanProfile::Ism, "jammer");
        let report = runner.execute(None).unwrap().report;
        assert!(report.jamming_status > JammingStatus::Clear);
    }

    #[test]
    fn same_seed_reproduces_report() {
        let runner = runner_for(ScanProfile::Vehicle, "vehicle");
        let a = runner.execute(None).unwrap().report.to_json().unwrap();
        let b = runner.execute(None).unwrap().report.to_json().unwrap();
        assert_eq!(a, b);
    }
}
