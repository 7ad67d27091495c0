//! Fan-out from the sweep planner to every detector.

use serde::Serialize;

use crate::interface::{EvidenceRecord, EvidenceSink, RadioFrontEnd};
use crate::prelude::{AnalysisStage, GuardError, GuardResult, PipelineConfig};
use crate::profiler::{Band, DeviceProfile, SignalConsolidator};
use crate::scanner::{ScanProfile, ScanResult, ScanStatus, SweepPlanner};
use crate::security::{
    BurstPattern, FrequencyHopEvent, GnssConstellation, JammingDetector, JammingEvent,
    JammingStatus, PatternDetection, SpoofingDetector, SpoofingEvent, SpoofingIndicators,
    SpoofingStatus, ThreatDetector, ThreatLevel,
};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Read-only snapshot of every query surface.
#[derive(Debug, Clone, Serialize)]
pub struct GuardReport {
    pub scan_status: ScanStatus,
    pub profile: Option<ScanProfile>,
    pub progress: u8,
    pub current_frequency: u32,
    pub result_count: usize,
    pub dropped_results: usize,
    pub devices: Vec<DeviceProfile>,
    pub jamming_status: JammingStatus,
    pub jamming_events: Vec<JammingEvent>,
    pub spoofing_status: SpoofingStatus,
    pub spoofing_indicators: SpoofingIndicators,
    pub spoofing_events: Vec<SpoofingEvent>,
    pub max_threat_level: ThreatLevel,
    pub threats: Vec<PatternDetection>,
    pub hop_events: Vec<FrequencyHopEvent>,
    pub burst_patterns: Vec<BurstPattern>,
    pub metrics: MetricsSnapshot,
}

impl GuardReport {
    pub fn to_json(&self) -> GuardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn high_risk_devices(&self) -> usize {
        self.devices.iter().filter(|d| d.risk_score >= 80).count()
    }
}

// Entries already handed to the evidence sink, per log.
#[derive(Debug, Default, Clone, Copy)]
struct Forwarded {
    jamming: usize,
    spoofing: usize,
    threats: usize,
}

/// Owns one instance of every component and feeds them from one sweep.
///
/// Each sweep result is copied into the components: the consolidator sees
/// active results, the jamming detector sees every result, the spoofing engine
/// sees active L-band results tagged as GPS and the threat engine sees every
/// result with its activity flag. Components never share state.
pub struct GuardPipeline {
    planner: SweepPlanner,
    consolidator: SignalConsolidator,
    jamming: JammingDetector,
    spoofing: SpoofingDetector,
    threat: ThreatDetector,
    metrics: MetricsRecorder,
    sink: Option<Box<dyn EvidenceSink + Send>>,
    forwarded: Forwarded,
    logger: LogManager,
}

impl GuardPipeline {
    pub fn new() -> Self {
        Self {
            planner: SweepPlanner::new(),
            consolidator: SignalConsolidator::new(),
            jamming: JammingDetector::new(),
            spoofing: SpoofingDetector::new(),
            threat: ThreatDetector::new(),
            metrics: MetricsRecorder::new(),
            sink: None,
            forwarded: Forwarded::default(),
            logger: LogManager::new("pipeline"),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn EvidenceSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Loads the profile and any extra ranges into the planner.
    ///
    /// Refused while a sweep is running; a paused sweep is abandoned.
    pub fn configure(&mut self, config: &PipelineConfig) -> GuardResult<()> {
        if self.planner.status() == ScanStatus::Scanning {
            return Err(GuardError::InvalidState(
                "cannot reconfigure while scanning".into(),
            ));
        }
        self.planner.init();
        self.planner
            .set_activity_threshold(config.activity_threshold_dbm);
        self.planner.load_profile(config.profile)?;
        for range in &config.extra_ranges {
            self.planner
                .add_range(range.start_freq, range.end_freq, range.step_size)?;
        }
        self.logger.record(&format!(
            "configured {} with {} extra ranges, threshold {} dBm",
            config.profile.label(),
            config.extra_ranges.len(),
            config.activity_threshold_dbm
        ));
        Ok(())
    }

    pub fn start(&mut self) -> GuardResult<()> {
        self.planner.start()
    }

    /// Takes one sweep step and pushes the result to every component.
    ///
    /// Returns `None` once the planner is no longer scanning. Capacity
    /// rejections are logged and counted and never stop the tick.
    pub fn tick<F>(&mut self, front_end: &mut F, timestamp_ms: u32) -> Option<ScanResult>
    where
        F: RadioFrontEnd + ?Sized,
    {
        let result = self.planner.process(front_end)?;
        self.metrics.record_sample();
        self.fan_out(result, timestamp_ms);
        self.forward_events();
        Some(result)
    }

    fn fan_out(&mut self, result: ScanResult, timestamp_ms: u32) {
        let ScanResult {
            frequency,
            rssi,
            active,
        } = result;

        if active && !self.consolidator.knows_frequency(frequency) {
            if let Err(err) = self.consolidator.add_signal(frequency, rssi) {
                self.reject(&err.to_string());
            }
        }

        if let Err(err) = self.jamming.add_measurement(frequency, rssi, timestamp_ms) {
            self.reject(&err.to_string());
        }

        if active && Band::Satellite.contains(frequency) {
            self.spoofing
                .add_measurement(GnssConstellation::Gps, frequency, rssi, timestamp_ms);
        }

        self.threat
            .observe_signal(frequency, rssi, timestamp_ms, active);
    }

    fn reject(&self, reason: &str) {
        self.metrics.record_rejection();
        self.logger.trace(&format!("rejected: {}", reason));
    }

    /// Runs every component's analysis pass.
    pub fn analyze_all(&mut self) {
        let stages: [&mut dyn AnalysisStage; 4] = [
            &mut self.consolidator,
            &mut self.jamming,
            &mut self.spoofing,
            &mut self.threat,
        ];
        for stage in stages {
            stage.analyze();
            self.logger.trace(&format!("{} analyzed", stage.name()));
        }
        self.forward_events();
    }

    fn forward_events(&mut self) {
        let mut fresh = Vec::new();
        fresh.extend(
            self.jamming
                .events()
                .get(self.forwarded.jamming..)
                .unwrap_or_default()
                .iter()
                .copied()
                .map(EvidenceRecord::Jamming),
        );
        fresh.extend(
            self.spoofing
                .events()
                .get(self.forwarded.spoofing..)
                .unwrap_or_default()
                .iter()
                .cloned()
                .map(EvidenceRecord::Spoofing),
        );
        fresh.extend(
            self.threat
                .threats()
                .get(self.forwarded.threats..)
                .unwrap_or_default()
                .iter()
                .cloned()
                .map(EvidenceRecord::Threat),
        );
        self.forwarded = Forwarded {
            jamming: self.jamming.event_count(),
            spoofing: self.spoofing.event_count(),
            threats: self.threat.threat_count(),
        };

        if fresh.is_empty() {
            return;
        }
        self.metrics.record_detections(fresh.len());
        if let Some(sink) = self.sink.as_mut() {
            for record in &fresh {
                sink.record(record);
            }
        }
    }

    pub fn report(&self) -> GuardReport {
        GuardReport {
            scan_status: self.planner.status(),
            profile: self.planner.profile(),
            progress: self.planner.progress(),
            current_frequency: self.planner.current_frequency(),
            result_count: self.planner.result_count(),
            dropped_results: self.planner.dropped_results(),
            devices: self.consolidator.devices().to_vec(),
            jamming_status: self.jamming.status(),
            jamming_events: self.jamming.events().to_vec(),
            spoofing_status: self.spoofing.status(),
            spoofing_indicators: self.spoofing.indicators(),
            spoofing_events: self.spoofing.events().to_vec(),
            max_threat_level: self.threat.max_threat_level(),
            threats: self.threat.threats().to_vec(),
            hop_events: self.threat.hop_events().to_vec(),
            burst_patterns: self.threat.burst_patterns().to_vec(),
            metrics: self.metrics.snapshot(),
        }
    }

    /// Returns every component to its power-on state. The sink is kept.
    pub fn reset(&mut self) {
        self.planner.init();
        self.consolidator.reset();
        self.jamming.reset();
        self.spoofing.reset();
        self.threat.reset();
        self.metrics.reset();
        self.forwarded = Forwarded::default();
    }

    pub fn planner(&self) -> &SweepPlanner {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut SweepPlanner {
        &mut self.planner
    }

    pub fn consolidator(&self) -> &SignalConsolidator {
        &self.consolidator
    }

    pub fn jamming(&self) -> &JammingDetector {
        &self.jamming
    }

    pub fn spoofing(&self) -> &SpoofingDetector {
        &self.spoofing
    }

    pub fn threat(&self) -> &ThreatDetector {
        &self.threat
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for GuardPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FrequencyRange;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<EvidenceRecord>>>);

    impl EvidenceSink for SharedSink {
        fn record(&mut self, record: &EvidenceRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    fn run_sweep<F: FnMut(u32) -> i8>(pipeline: &mut GuardPipeline, mut front_end: F) {
        pipeline.start().unwrap();
        let mut t = 0;
        while pipeline.tick(&mut front_end, t).is_some() {
            t += 10;
        }
        pipeline.analyze_all();
    }

    fn ism_config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn fresh_pipeline_reports_empty_state() {
        let report = GuardPipeline::new().report();
        assert_eq!(report.scan_status, ScanStatus::Idle);
        assert_eq!(report.progress, 0);
        assert!(report.devices.is_empty());
        assert_eq!(report.jamming_status, JammingStatus::Clear);
        assert_eq!(report.spoofing_status, SpoofingStatus::Authentic);
        assert_eq!(report.max_threat_level, ThreatLevel::Info);
        assert_eq!(report.metrics, MetricsSnapshot::default());
    }

    #[test]
    fn quiet_sweep_completes_without_detections() {
        let mut pipeline = GuardPipeline::new();
        pipeline.configure(&ism_config()).unwrap();
        run_sweep(&mut pipeline, |_| -95);

        let report = pipeline.report();
        assert_eq!(report.scan_status, ScanStatus::Complete);
        assert!(report.devices.is_empty());
        assert!(report.jamming_events.is_empty());
        assert_eq!(report.metrics.samples, report.result_count + report.dropped_results);
    }

    #[test]
    fn active_ism_emitter_becomes_a_device() {
        let mut pipeline = GuardPipeline::new();
        pipeline.configure(&ism_config()).unwrap();
        run_sweep(&mut pipeline, |f| {
            if (433_900_000..=433_950_000).contains(&f) {
                -50
            } else {
                -95
            }
        });

        let report = pipeline.report();
        assert!(!report.devices.is_empty());
        let device = &report.devices[0];
        assert_eq!(device.name, "ISM Tracker");
        assert!(device.risk_score > 0);
    }

    #[test]
    fn extra_ranges_are_appended_to_profile() {
        let mut pipeline = GuardPipeline::new();
        let config = PipelineConfig {
            profile: ScanProfile::Satellite,
            extra_ranges: vec![FrequencyRange::new(162_000_000, 162_050_000, 25_000)],
            ..PipelineConfig::default()
        };
        pipeline.configure(&config).unwrap();
        let ranges = pipeline.planner().ranges();
        assert_eq!(ranges.len(), ScanProfile::Satellite.ranges().len() + 1);
        assert_eq!(ranges[ranges.len() - 1].start_freq, 162_000_000);
    }

    #[test]
    fn invalid_extra_range_fails_configuration() {
        let mut pipeline = GuardPipeline::new();
        let config = PipelineConfig {
            extra_ranges: vec![FrequencyRange::new(2_000, 1_000, 10)],
            ..PipelineConfig::default()
        };
        assert!(pipeline.configure(&config).is_err());
    }

    #[test]
    fn strong_l_band_signals_reach_spoofing_engine() {
        let mut pipeline = GuardPipeline::new();
        pipeline
            .configure(&PipelineConfig {
                profile: ScanProfile::Satellite,
                ..PipelineConfig::default()
            })
            .unwrap();
        run_sweep(&mut pipeline, |_| -60);

        assert!(pipeline.spoofing().measurement_count() > 0);
        assert_eq!(pipeline.spoofing().status(), SpoofingStatus::Confirmed);
    }

    #[test]
    fn new_events_are_forwarded_once() {
        let sink = SharedSink::default();
        let mut pipeline = GuardPipeline::new().with_sink(Box::new(sink.clone()));
        pipeline
            .configure(&PipelineConfig {
                profile: ScanProfile::Satellite,
                ..PipelineConfig::default()
            })
            .unwrap();
        run_sweep(&mut pipeline, |_| -60);
        pipeline.analyze_all();

        let records = sink.0.lock().unwrap();
        let spoofing = records
            .iter()
            .filter(|r| matches!(r, EvidenceRecord::Spoofing(_)))
            .count();
        assert_eq!(spoofing, pipeline.spoofing().event_count());
        let threats = records
            .iter()
            .filter(|r| matches!(r, EvidenceRecord::Threat(_)))
            .count();
        assert_eq!(threats, pipeline.threat().threat_count());
        assert_eq!(pipeline.metrics().detections, records.len());
    }

    #[test]
    fn jamming_carrier_is_recorded_during_sweep() {
        let mut pipeline = GuardPipeline::new();
        pipeline
            .configure(&PipelineConfig {
                profile: ScanProfile::Ism,
                extra_ranges: vec![FrequencyRange::new(1_000_000, 1_000_000, 1)],
                ..PipelineConfig::default()
            })
            .unwrap();

        // The ISM points fill the baseline table first, so the extra point is
        // judged against the default noise floor.
        run_sweep(&mut pipeline, |f| if f == 1_000_000 { -45 } else { -90 });

        assert!(pipeline.jamming().is_frequency_jammed(1_000_000));
        assert!(!pipeline.jamming().is_frequency_jammed(433_050_000));
        assert_eq!(pipeline.report().jamming_status, JammingStatus::Critical);
    }

    #[test]
    fn reconfigure_is_refused_mid_sweep() {
        let mut pipeline = GuardPipeline::new();
        pipeline.configure(&ism_config()).unwrap();
        pipeline.start().unwrap();
        let mut front_end = |_: u32| -95i8;
        pipeline.tick(&mut front_end, 0).unwrap();

        let satellite = PipelineConfig {
            profile: ScanProfile::Satellite,
            ..PipelineConfig::default()
        };
        let err = pipeline.configure(&satellite).unwrap_err();
        assert!(matches!(err, GuardError::InvalidState(_)));
        let report = pipeline.report();
        assert_eq!(report.scan_status, ScanStatus::Scanning);
        assert_eq!(report.profile, Some(ScanProfile::Ism));
        assert_eq!(report.result_count, 1);

        pipeline.planner_mut().pause();
        pipeline.configure(&satellite).unwrap();
        assert_eq!(pipeline.report().scan_status, ScanStatus::Idle);
        assert_eq!(pipeline.report().profile, Some(ScanProfile::Satellite));
    }

    #[test]
    fn reset_returns_to_empty_state() {
        let mut pipeline = GuardPipeline::new();
        pipeline.configure(&ism_config()).unwrap();
        run_sweep(&mut pipeline, |_| -50);
        pipeline.reset();
        pipeline.reset();

        let report = pipeline.report();
        assert_eq!(report.scan_status, ScanStatus::Idle);
        assert!(report.devices.is_empty());
        assert_eq!(report.result_count, 0);
        assert_eq!(report.metrics, MetricsSnapshot::default());
        assert_eq!(report.threats.len(), 0);
    }

    #[test]
    fn report_renders_to_json() {
        let mut pipeline = GuardPipeline::new();
        pipeline.configure(&ism_config()).unwrap();
        let json = pipeline.report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scan_status"], "idle");
        assert_eq!(value["profile"], "ism");
    }
}
