//! Sliding-window pattern detectors over generic signal observations.

use serde::{Deserialize, Serialize};

use crate::buffers::{BoundedLog, RingBuffer};
use crate::math::StatsHelper;
use crate::prelude::AnalysisStage;
use crate::telemetry::LogManager;

pub const MAX_THREAT_DETECTIONS: usize = 16;
pub const MAX_HOP_EVENTS: usize = 4;
pub const MAX_BURST_PATTERNS: usize = 8;
pub const HISTORY_CAPACITY: usize = 32;

pub const HOP_WINDOW: usize = 8;
pub const MIN_HOP_FREQUENCIES: usize = 4;
pub const BURST_WINDOW: usize = 6;
pub const MIN_BURST_TRANSITIONS: usize = 2;
pub const COORDINATION_WINDOW_MS: u32 = 1_000;
pub const COORDINATION_SCAN_LIMIT: usize = 16;
pub const MIN_COORDINATED_FREQUENCIES: usize = 3;
const COORDINATION_TRACKED: usize = 4;

/// Fixed confidence reported with every detection.
pub const PATTERN_CONFIDENCE: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    None,
    FrequencyHopping,
    BurstTransmission,
    CoordinatedNetwork,
    UnusualPattern,
    CovertChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDetection {
    pub threat_type: ThreatType,
    pub level: ThreatLevel,
    pub primary_frequency: u32,
    pub secondary_frequency: Option<u32>,
    /// Percent.
    pub confidence: u8,
    pub description: String,
    pub timestamp_ms: u32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyHopEvent {
    /// Distinct frequencies, newest first.
    pub frequencies: Vec<u32>,
    pub hop_interval_ms: u32,
    pub timestamp_ms: u32,
    pub active: bool,
}

impl FrequencyHopEvent {
    pub fn hop_count(&self) -> usize {
        self.frequencies.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstPattern {
    pub frequency: u32,
    /// Time covered by the analysed window.
    pub burst_duration_ms: u32,
    /// Mean gap between active observations.
    pub burst_interval_ms: u32,
    pub burst_count: u8,
    pub timestamp_ms: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalObservation {
    pub frequency: u32,
    pub rssi: i8,
    pub timestamp_ms: u32,
    pub is_active: bool,
}

/// Runs the hopping, burst and coordination detectors over a rolling history.
///
/// Every [`analyze`](AnalysisStage::analyze) pass evaluates all three
/// detectors again, so a pattern that persists across passes is logged again
/// until its log fills.
pub struct ThreatDetector {
    history: RingBuffer<SignalObservation>,
    threats: BoundedLog<PatternDetection>,
    hop_events: BoundedLog<FrequencyHopEvent>,
    burst_patterns: BoundedLog<BurstPattern>,
    max_threat_level: ThreatLevel,
    logger: LogManager,
}

impl ThreatDetector {
    pub fn new() -> Self {
        Self {
            history: RingBuffer::with_capacity(HISTORY_CAPACITY),
            threats: BoundedLog::with_capacity("threat detections", MAX_THREAT_DETECTIONS),
            hop_events: BoundedLog::with_capacity("hop events", MAX_HOP_EVENTS),
            burst_patterns: BoundedLog::with_capacity("burst patterns", MAX_BURST_PATTERNS),
            max_threat_level: ThreatLevel::Info,
            logger: LogManager::new("threat"),
        }
    }

    pub fn observe_signal(&mut self, frequency: u32, rssi: i8, timestamp_ms: u32, is_active: bool) {
        self.history.push(SignalObservation {
            frequency,
            rssi,
            timestamp_ms,
            is_active,
        });
    }

    fn newest_timestamp(&self) -> u32 {
        self.history
            .newest()
            .map(|obs| obs.timestamp_ms)
            .unwrap_or_default()
    }

    fn detect_frequency_hopping(&mut self) {
        if self.history.len() < MIN_HOP_FREQUENCIES || self.hop_events.is_full() {
            return;
        }

        let window: Vec<&SignalObservation> = self.history.recent(HOP_WINDOW).collect();
        let unique =
            StatsHelper::distinct_frequencies(window.iter().map(|obs| obs.frequency), HOP_WINDOW);
        if unique.len() < MIN_HOP_FREQUENCIES {
            return;
        }

        let timestamps: Vec<u32> = window.iter().map(|obs| obs.timestamp_ms).collect();
        let event = FrequencyHopEvent {
            hop_interval_ms: StatsHelper::mean_interval_ms(&timestamps),
            timestamp_ms: self.newest_timestamp(),
            active: true,
            frequencies: unique,
        };
        let primary = event.frequencies[0];
        let secondary = event.frequencies.get(1).copied();

        if self.hop_events.push(event).is_ok() {
            self.log_threat(
                ThreatType::FrequencyHopping,
                ThreatLevel::High,
                primary,
                secondary,
                "Frequency hopping detected",
            );
        }
    }

    fn detect_burst_transmissions(&mut self) {
        if self.history.len() < BURST_WINDOW || self.burst_patterns.is_full() {
            return;
        }

        let window: Vec<&SignalObservation> = self.history.recent(BURST_WINDOW).collect();
        let active_times: Vec<u32> = window
            .iter()
            .filter(|obs| obs.is_active)
            .map(|obs| obs.timestamp_ms)
            .collect();
        let on_count = active_times.len();
        let off_count = window.len() - on_count;
        if on_count < MIN_BURST_TRANSITIONS || off_count < MIN_BURST_TRANSITIONS {
            return;
        }

        let newest = *window[0];
        let oldest_time = window[window.len() - 1].timestamp_ms;
        let pattern = BurstPattern {
            frequency: newest.frequency,
            burst_duration_ms: newest.timestamp_ms.saturating_sub(oldest_time),
            burst_interval_ms: StatsHelper::mean_interval_ms(&active_times),
            burst_count: on_count as u8,
            timestamp_ms: newest.timestamp_ms,
            active: true,
        };

        if self.burst_patterns.push(pattern).is_ok() {
            self.log_threat(
                ThreatType::BurstTransmission,
                ThreatLevel::Medium,
                pattern.frequency,
                None,
                "Burst transmission pattern",
            );
        }
    }

    fn detect_coordinated_devices(&mut self) {
        if self.history.len() < MIN_COORDINATED_FREQUENCIES {
            return;
        }

        let latest = self.newest_timestamp();
        let concurrent = StatsHelper::distinct_frequencies(
            self.history
                .recent(COORDINATION_SCAN_LIMIT)
                .take_while(|obs| latest.saturating_sub(obs.timestamp_ms) <= COORDINATION_WINDOW_MS)
                .map(|obs| obs.frequency),
            COORDINATION_TRACKED,
        );

        if concurrent.len() >= MIN_COORDINATED_FREQUENCIES {
            self.log_threat(
                ThreatType::CoordinatedNetwork,
                ThreatLevel::High,
                concurrent[0],
                concurrent.get(1).copied(),
                "Coordinated device network detected",
            );
        }
    }

    fn log_threat(
        &mut self,
        threat_type: ThreatType,
        level: ThreatLevel,
        primary_frequency: u32,
        secondary_frequency: Option<u32>,
        description: &str,
    ) {
        let detection = PatternDetection {
            threat_type,
            level,
            primary_frequency,
            secondary_frequency,
            confidence: PATTERN_CONFIDENCE,
            description: description.to_string(),
            timestamp_ms: self.newest_timestamp(),
            active: true,
        };
        match self.threats.push(detection) {
            Ok(()) => self.logger.record(&format!(
                "{} at {} Hz ({:?})",
                description, primary_frequency, level
            )),
            Err(err) => self.logger.warn(&format!("dropping threat: {}", err)),
        }
    }

    pub fn threats(&self) -> &[PatternDetection] {
        self.threats.as_slice()
    }

    pub fn threat_count(&self) -> usize {
        self.threats.len()
    }

    pub fn max_threat_level(&self) -> ThreatLevel {
        self.max_threat_level
    }

    pub fn hop_events(&self) -> &[FrequencyHopEvent] {
        self.hop_events.as_slice()
    }

    pub fn hop_event_count(&self) -> usize {
        self.hop_events.len()
    }

    pub fn burst_patterns(&self) -> &[BurstPattern] {
        self.burst_patterns.as_slice()
    }

    pub fn burst_pattern_count(&self) -> usize {
        self.burst_patterns.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drops every detection. The observation history is kept.
    pub fn clear(&mut self) {
        self.threats.clear();
        self.hop_events.clear();
        self.burst_patterns.clear();
        self.max_threat_level = ThreatLevel::Info;
    }
}

impl AnalysisStage for ThreatDetector {
    fn name(&self) -> &'static str {
        "threat"
    }

    fn analyze(&mut self) {
        self.detect_frequency_hopping();
        self.detect_burst_transmissions();
        self.detect_coordinated_devices();

        self.max_threat_level = self
            .threats
            .iter()
            .filter(|threat| threat.active)
            .map(|threat| threat.level)
            .max()
            .unwrap_or(ThreatLevel::Info);
    }

    fn reset(&mut self) {
        self.clear();
        self.history.clear();
    }
}

impl Default for ThreatDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MHZ: u32 = 1_000_000;

    fn kinds(detector: &ThreatDetector) -> Vec<ThreatType> {
        detector.threats().iter().map(|t| t.threat_type).collect()
    }

    #[test]
    fn fresh_detector_reports_nothing() {
        let detector = ThreatDetector::new();
        assert_eq!(detector.threat_count(), 0);
        assert_eq!(detector.max_threat_level(), ThreatLevel::Info);
        assert!(detector.hop_events().is_empty());
        assert!(detector.burst_patterns().is_empty());
    }

    #[test]
    fn four_distinct_frequencies_are_hopping() {
        let mut detector = ThreatDetector::new();
        for (i, f) in [100, 200, 300, 400].iter().enumerate() {
            // spread out so the coordination window does not see them
            detector.observe_signal(f * MHZ, -60, i as u32 * 5_000, true);
        }
        detector.analyze();

        assert_eq!(kinds(&detector), vec![ThreatType::FrequencyHopping]);
        let hop = &detector.hop_events()[0];
        assert_eq!(hop.frequencies, vec![400 * MHZ, 300 * MHZ, 200 * MHZ, 100 * MHZ]);
        assert_eq!(hop.hop_count(), 4);
        assert_eq!(hop.hop_interval_ms, 5_000);
        assert_eq!(hop.timestamp_ms, 15_000);
        assert_eq!(detector.max_threat_level(), ThreatLevel::High);

        let threat = &detector.threats()[0];
        assert_eq!(threat.primary_frequency, 400 * MHZ);
        assert_eq!(threat.secondary_frequency, Some(300 * MHZ));
        assert_eq!(threat.confidence, PATTERN_CONFIDENCE);
    }

    #[test]
    fn three_frequencies_are_not_hopping() {
        let mut detector = ThreatDetector::new();
        for (i, f) in [100, 200, 300, 100, 200, 300].iter().enumerate() {
            detector.observe_signal(f * MHZ, -60, i as u32 * 5_000, true);
        }
        detector.analyze();
        assert!(detector.hop_events().is_empty());
    }

    #[test]
    fn hopping_only_looks_at_last_eight() {
        let mut detector = ThreatDetector::new();
        for (i, f) in [100, 200, 300].iter().enumerate() {
            detector.observe_signal(f * MHZ, -60, i as u32 * 5_000, true);
        }
        for i in 0..8u32 {
            detector.observe_signal(433 * MHZ, -60, 20_000 + i * 5_000, true);
        }
        detector.analyze();
        assert!(detector.hop_events().is_empty());
    }

    #[test]
    fn alternating_activity_is_a_burst() {
        let mut detector = ThreatDetector::new();
        for i in 0..6u32 {
            detector.observe_signal(433 * MHZ, -60, i * 200, i % 2 == 0);
        }
        detector.analyze();

        assert_eq!(kinds(&detector), vec![ThreatType::BurstTransmission]);
        let burst = detector.burst_patterns()[0];
        assert_eq!(burst.frequency, 433 * MHZ);
        assert_eq!(burst.burst_count, 3);
        assert_eq!(burst.burst_interval_ms, 400);
        assert_eq!(burst.burst_duration_ms, 1_000);
        assert_eq!(burst.timestamp_ms, 1_000);
        assert_eq!(detector.max_threat_level(), ThreatLevel::Medium);
    }

    #[test]
    fn steady_carrier_is_not_a_burst() {
        let mut detector = ThreatDetector::new();
        for i in 0..6u32 {
            detector.observe_signal(433 * MHZ, -60, i * 200, true);
        }
        detector.analyze();
        assert!(detector.burst_patterns().is_empty());
        assert_eq!(detector.threat_count(), 0);
    }

    #[test]
    fn three_frequencies_within_a_second_are_coordinated() {
        let mut detector = ThreatDetector::new();
        detector.observe_signal(433 * MHZ, -60, 10_000, true);
        detector.observe_signal(868 * MHZ, -60, 10_400, true);
        detector.observe_signal(915 * MHZ, -60, 11_000, true);
        detector.analyze();

        assert_eq!(kinds(&detector), vec![ThreatType::CoordinatedNetwork]);
        let threat = &detector.threats()[0];
        assert_eq!(threat.primary_frequency, 915 * MHZ);
        assert_eq!(threat.secondary_frequency, Some(868 * MHZ));
        assert_eq!(detector.max_threat_level(), ThreatLevel::High);
    }

    #[test]
    fn coordination_window_stops_at_first_stale_observation() {
        let mut detector = ThreatDetector::new();
        detector.observe_signal(433 * MHZ, -60, 0, true);
        detector.observe_signal(868 * MHZ, -60, 8_000, true);
        detector.observe_signal(915 * MHZ, -60, 10_000, true);
        detector.analyze();
        assert_eq!(detector.threat_count(), 0);
    }

    #[test]
    fn event_logs_stop_growing_when_full() {
        let mut detector = ThreatDetector::new();
        for (i, f) in [100, 200, 300, 400].iter().enumerate() {
            detector.observe_signal(f * MHZ, -60, i as u32 * 5_000, true);
        }
        for _ in 0..(MAX_THREAT_DETECTIONS + 4) {
            detector.analyze();
        }
        assert_eq!(detector.hop_event_count(), MAX_HOP_EVENTS);
        assert_eq!(detector.threat_count(), MAX_HOP_EVENTS);
    }

    #[test]
    fn history_wraps_at_capacity() {
        let mut detector = ThreatDetector::new();
        for i in 0..(HISTORY_CAPACITY as u32 + 10) {
            detector.observe_signal(433 * MHZ, -60, i, true);
        }
        assert_eq!(detector.history_len(), HISTORY_CAPACITY);
    }

    #[test]
    fn clear_keeps_history_reset_drops_it() {
        let mut detector = ThreatDetector::new();
        for i in 0..6u32 {
            detector.observe_signal(433 * MHZ, -60, i * 200, i % 2 == 0);
        }
        detector.analyze();
        detector.clear();
        detector.clear();
        assert_eq!(detector.threat_count(), 0);
        assert_eq!(detector.max_threat_level(), ThreatLevel::Info);
        assert_eq!(detector.history_len(), 6);

        // the burst is still in the history
        detector.analyze();
        assert_eq!(detector.burst_pattern_count(), 1);

        detector.reset();
        assert_eq!(detector.history_len(), 0);
        assert_eq!(detector.threat_count(), 0);
    }
}
