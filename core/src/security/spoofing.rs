//! GNSS spoofing indicators computed from received L-band signal levels.
//!
//! Genuine satellites arrive weak and at scattered levels because each one is
//! at a different range. A ground spoofer tends to be strong and uniform. Each
//! indicator is evaluated independently on every pass and the number of
//! indicators raised sets the status.

use serde::{Deserialize, Serialize};

use crate::buffers::{BoundedLog, RingBuffer};
use crate::math::StatsHelper;
use crate::prelude::AnalysisStage;
use crate::telemetry::LogManager;

pub const MAX_SPOOFING_EVENTS: usize = 8;
pub const MAX_GPS_MEASUREMENTS: usize = 16;
/// Measurements needed before analysis runs on its own.
pub const MIN_MEASUREMENTS_FOR_ANALYSIS: usize = 4;
/// dB band around the mean inside which a reading counts as uniform.
pub const RSSI_UNIFORMITY_THRESHOLD: i8 = 5;
/// Anything stronger than this is implausible for a satellite at orbital range.
pub const MAX_REALISTIC_GNSS_RSSI: i8 = -100;
pub const GPS_L1_FREQUENCY: u32 = 1_575_420_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GnssConstellation {
    Gps,
    Glonass,
    Galileo,
    Beidou,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoofingStatus {
    Authentic,
    Suspicious,
    Confirmed,
    Critical,
}

impl SpoofingStatus {
    pub fn from_anomaly_count(count: u8) -> Self {
        match count {
            0 => SpoofingStatus::Authentic,
            1 => SpoofingStatus::Suspicious,
            2 | 3 => SpoofingStatus::Confirmed,
            _ => SpoofingStatus::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoofingIndicators {
    /// Receiver clock drift does not match the oscillator.
    pub clock_drift_anomaly: bool,
    /// All satellites arrive at nearly the same strength.
    pub signal_strength_uniform: bool,
    /// Expected Doppler shift is missing.
    pub doppler_shift_missing: bool,
    /// Constellations disagree on the solution.
    pub multi_constellation_mismatch: bool,
    /// Position jumped further than the platform can move.
    pub sudden_position_jump: bool,
    /// Signals look like they come from one transmitter.
    pub single_source_correlation: bool,
    pub anomaly_count: u8,
}

impl SpoofingIndicators {
    /// Counts the indicators that feed the status.
    ///
    /// `sudden_position_jump` is reported but does not count.
    pub fn count_anomalies(&self) -> u8 {
        [
            self.signal_strength_uniform,
            self.multi_constellation_mismatch,
            self.clock_drift_anomaly,
            self.doppler_shift_missing,
            self.single_source_correlation,
        ]
        .iter()
        .filter(|raised| **raised)
        .count() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsSignalMeasurement {
    pub constellation: GnssConstellation,
    pub frequency: u32,
    pub rssi: i8,
    pub timestamp_ms: u32,
    /// Always zero until the receiver reports Doppler.
    pub doppler_shift: i16,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoofingEvent {
    pub timestamp_ms: u32,
    pub severity: SpoofingStatus,
    pub indicators: SpoofingIndicators,
    pub affected_frequency: u32,
    pub description: String,
    pub active: bool,
}

pub struct SpoofingDetector {
    measurements: RingBuffer<GpsSignalMeasurement>,
    events: BoundedLog<SpoofingEvent>,
    current_status: SpoofingStatus,
    current_indicators: SpoofingIndicators,
    total_detections: u32,
    last_detection_time: u32,
    logger: LogManager,
}

impl SpoofingDetector {
    pub fn new() -> Self {
        Self {
            measurements: RingBuffer::with_capacity(MAX_GPS_MEASUREMENTS),
            events: BoundedLog::with_capacity("spoofing events", MAX_SPOOFING_EVENTS),
            current_status: SpoofingStatus::Authentic,
            current_indicators: SpoofingIndicators::default(),
            total_detections: 0,
            last_detection_time: 0,
            logger: LogManager::new("gps-spoofing"),
        }
    }

    pub fn add_measurement(
        &mut self,
        constellation: GnssConstellation,
        frequency: u32,
        rssi: i8,
        timestamp_ms: u32,
    ) {
        self.measurements.push(GpsSignalMeasurement {
            constellation,
            frequency,
            rssi,
            timestamp_ms,
            doppler_shift: 0,
            active: true,
        });

        if self.measurements.total_pushed() >= MIN_MEASUREMENTS_FOR_ANALYSIS {
            self.analyze();
        }
    }

    fn active_measurements(&self) -> impl Iterator<Item = &GpsSignalMeasurement> + '_ {
        self.measurements.iter().filter(|m| m.active)
    }

    fn check_signal_uniformity(&self) -> bool {
        let count = self.active_measurements().count();
        if count < MIN_MEASUREMENTS_FOR_ANALYSIS {
            return false;
        }
        let Some(mean) = StatsHelper::mean_dbm(self.active_measurements().map(|m| m.rssi)) else {
            return false;
        };
        let within = StatsHelper::count_within(
            self.active_measurements().map(|m| m.rssi),
            mean,
            RSSI_UNIFORMITY_THRESHOLD,
        );
        within * 4 > count * 3
    }

    fn check_multi_constellation_consistency(&self) -> bool {
        let has_gps = self
            .active_measurements()
            .any(|m| m.constellation == GnssConstellation::Gps);
        let has_other = self
            .active_measurements()
            .any(|m| m.constellation != GnssConstellation::Gps);
        if !has_gps || !has_other {
            return false;
        }
        // TODO: compare per-constellation position fixes once the receiver
        // exposes them; until then both constellations are taken as consistent.
        false
    }

    fn check_rssi_realism(&self) -> bool {
        self.active_measurements()
            .all(|m| m.rssi <= MAX_REALISTIC_GNSS_RSSI)
    }

    fn update_indicators(&mut self) {
        let mut indicators = SpoofingIndicators {
            signal_strength_uniform: self.check_signal_uniformity(),
            multi_constellation_mismatch: self.check_multi_constellation_consistency(),
            single_source_correlation: !self.check_rssi_realism(),
            clock_drift_anomaly: false,
            doppler_shift_missing: false,
            sudden_position_jump: false,
            anomaly_count: 0,
        };
        indicators.anomaly_count = indicators.count_anomalies();
        self.current_indicators = indicators;
    }

    fn log_spoofing_event(&mut self, description: &str) {
        let timestamp_ms = self
            .measurements
            .newest()
            .map(|m| m.timestamp_ms)
            .unwrap_or_default();
        let event = SpoofingEvent {
            timestamp_ms,
            severity: self.current_status,
            indicators: self.current_indicators,
            affected_frequency: GPS_L1_FREQUENCY,
            description: description.to_string(),
            active: true,
        };

        if let Err(err) = self.events.push(event) {
            self.logger.warn(&format!("dropping spoofing event: {}", err));
            return;
        }
        self.total_detections += 1;
        self.last_detection_time = timestamp_ms;
        self.logger.record(&format!(
            "{} ({} indicators)",
            description, self.current_indicators.anomaly_count
        ));
    }

    pub fn status(&self) -> SpoofingStatus {
        self.current_status
    }

    pub fn indicators(&self) -> SpoofingIndicators {
        self.current_indicators
    }

    pub fn events(&self) -> &[SpoofingEvent] {
        self.events.as_slice()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.current_status = SpoofingStatus::Authentic;
    }

    pub fn total_detections(&self) -> u32 {
        self.total_detections
    }

    pub fn last_detection_time(&self) -> u32 {
        self.last_detection_time
    }
}

impl AnalysisStage for SpoofingDetector {
    fn name(&self) -> &'static str {
        "gps-spoofing"
    }

    fn analyze(&mut self) {
        self.update_indicators();

        let previous = self.current_status;
        self.current_status =
            SpoofingStatus::from_anomaly_count(self.current_indicators.anomaly_count);

        if self.current_status != previous {
            match self.current_status {
                SpoofingStatus::Critical => {
                    self.log_spoofing_event("Multiple spoofing indicators detected")
                }
                SpoofingStatus::Confirmed => self.log_spoofing_event("GPS spoofing likely"),
                SpoofingStatus::Suspicious | SpoofingStatus::Authentic => {}
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SpoofingDetector {
    fn default() -> Self {
        Self::new()
    }
}
