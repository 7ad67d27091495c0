//! Passive jamming detection from RSSI anomalies against a rolling baseline.

use serde::{Deserialize, Serialize};

use crate::buffers::BoundedLog;
use crate::math::StatsHelper;
use crate::prelude::{AnalysisStage, GuardResult};
use crate::telemetry::LogManager;

pub const MAX_JAMMING_EVENTS: usize = 16;
pub const MAX_BASELINES: usize = 16;
pub const BASELINE_WINDOW: usize = 8;
/// dB above baseline before a sample counts as an anomaly.
pub const RSSI_ANOMALY_THRESHOLD: i16 = 20;
pub const MIN_JAMMING_DURATION_MS: u16 = 100;
/// Reference level for frequencies the baseline table has no room for.
pub const DEFAULT_NOISE_FLOOR_DBM: i8 = -90;
/// Tolerance used when asking whether a frequency is jammed.
pub const JAMMED_FREQUENCY_TOLERANCE_HZ: u32 = 10_000_000;

// Window samples outside this open interval are left out of the average.
const PLAUSIBLE_RSSI_MIN: i8 = -100;
const PLAUSIBLE_RSSI_MAX: i8 = -40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JammingStatus {
    Clear,
    Suspicious,
    Confirmed,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JammingType {
    Unknown,
    /// Constant carrier.
    Continuous,
    Sweeping,
    Pulsed,
    /// Broadband noise.
    Noise,
    Barrage,
}

impl JammingType {
    pub fn from_excess(delta_db: i16) -> Self {
        if delta_db > 40 {
            JammingType::Continuous
        } else if delta_db > 30 {
            JammingType::Noise
        } else if delta_db > 20 {
            JammingType::Pulsed
        } else {
            JammingType::Unknown
        }
    }
}

impl JammingStatus {
    fn from_excess(delta_db: i16) -> Self {
        if delta_db > 40 {
            JammingStatus::Critical
        } else if delta_db > 30 {
            JammingStatus::Confirmed
        } else {
            JammingStatus::Suspicious
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JammingEvent {
    pub timestamp_ms: u32,
    pub frequency: u32,
    pub rssi_baseline: i8,
    pub rssi_peak: i8,
    pub jamming_type: JammingType,
    pub severity: JammingStatus,
    pub duration_ms: u16,
    pub active: bool,
}

/// Rolling noise floor for one exact frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBaseline {
    pub frequency: u32,
    pub baseline_rssi: i8,
    pub recent_rssi: [i8; BASELINE_WINDOW],
    pub sample_count: u32,
    pub active: bool,
}

impl FrequencyBaseline {
    fn seeded(frequency: u32, rssi: i8) -> Self {
        Self {
            frequency,
            baseline_rssi: rssi,
            recent_rssi: [0; BASELINE_WINDOW],
            sample_count: 0,
            active: true,
        }
    }

    fn fold(&mut self, rssi: i8) {
        let idx = self.sample_count as usize % BASELINE_WINDOW;
        self.recent_rssi[idx] = rssi;
        self.sample_count = self.sample_count.saturating_add(1);

        if (self.sample_count as usize) < BASELINE_WINDOW {
            return;
        }
        let plausible = self
            .recent_rssi
            .iter()
            .copied()
            .filter(|v| *v > PLAUSIBLE_RSSI_MIN && *v < PLAUSIBLE_RSSI_MAX);
        if let Some(mean) = StatsHelper::mean_dbm(plausible) {
            self.baseline_rssi = mean;
        }
    }
}

pub struct JammingDetector {
    events: BoundedLog<JammingEvent>,
    baselines: BoundedLog<FrequencyBaseline>,
    current_status: JammingStatus,
    total_detections: u32,
    last_detection_time: u32,
    logger: LogManager,
}

impl JammingDetector {
    pub fn new() -> Self {
        Self {
            events: BoundedLog::with_capacity("jamming events", MAX_JAMMING_EVENTS),
            baselines: BoundedLog::with_capacity("frequency baselines", MAX_BASELINES),
            current_status: JammingStatus::Clear,
            total_detections: 0,
            last_detection_time: 0,
            logger: LogManager::new("anti-jamming"),
        }
    }

    /// Folds `rssi` into the frequency's baseline and then scores it against
    /// the updated average.
    ///
    /// The first sample seen on a newly tracked frequency seeds the baseline
    /// with itself and so never triggers. Returns `Err` only when an anomaly
    /// was found but the event log is already full.
    pub fn add_measurement(
        &mut self,
        frequency: u32,
        rssi: i8,
        timestamp_ms: u32,
    ) -> GuardResult<()> {
        let reference = if self.update_baseline(frequency, rssi) {
            self.baseline(frequency).unwrap_or(rssi)
        } else {
            DEFAULT_NOISE_FLOOR_DBM
        };

        let delta = rssi as i16 - reference as i16;
        if delta <= RSSI_ANOMALY_THRESHOLD {
            return Ok(());
        }
        self.log_event(frequency, rssi, reference, delta, timestamp_ms)
    }

    fn update_baseline(&mut self, frequency: u32, rssi: i8) -> bool {
        if let Some(baseline) = self
            .baselines
            .iter_mut()
            .find(|b| b.active && b.frequency == frequency)
        {
            baseline.fold(rssi);
            return true;
        }

        let mut baseline = FrequencyBaseline::seeded(frequency, rssi);
        baseline.fold(rssi);
        match self.baselines.push(baseline) {
            Ok(()) => true,
            Err(_) => {
                self.logger.trace(&format!(
                    "baseline table full, {} Hz compared against noise floor",
                    frequency
                ));
                false
            }
        }
    }

    fn log_event(
        &mut self,
        frequency: u32,
        rssi: i8,
        baseline: i8,
        delta: i16,
        timestamp_ms: u32,
    ) -> GuardResult<()> {
        let event = JammingEvent {
            timestamp_ms,
            frequency,
            rssi_baseline: baseline,
            rssi_peak: rssi,
            jamming_type: JammingType::from_excess(delta),
            severity: JammingStatus::from_excess(delta),
            duration_ms: MIN_JAMMING_DURATION_MS,
            active: true,
        };

        if let Err(err) = self.events.push(event) {
            self.logger
                .warn(&format!("dropping jamming event at {} Hz: {}", frequency, err));
            return Err(err);
        }
        self.total_detections += 1;
        self.last_detection_time = timestamp_ms;
        self.logger.record(&format!(
            "{:?} jamming at {} Hz: {} dBm over {} dBm baseline",
            event.jamming_type, frequency, rssi, baseline
        ));

        self.analyze();
        Ok(())
    }

    /// Baseline currently held for an exact frequency.
    pub fn baseline(&self, frequency: u32) -> Option<i8> {
        self.baselines
            .iter()
            .find(|b| b.active && b.frequency == frequency)
            .map(|b| b.baseline_rssi)
    }

    pub fn baselines(&self) -> &[FrequencyBaseline] {
        self.baselines.as_slice()
    }

    pub fn is_frequency_jammed(&self, frequency: u32) -> bool {
        self.events.iter().any(|event| {
            event.active && event.frequency.abs_diff(frequency) < JAMMED_FREQUENCY_TOLERANCE_HZ
        })
    }

    pub fn status(&self) -> JammingStatus {
        self.current_status
    }

    pub fn events(&self) -> &[JammingEvent] {
        self.events.as_slice()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.current_status = JammingStatus::Clear;
    }

    pub fn total_detections(&self) -> u32 {
        self.total_detections
    }

    pub fn last_detection_time(&self) -> u32 {
        self.last_detection_time
    }
}

impl AnalysisStage for JammingDetector {
    fn name(&self) -> &'static str {
        "anti-jamming"
    }

    fn analyze(&mut self) {
        let active = self.events.iter().filter(|e| e.active).count();
        let critical = self
            .events
            .iter()
            .any(|e| e.active && e.severity == JammingStatus::Critical);

        self.current_status = if critical {
            JammingStatus::Critical
        } else if active >= 3 {
            JammingStatus::Confirmed
        } else if active > 0 {
            JammingStatus::Suspicious
        } else {
            JammingStatus::Clear
        };
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for JammingDetector {
    fn default() -> Self {
        Self::new()
    }
}
