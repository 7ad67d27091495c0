use serde::{Deserialize, Serialize};

use crate::buffers::BoundedLog;
use crate::interface::RadioFrontEnd;
use crate::prelude::{GuardError, GuardResult, DEFAULT_ACTIVITY_THRESHOLD_DBM};
use crate::scanner::profile::{FrequencyRange, ScanProfile};
use crate::telemetry::LogManager;

pub const MAX_SCAN_RANGES: usize = 8;
pub const MAX_SCAN_RESULTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Idle,
    Scanning,
    Paused,
    Complete,
}

/// One measured point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub frequency: u32,
    pub rssi: i8,
    pub active: bool,
}

/// Frequency sweep planner.
///
/// Holds up to [`MAX_SCAN_RANGES`] ranges and walks a cursor across them one
/// step per [`SweepPlanner::process`] call. Results past [`MAX_SCAN_RESULTS`]
/// are dropped and counted.
pub struct SweepPlanner {
    status: ScanStatus,
    profile: Option<ScanProfile>,
    ranges: BoundedLog<FrequencyRange>,
    results: BoundedLog<ScanResult>,
    dropped_results: usize,
    current_frequency: u32,
    current_range_index: usize,
    total_steps: u32,
    current_step: u32,
    activity_threshold_dbm: i8,
    logger: LogManager,
}

impl SweepPlanner {
    pub fn new() -> Self {
        Self {
            status: ScanStatus::Idle,
            profile: None,
            ranges: BoundedLog::with_capacity("scan ranges", MAX_SCAN_RANGES),
            results: BoundedLog::with_capacity("scan results", MAX_SCAN_RESULTS),
            dropped_results: 0,
            current_frequency: 0,
            current_range_index: 0,
            total_steps: 0,
            current_step: 0,
            activity_threshold_dbm: DEFAULT_ACTIVITY_THRESHOLD_DBM,
            logger: LogManager::new("scanner"),
        }
    }

    /// Returns the planner to its power-on state, dropping ranges and results.
    pub fn init(&mut self) {
        let threshold = self.activity_threshold_dbm;
        *self = Self::new();
        self.activity_threshold_dbm = threshold;
    }

    /// Replaces the configured ranges with a preset table.
    ///
    /// A paused sweep is abandoned: the planner returns to Idle with its
    /// cursor rewound, and `start` begins the new table from its first range.
    pub fn load_profile(&mut self, profile: ScanProfile) -> GuardResult<()> {
        if self.status == ScanStatus::Scanning {
            return Err(GuardError::InvalidState(
                "cannot load a profile while scanning".into(),
            ));
        }
        if self.status == ScanStatus::Paused {
            self.logger
                .trace("paused sweep abandoned for a new profile");
            self.rewind();
        }

        self.ranges.clear();
        for range in profile.ranges() {
            self.ranges.push(*range)?;
        }
        self.profile = Some(profile);
        self.logger.record(&format!(
            "loaded profile {} ({} ranges)",
            profile.label(),
            self.ranges.len()
        ));
        Ok(())
    }

    pub fn add_range(&mut self, start_freq: u32, end_freq: u32, step: u32) -> GuardResult<()> {
        let range = FrequencyRange::new(start_freq, end_freq, step);
        if !range.is_valid() {
            return Err(GuardError::InvalidInput(format!(
                "range {}..{} step {} is not sweepable",
                start_freq, end_freq, step
            )));
        }
        self.ranges.push(range)
    }

    pub fn start(&mut self) -> GuardResult<()> {
        let first = self
            .ranges
            .get(0)
            .copied()
            .ok_or_else(|| GuardError::InvalidState("no ranges configured".into()))?;

        self.status = ScanStatus::Scanning;
        self.current_range_index = 0;
        self.current_step = 0;
        self.results.clear();
        self.dropped_results = 0;
        self.total_steps = self.ranges.iter().map(FrequencyRange::step_count).sum();
        self.current_frequency = first.start_freq;

        self.logger.record(&format!(
            "sweep started: {} ranges, {} steps",
            self.ranges.len(),
            self.total_steps
        ));
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.status == ScanStatus::Scanning {
            self.status = ScanStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == ScanStatus::Paused {
            self.status = ScanStatus::Scanning;
        }
    }

    pub fn stop(&mut self) {
        self.status = ScanStatus::Idle;
        self.current_step = 0;
    }

    fn rewind(&mut self) {
        self.status = ScanStatus::Idle;
        self.current_range_index = 0;
        self.current_frequency = 0;
        self.current_step = 0;
        self.total_steps = 0;
    }

    /// Measures the current frequency and advances the cursor by one step.
    ///
    /// Returns `None` unless the planner is scanning. The sweep completes after
    /// the last point of the last range has been measured. Every point after
    /// the first of its range counts as one step, so progress only reaches 100
    /// once the final point is in.
    pub fn process<F>(&mut self, front_end: &mut F) -> Option<ScanResult>
    where
        F: RadioFrontEnd + ?Sized,
    {
        if self.status != ScanStatus::Scanning {
            return None;
        }
        let range = *self.ranges.get(self.current_range_index)?;

        let frequency = self.current_frequency;
        let rssi = front_end.measure_rssi(frequency);
        let result = ScanResult {
            frequency,
            rssi,
            active: rssi >= self.activity_threshold_dbm,
        };

        if self.results.push(result).is_err() {
            self.dropped_results += 1;
            if self.dropped_results == 1 {
                self.logger.warn("result buffer full, dropping further results");
            }
        }
        if frequency != range.start_freq {
            self.current_step = self.current_step.saturating_add(1);
        }

        match frequency
            .checked_add(range.step_size)
            .filter(|next| *next <= range.end_freq)
        {
            Some(next) => self.current_frequency = next,
            None => self.advance_range(),
        }

        Some(result)
    }

    fn advance_range(&mut self) {
        self.current_range_index += 1;
        match self.ranges.get(self.current_range_index) {
            Some(next) => self.current_frequency = next.start_freq,
            None => {
                self.status = ScanStatus::Complete;
                self.logger.record(&format!(
                    "sweep complete: {} results, {} dropped",
                    self.results.len(),
                    self.dropped_results
                ));
            }
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn profile(&self) -> Option<ScanProfile> {
        self.profile
    }

    /// Sweep progress in percent. Only a completed sweep reports 100.
    pub fn progress(&self) -> u8 {
        if self.status == ScanStatus::Complete {
            return 100;
        }
        if self.total_steps == 0 {
            return 0;
        }
        let progress = (self.current_step as u64 * 100) / self.total_steps as u64;
        progress.min(99) as u8
    }

    pub fn current_frequency(&self) -> u32 {
        self.current_frequency
    }

    pub fn ranges(&self) -> &[FrequencyRange] {
        self.ranges.as_slice()
    }

    pub fn results(&self) -> &[ScanResult] {
        self.results.as_slice()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn dropped_results(&self) -> usize {
        self.dropped_results
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.dropped_results = 0;
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn set_activity_threshold(&mut self, threshold_dbm: i8) {
        self.activity_threshold_dbm = threshold_dbm;
    }
}

impl Default for SweepPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(_frequency: u32) -> i8 {
        -95
    }

    #[test]
    fn fresh_planner_reports_empty_state() {
        let planner = SweepPlanner::new();
        assert_eq!(planner.status(), ScanStatus::Idle);
        assert_eq!(planner.progress(), 0);
        assert_eq!(planner.current_frequency(), 0);
        assert_eq!(planner.result_count(), 0);
        assert!(planner.ranges().is_empty());
    }

    #[test]
    fn start_without_ranges_is_rejected() {
        let mut planner = SweepPlanner::new();
        let err = planner.start().unwrap_err();
        assert!(matches!(err, GuardError::InvalidState(_)));
        assert_eq!(planner.status(), ScanStatus::Idle);
    }

    #[test]
    fn profile_cannot_change_mid_sweep() {
        let mut planner = SweepPlanner::new();
        planner.load_profile(ScanProfile::Ism).unwrap();
        planner.start().unwrap();

        assert!(planner.load_profile(ScanProfile::Satellite).is_err());
        assert_eq!(planner.ranges(), ScanProfile::Ism.ranges());

        planner.pause();
        planner.load_profile(ScanProfile::Satellite).unwrap();
        assert_eq!(planner.profile(), Some(ScanProfile::Satellite));
        assert_eq!(planner.status(), ScanStatus::Idle);
    }

    #[test]
    fn range_table_is_bounded() {
        let mut planner = SweepPlanner::new();
        for i in 0..MAX_SCAN_RANGES as u32 {
            planner.add_range(i * 1_000, i * 1_000 + 500, 100).unwrap();
        }
        let err = planner.add_range(0, 100, 10).unwrap_err();
        assert!(matches!(err, GuardError::CapacityExhausted(_)));
        assert_eq!(planner.ranges().len(), MAX_SCAN_RANGES);
    }

    #[test]
    fn malformed_range_is_rejected() {
        let mut planner = SweepPlanner::new();
        assert!(planner.add_range(500, 100, 10).is_err());
        assert!(planner.add_range(100, 500, 0).is_err());
        assert!(planner.ranges().is_empty());
    }

    #[test]
    fn start_counts_whole_steps_and_positions_cursor() {
        let mut planner = SweepPlanner::new();
        planner.add_range(1_000, 1_950, 100).unwrap();
        planner.add_range(5_000, 5_300, 100).unwrap();
        planner.start().unwrap();

        assert_eq!(planner.total_steps(), 9 + 3);
        assert_eq!(planner.current_frequency(), 1_000);
        assert_eq!(planner.status(), ScanStatus::Scanning);
    }

    #[test]
    fn sweep_walks_every_range_then_completes() {
        let mut planner = SweepPlanner::new();
        planner.add_range(100, 300, 100).unwrap();
        planner.add_range(1_000, 1_100, 100).unwrap();
        planner.start().unwrap();

        let mut front_end = quiet;
        let mut visited = Vec::new();
        while let Some(result) = planner.process(&mut front_end) {
            visited.push(result.frequency);
        }

        assert_eq!(visited, vec![100, 200, 300, 1_000, 1_100]);
        assert_eq!(planner.status(), ScanStatus::Complete);
        assert_eq!(planner.progress(), 100);
        assert_eq!(planner.result_count(), 5);
    }

    #[test]
    fn progress_tracks_steps() {
        let mut planner = SweepPlanner::new();
        planner.add_range(0, 1_000, 100).unwrap();
        planner.start().unwrap();

        let mut front_end = quiet;
        for _ in 0..6 {
            planner.process(&mut front_end);
        }
        // 0..=500 measured: five steps of ten
        assert_eq!(planner.progress(), 50);
    }

    #[test]
    fn progress_stays_below_full_until_last_point() {
        let mut planner = SweepPlanner::new();
        planner.add_range(0, 300, 100).unwrap();
        planner.add_range(1_000, 1_000, 100).unwrap();
        planner.start().unwrap();

        let mut front_end = quiet;
        for _ in 0..4 {
            planner.process(&mut front_end);
        }
        // every counted step is taken but 1_000 is still pending
        assert_eq!(planner.current_frequency(), 1_000);
        assert_eq!(planner.status(), ScanStatus::Scanning);
        assert_eq!(planner.progress(), 99);

        planner.process(&mut front_end);
        assert_eq!(planner.status(), ScanStatus::Complete);
        assert_eq!(planner.progress(), 100);
    }

    #[test]
    fn single_point_sweep_reports_full_progress_when_complete() {
        let mut planner = SweepPlanner::new();
        planner.add_range(5_000, 5_000, 1).unwrap();
        planner.start().unwrap();
        assert_eq!(planner.progress(), 0);

        let mut front_end = quiet;
        planner.process(&mut front_end);
        assert_eq!(planner.status(), ScanStatus::Complete);
        assert_eq!(planner.progress(), 100);
    }

    #[test]
    fn profile_swap_while_paused_rewinds_the_sweep() {
        let mut planner = SweepPlanner::new();
        planner.load_profile(ScanProfile::Maritime).unwrap();
        planner.start().unwrap();

        let mut front_end = quiet;
        let epirb = ScanProfile::Maritime.ranges()[2].start_freq;
        while planner.current_frequency() < epirb {
            planner.process(&mut front_end).unwrap();
        }
        planner.process(&mut front_end).unwrap();
        planner.pause();
        assert!(planner.progress() > 0);

        planner.load_profile(ScanProfile::Satellite).unwrap();
        assert_eq!(planner.status(), ScanStatus::Idle);
        assert_eq!(planner.progress(), 0);

        planner.resume();
        assert!(planner.process(&mut front_end).is_none());

        planner.start().unwrap();
        let first = planner.process(&mut front_end).unwrap();
        assert_eq!(first.frequency, ScanProfile::Satellite.ranges()[0].start_freq);

        while planner.process(&mut front_end).is_some() {}
        assert_eq!(planner.status(), ScanStatus::Complete);
        assert_eq!(planner.progress(), 100);
    }

    #[test]
    fn paused_sweep_does_not_advance() {
        let mut planner = SweepPlanner::new();
        planner.add_range(0, 1_000, 100).unwrap();
        planner.start().unwrap();
        planner.pause();

        let mut front_end = quiet;
        assert!(planner.process(&mut front_end).is_none());
        assert_eq!(planner.current_frequency(), 0);

        planner.resume();
        assert!(planner.process(&mut front_end).is_some());
        assert_eq!(planner.current_frequency(), 100);
    }

    #[test]
    fn pause_and_resume_ignore_other_states() {
        let mut planner = SweepPlanner::new();
        planner.resume();
        assert_eq!(planner.status(), ScanStatus::Idle);
        planner.pause();
        assert_eq!(planner.status(), ScanStatus::Idle);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut planner = SweepPlanner::new();
        planner.add_range(0, 1_000, 100).unwrap();
        planner.start().unwrap();
        let mut front_end = quiet;
        planner.process(&mut front_end);

        planner.stop();
        let once = (planner.status(), planner.progress(), planner.result_count());
        planner.stop();
        let twice = (planner.status(), planner.progress(), planner.result_count());
        assert_eq!(once, twice);
        assert_eq!(once.0, ScanStatus::Idle);
        assert_eq!(once.1, 0);
    }

    #[test]
    fn results_past_capacity_are_dropped() {
        let mut planner = SweepPlanner::new();
        planner.add_range(0, 299, 1).unwrap();
        planner.start().unwrap();

        let mut front_end = quiet;
        while planner.process(&mut front_end).is_some() {}

        assert_eq!(planner.result_count(), MAX_SCAN_RESULTS);
        assert_eq!(planner.dropped_results(), 300 - MAX_SCAN_RESULTS);
        assert_eq!(planner.results()[0].frequency, 0);
    }

    #[test]
    fn activity_flag_follows_threshold() {
        let mut planner = SweepPlanner::new();
        planner.set_activity_threshold(-70);
        planner.add_range(0, 100, 100).unwrap();
        planner.start().unwrap();

        let mut front_end = |frequency: u32| if frequency == 0 { -60 } else { -90 };
        let first = planner.process(&mut front_end).unwrap();
        let second = planner.process(&mut front_end).unwrap();
        assert!(first.active);
        assert!(!second.active);
    }
}
