use crate::buffers::BoundedLog;
use crate::prelude::{AnalysisStage, GuardError, GuardResult};
use crate::profiler::bands::{Band, BandSet};
use crate::profiler::classify::classify;
use crate::profiler::device::DeviceProfile;
use crate::telemetry::LogManager;

pub const MAX_DEVICES: usize = 32;
pub const MAX_FREQUENCIES_PER_DEVICE: usize = 8;

/// Two frequencies closer than this are attributed to the same emitter.
pub const SAME_DEVICE_SPAN_HZ: u32 = 50_000_000;

/// Clusters observations into devices and scores them.
///
/// Clustering is single-linkage and order dependent: a new frequency joins the
/// first active device holding any frequency within [`SAME_DEVICE_SPAN_HZ`],
/// and that decision is never revisited.
pub struct SignalConsolidator {
    devices: BoundedLog<DeviceProfile>,
    logger: LogManager,
}

impl SignalConsolidator {
    pub fn new() -> Self {
        Self {
            devices: BoundedLog::with_capacity("device table", MAX_DEVICES),
            logger: LogManager::new("profiler"),
        }
    }

    pub fn add_signal(&mut self, frequency: u32, rssi: i8) -> GuardResult<()> {
        let matched = self.devices.iter().position(|device| {
            device.active
                && device
                    .frequency_values()
                    .any(|known| Self::same_device(frequency, known))
        });

        if let Some(index) = matched {
            let device = self
                .devices
                .get_mut(index)
                .ok_or_else(|| GuardError::Internal(format!("device slot {} vanished", index)))?;
            return device.add_frequency(frequency, rssi).map_err(|_| {
                GuardError::CapacityExhausted(format!(
                    "device {} already holds {} frequencies",
                    device.device_id, MAX_FREQUENCIES_PER_DEVICE
                ))
            });
        }

        let device_id = self.devices.len() as u32 + 1;
        self.devices.push(DeviceProfile::new(
            device_id,
            frequency,
            rssi,
            MAX_FREQUENCIES_PER_DEVICE,
        ))?;
        self.logger
            .trace(&format!("device {} created at {} Hz", device_id, frequency));
        Ok(())
    }

    pub fn same_device(freq_a: u32, freq_b: u32) -> bool {
        freq_a.abs_diff(freq_b) < SAME_DEVICE_SPAN_HZ
    }

    /// Risk score in [0, 100] for a classified device.
    pub fn calculate_risk(device: &DeviceProfile) -> u8 {
        if !device.active {
            return 0;
        }
        let mut risk = device.device_type.base_risk() as u16;
        if device.frequency_count() > 2 {
            risk += 10;
        }
        if device.has_satellite_proximity {
            risk += 15;
        }
        if device.has_cellular_proximity {
            risk += 10;
        }
        risk.min(100) as u8
    }

    /// Whether some active device already holds exactly `frequency`.
    pub fn knows_frequency(&self, frequency: u32) -> bool {
        self.devices
            .iter()
            .filter(|device| device.active)
            .any(|device| device.frequency_values().any(|known| known == frequency))
    }

    pub fn device(&self, index: usize) -> Option<&DeviceProfile> {
        self.devices.get(index)
    }

    pub fn devices(&self) -> &[DeviceProfile] {
        self.devices.as_slice()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn clear(&mut self) {
        self.devices.clear();
    }
}

impl AnalysisStage for SignalConsolidator {
    fn name(&self) -> &'static str {
        "profiler"
    }

    fn analyze(&mut self) {
        for device in self.devices.iter_mut().filter(|device| device.active) {
            let bands = BandSet::of_frequencies(device.frequency_values());
            device.device_type = classify(bands, device.frequency_count());
            device.name = device.device_type.display_name().to_string();
            if bands.has(Band::Satellite) {
                device.has_satellite_proximity = true;
            }
            if bands.has(Band::Cellular) {
                device.has_cellular_proximity = true;
            }
            device.risk_score = Self::calculate_risk(device);
        }

        let high_risk = self
            .devices
            .iter()
            .filter(|device| device.risk_score >= 80)
            .count();
        self.logger.record(&format!(
            "analyzed {} devices, {} high risk",
            self.devices.len(),
            high_risk
        ));
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Default for SignalConsolidator {
    fn default() -> Self {
        Self::new()
    }
}
