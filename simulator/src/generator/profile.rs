use guardcore::interface::RadioFrontEnd;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One synthetic transmitter heard by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterConfig {
    #[serde(default)]
    pub label: Option<String>,
    /// Hz.
    pub center_frequency: u32,
    /// Full occupied bandwidth in Hz.
    pub bandwidth: u32,
    pub rssi_dbm: i8,
    /// Fraction of measurements in which the emitter is keyed, 0.0 to 1.0.
    #[serde(default = "always_on")]
    pub duty_cycle: f32,
}

fn always_on() -> f32 {
    1.0
}

impl EmitterConfig {
    pub fn new(center_frequency: u32, bandwidth: u32, rssi_dbm: i8) -> Self {
        Self {
            label: None,
            center_frequency,
            bandwidth,
            rssi_dbm,
            duty_cycle: 1.0,
        }
    }

    pub fn covers(&self, frequency: u32) -> bool {
        frequency.abs_diff(self.center_frequency) <= self.bandwidth / 2
    }
}

/// Configuration for the synthetic receive chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub noise_floor_dbm: i8,
    /// Uniform noise-floor jitter in dB, applied both ways.
    pub jitter_db: u8,
    pub emitters: Vec<EmitterConfig>,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            noise_floor_dbm: -95,
            jitter_db: 3,
            emitters: Vec::new(),
            description: None,
        }
    }
}

/// Seeded front-end that answers every tune with noise plus keyed emitters.
pub struct SyntheticFrontEnd {
    config: GeneratorConfig,
    rng: StdRng,
    measurements: u64,
}

impl SyntheticFrontEnd {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            measurements: 0,
        }
    }

    pub fn measurements(&self) -> u64 {
        self.measurements
    }

    fn noise(&mut self) -> i16 {
        let jitter = self.config.jitter_db as i16;
        let offset = if jitter == 0 {
            0
        } else {
            self.rng.gen_range(-jitter..=jitter)
        };
        self.config.noise_floor_dbm as i16 + offset
    }
}

impl RadioFrontEnd for SyntheticFrontEnd {
    fn measure_rssi(&mut self, frequency: u32) -> i8 {
        self.measurements += 1;
        let mut level = self.noise();
        for emitter in self.config.emitters.iter().filter(|e| e.covers(frequency)) {
            if self.rng.gen::<f32>() < emitter.duty_cycle {
                level = level.max(emitter.rssi_dbm as i16);
            }
        }
        level.clamp(i8::MIN as i16, i8::MAX as i16) as i8
    }
}
