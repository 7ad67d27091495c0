use serde::{Deserialize, Serialize};

/// Inclusive frequency window swept in fixed steps (all values in Hz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub start_freq: u32,
    pub end_freq: u32,
    pub step_size: u32,
}

impl FrequencyRange {
    pub const fn new(start_freq: u32, end_freq: u32, step_size: u32) -> Self {
        Self {
            start_freq,
            end_freq,
            step_size,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.step_size > 0 && self.start_freq <= self.end_freq
    }

    /// Whole steps between start and end, as counted for sweep progress.
    pub fn step_count(&self) -> u32 {
        if self.step_size == 0 {
            return 0;
        }
        self.end_freq.saturating_sub(self.start_freq) / self.step_size
    }
}

/// Named sweep presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanProfile {
    /// 433/868/915 MHz ISM windows.
    Ism,
    /// L-band GPS L1 and Iridium.
    Satellite,
    /// GSM 900 and GSM 1800 up/downlinks.
    Cellular,
    /// 2.4 GHz ISM (WiFi, Bluetooth).
    WifiBle,
    /// Quick pass for vehicle trackers at border or customs stops.
    Vehicle,
    /// Boat and ship trackers for port or coast guard checks.
    Maritime,
}

const ISM_RANGES: &[FrequencyRange] = &[
    FrequencyRange::new(433_050_000, 434_790_000, 25_000),
    FrequencyRange::new(863_000_000, 870_000_000, 25_000),
    FrequencyRange::new(902_000_000, 928_000_000, 25_000),
];

const SATELLITE_RANGES: &[FrequencyRange] = &[
    FrequencyRange::new(1_574_000_000, 1_577_000_000, 100_000),
    FrequencyRange::new(1_616_000_000, 1_626_500_000, 100_000),
];

const CELLULAR_RANGES: &[FrequencyRange] = &[
    FrequencyRange::new(880_000_000, 915_000_000, 200_000),
    FrequencyRange::new(925_000_000, 960_000_000, 200_000),
    FrequencyRange::new(1_710_000_000, 1_785_000_000, 200_000),
    FrequencyRange::new(1_805_000_000, 1_880_000_000, 200_000),
];

const WIFI_BLE_RANGES: &[FrequencyRange] = &[FrequencyRange::new(
    2_400_000_000,
    2_483_500_000,
    1_000_000,
)];

// Coarser steps than the plain presets; a vehicle stop rarely lasts 30 s.
const VEHICLE_RANGES: &[FrequencyRange] = &[
    FrequencyRange::new(433_050_000, 434_790_000, 50_000),
    FrequencyRange::new(824_000_000, 849_000_000, 200_000),
    FrequencyRange::new(869_000_000, 894_000_000, 200_000),
    FrequencyRange::new(880_000_000, 915_000_000, 200_000),
    FrequencyRange::new(925_000_000, 960_000_000, 200_000),
    FrequencyRange::new(1_574_000_000, 1_577_000_000, 200_000),
];

const MARITIME_RANGES: &[FrequencyRange] = &[
    // marine VHF
    FrequencyRange::new(156_000_000, 174_000_000, 25_000),
    // AIS, fine resolution
    FrequencyRange::new(161_900_000, 162_100_000, 5_000),
    // EPIRB 406.025 MHz
    FrequencyRange::new(406_000_000, 406_100_000, 5_000),
    FrequencyRange::new(880_000_000, 915_000_000, 200_000),
    FrequencyRange::new(925_000_000, 960_000_000, 200_000),
    FrequencyRange::new(1_574_000_000, 1_577_000_000, 100_000),
    // Inmarsat
    FrequencyRange::new(1_525_000_000, 1_559_000_000, 200_000),
    // Iridium
    FrequencyRange::new(1_616_000_000, 1_626_500_000, 200_000),
];

impl ScanProfile {
    pub const ALL: [ScanProfile; 6] = [
        ScanProfile::Ism,
        ScanProfile::Satellite,
        ScanProfile::Cellular,
        ScanProfile::WifiBle,
        ScanProfile::Vehicle,
        ScanProfile::Maritime,
    ];

    pub fn ranges(self) -> &'static [FrequencyRange] {
        match self {
            ScanProfile::Ism => ISM_RANGES,
            ScanProfile::Satellite => SATELLITE_RANGES,
            ScanProfile::Cellular => CELLULAR_RANGES,
            ScanProfile::WifiBle => WIFI_BLE_RANGES,
            ScanProfile::Vehicle => VEHICLE_RANGES,
            ScanProfile::Maritime => MARITIME_RANGES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScanProfile::Ism => "ism",
            ScanProfile::Satellite => "satellite",
            ScanProfile::Cellular => "cellular",
            ScanProfile::WifiBle => "wifi_ble",
            ScanProfile::Vehicle => "vehicle",
            ScanProfile::Maritime => "maritime",
        }
    }
}

impl std::str::FromStr for ScanProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ScanProfile::ALL
            .into_iter()
            .find(|profile| profile.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown scan profile '{}'", value))
    }
}
