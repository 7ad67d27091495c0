//! Band membership tables used for device classification.
//!
//! Each band is a union of inclusive windows in Hz. The windows are kept as
//! plain data so they can be checked against a band plan without touching the
//! classification priority logic in [`crate::profiler::classify`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// L-band: GPS, Iridium, Inmarsat.
    Satellite,
    /// GSM 900/1800, UMTS 2100, LTE 700-900.
    Cellular,
    /// 433/868/915 MHz.
    Ism,
    /// AIS channels A and B, 161.975 / 162.025 MHz +-10 kHz.
    Ais,
    /// 406.025 MHz +-5 kHz distress beacons.
    Epirb,
    MarineVhf,
    /// 2.4 GHz WiFi/Bluetooth.
    Wideband24,
}

pub const BAND_WINDOWS: &[(Band, u32, u32)] = &[
    (Band::Satellite, 1_559_000_000, 1_630_000_000),
    (Band::Cellular, 880_000_000, 960_000_000),
    (Band::Cellular, 1_710_000_000, 1_880_000_000),
    (Band::Cellular, 1_920_000_000, 2_170_000_000),
    (Band::Cellular, 700_000_000, 900_000_000),
    (Band::Ism, 433_000_000, 435_000_000),
    (Band::Ism, 863_000_000, 870_000_000),
    (Band::Ism, 902_000_000, 928_000_000),
    (Band::Ais, 161_965_000, 161_985_000),
    (Band::Ais, 162_015_000, 162_035_000),
    (Band::Epirb, 406_020_000, 406_030_000),
    (Band::MarineVhf, 156_000_000, 174_000_000),
    (Band::Wideband24, 2_400_000_000, 2_500_000_000),
];

impl Band {
    fn bit(self) -> u8 {
        match self {
            Band::Satellite => 1 << 0,
            Band::Cellular => 1 << 1,
            Band::Ism => 1 << 2,
            Band::Ais => 1 << 3,
            Band::Epirb => 1 << 4,
            Band::MarineVhf => 1 << 5,
            Band::Wideband24 => 1 << 6,
        }
    }

    pub fn contains(self, frequency: u32) -> bool {
        BAND_WINDOWS
            .iter()
            .any(|&(band, low, high)| band == self && (low..=high).contains(&frequency))
    }
}

/// Set of bands a device has been heard on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandSet(u8);

impl BandSet {
    /// Bands that contain `frequency`. Windows overlap, so more than one may match.
    pub fn of_frequency(frequency: u32) -> Self {
        BAND_WINDOWS
            .iter()
            .filter(|(_, low, high)| (*low..=*high).contains(&frequency))
            .fold(Self::default(), |set, (band, _, _)| set.with(*band))
    }

    pub fn of_frequencies<I>(frequencies: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        frequencies
            .into_iter()
            .fold(Self::default(), |set, freq| set.union(Self::of_frequency(freq)))
    }

    pub fn with(self, band: Band) -> Self {
        Self(self.0 | band.bit())
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn has(self, band: Band) -> bool {
        self.0 & band.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
