//! Ordered classification rules.
//!
//! Rules are evaluated top to bottom and the first match wins. Maritime bands
//! override vehicle patterns, which override the generic satellite, cellular
//! and ISM rules, which override 2.4 GHz.

use crate::profiler::bands::{Band, BandSet};
use crate::profiler::device::DeviceType;

struct Rule {
    matches: fn(BandSet, usize) -> bool,
    yields: DeviceType,
}

const RULES: &[Rule] = &[
    Rule {
        matches: |bands, _| bands.has(Band::Ais),
        yields: DeviceType::AisTransponder,
    },
    Rule {
        matches: |bands, _| bands.has(Band::Epirb),
        yields: DeviceType::EpirbBeacon,
    },
    Rule {
        matches: |bands, _| bands.has(Band::MarineVhf) && !bands.has(Band::Cellular),
        yields: DeviceType::MarineVhf,
    },
    // TODO: confirm with field operators that ISM + L-band really indicates a
    // magnetic tracker; it shadows the plain ISM tracker rule below.
    Rule {
        matches: |bands, _| bands.has(Band::Ism) && bands.has(Band::Satellite),
        yields: DeviceType::MagneticTracker,
    },
    Rule {
        matches: |bands, count| {
            bands.has(Band::Cellular) && bands.has(Band::Satellite) && count >= 2
        },
        yields: DeviceType::VehicleGpsTracker,
    },
    Rule {
        matches: |bands, _| bands.has(Band::Satellite) && bands.has(Band::MarineVhf),
        yields: DeviceType::MarineSatelliteTracker,
    },
    Rule {
        matches: |bands, _| bands.has(Band::Satellite) && bands.has(Band::Cellular),
        yields: DeviceType::BoatGpsTracker,
    },
    Rule {
        matches: |bands, count| bands.has(Band::Satellite) && count >= 2,
        yields: DeviceType::SatelliteTracker,
    },
    Rule {
        matches: |bands, count| bands.has(Band::Cellular) && count >= 2,
        yields: DeviceType::CellularTracker,
    },
    Rule {
        matches: |bands, count| bands.has(Band::Ism) && count >= 1,
        yields: DeviceType::IsmTracker,
    },
    Rule {
        matches: |bands, _| bands.has(Band::Wideband24),
        yields: DeviceType::BleBeacon,
    },
];

/// Classifies a device from the bands it occupies and how many frequencies it holds.
pub fn classify(bands: BandSet, frequency_count: usize) -> DeviceType {
    if frequency_count == 0 {
        return DeviceType::Unknown;
    }
    RULES
        .iter()
        .find(|rule| (rule.matches)(bands, frequency_count))
        .map(|rule| rule.yields)
        .unwrap_or(DeviceType::Unknown)
}
