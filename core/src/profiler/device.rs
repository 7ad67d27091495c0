use serde::{Deserialize, Serialize};

use crate::buffers::BoundedLog;
use crate::prelude::GuardResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Unknown,
    SatelliteTracker,
    CellularTracker,
    IsmTracker,
    BleBeacon,
    WifiDevice,
    DroneComponent,
    KeyFob,
    TirePressure,

    // Vehicle trackers
    VehicleGpsTracker,
    MagneticTracker,
    ObdTracker,

    // Maritime
    AisTransponder,
    EpirbBeacon,
    MarineSatelliteTracker,
    MarineVhf,
    BoatGpsTracker,
}

impl DeviceType {
    /// Starting risk before proximity and multi-band adjustments.
    pub fn base_risk(self) -> u8 {
        match self {
            DeviceType::SatelliteTracker => 85,
            DeviceType::CellularTracker => 75,
            DeviceType::IsmTracker => 60,
            DeviceType::DroneComponent => 70,
            DeviceType::BleBeacon => 30,
            DeviceType::WifiDevice => 20,
            DeviceType::KeyFob => 10,
            // covert tracking
            DeviceType::VehicleGpsTracker => 80,
            // attached to the outside of the vehicle
            DeviceType::MagneticTracker => 85,
            // needs access to the vehicle
            DeviceType::ObdTracker => 70,
            // mandatory on most vessels
            DeviceType::AisTransponder => 15,
            // safety equipment
            DeviceType::EpirbBeacon => 10,
            DeviceType::MarineSatelliteTracker => 60,
            DeviceType::MarineVhf => 15,
            DeviceType::BoatGpsTracker => 65,
            DeviceType::Unknown | DeviceType::TirePressure => 50,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DeviceType::Unknown => "Unknown Device",
            DeviceType::SatelliteTracker => "Satellite Tracker",
            DeviceType::CellularTracker => "Cellular Tracker",
            DeviceType::IsmTracker => "ISM Tracker",
            DeviceType::BleBeacon => "BLE Beacon",
            DeviceType::WifiDevice => "WiFi Device",
            DeviceType::DroneComponent => "Drone Component",
            DeviceType::KeyFob => "Key Fob",
            DeviceType::TirePressure => "TPMS Sensor",
            DeviceType::VehicleGpsTracker => "Vehicle GPS Tracker",
            DeviceType::MagneticTracker => "Magnetic Tracker",
            DeviceType::ObdTracker => "OBD-II Tracker",
            DeviceType::AisTransponder => "AIS Transponder",
            DeviceType::EpirbBeacon => "EPIRB Beacon",
            DeviceType::MarineSatelliteTracker => "Marine Sat Tracker",
            DeviceType::MarineVhf => "Marine VHF Radio",
            DeviceType::BoatGpsTracker => "Boat GPS Tracker",
        }
    }
}

/// One frequency a device was heard on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyInfo {
    pub frequency: u32,
    pub rssi: i8,
    pub active: bool,
}

/// A physical emitter reconstructed from one or more nearby frequencies.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceProfile {
    pub device_id: u32,
    pub device_type: DeviceType,
    pub frequencies: BoundedLog<FrequencyInfo>,
    pub risk_score: u8,
    pub has_satellite_proximity: bool,
    pub has_cellular_proximity: bool,
    pub name: String,
    pub active: bool,
}

impl DeviceProfile {
    pub(crate) fn new(device_id: u32, frequency: u32, rssi: i8, capacity: usize) -> Self {
        let frequencies = BoundedLog::starting_with(
            "device frequencies",
            capacity,
            FrequencyInfo {
                frequency,
                rssi,
                active: true,
            },
        );
        Self {
            device_id,
            device_type: DeviceType::Unknown,
            frequencies,
            risk_score: 0,
            has_satellite_proximity: false,
            has_cellular_proximity: false,
            name: DeviceType::Unknown.display_name().to_string(),
            active: true,
        }
    }

    pub(crate) fn add_frequency(&mut self, frequency: u32, rssi: i8) -> GuardResult<()> {
        self.frequencies.push(FrequencyInfo {
            frequency,
            rssi,
            active: true,
        })
    }

    pub fn frequency_count(&self) -> usize {
        self.frequencies.len()
    }

    pub fn frequency_values(&self) -> impl Iterator<Item = u32> + '_ {
        self.frequencies.iter().map(|info| info.frequency)
    }

    /// Strongest reading across every frequency of this device.
    pub fn peak_rssi(&self) -> Option<i8> {
        self.frequencies.iter().map(|info| info.rssi).max()
    }
}
