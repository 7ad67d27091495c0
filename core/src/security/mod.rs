pub mod jamming;
pub mod spoofing;
pub mod threat;

pub use jamming::{FrequencyBaseline, JammingDetector, JammingEvent, JammingStatus, JammingType};
pub use spoofing::{
    GnssConstellation, GpsSignalMeasurement, SpoofingDetector, SpoofingEvent, SpoofingIndicators,
    SpoofingStatus,
};
pub use threat::{
    BurstPattern, FrequencyHopEvent, PatternDetection, SignalObservation, ThreatDetector,
    ThreatLevel, ThreatType,
};
