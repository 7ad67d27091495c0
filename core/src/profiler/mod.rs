pub mod bands;
pub mod classify;
pub mod consolidator;
pub mod device;

pub use bands::{Band, BandSet};
pub use consolidator::{
    SignalConsolidator, MAX_DEVICES, MAX_FREQUENCIES_PER_DEVICE, SAME_DEVICE_SPAN_HZ,
};
pub use device::{DeviceProfile, DeviceType, FrequencyInfo};
