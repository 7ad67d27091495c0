use crate::generator::profile::{EmitterConfig, GeneratorConfig};

pub const SCENARIOS: [&str; 5] = ["quiet", "vehicle", "maritime", "gps_spoofer", "jammer"];

fn emitter(label: &str, center: u32, bandwidth: u32, rssi: i8, duty: f32) -> EmitterConfig {
    let mut emitter = EmitterConfig::new(center, bandwidth, rssi);
    emitter.label = Some(label.to_string());
    emitter.duty_cycle = duty;
    emitter
}

/// Canned emitter layouts for demos and smoke runs.
pub fn scenario(name: &str, seed: u64) -> Option<GeneratorConfig> {
    let emitters = match name {
        "quiet" => Vec::new(),
        "vehicle" => vec![
            emitter("ism beacon", 433_920_000, 100_000, -55, 0.5),
            emitter("gsm uplink", 935_200_000, 400_000, -62, 1.0),
            emitter("gps repeater", 1_575_420_000, 2_000_000, -118, 1.0),
        ],
        "maritime" => vec![
            emitter("ais class b", 162_025_000, 10_000, -60, 1.0),
            emitter("vhf ch16", 156_800_000, 25_000, -65, 0.3),
            emitter("epirb", 406_025_000, 5_000, -70, 1.0),
        ],
        "gps_spoofer" => vec![emitter("l1 spoofer", 1_575_420_000, 4_000_000, -68, 1.0)],
        "jammer" => vec![emitter("barrage", 868_000_000, 6_000_000, -35, 1.0)],
        _ => return None,
    };
    Some(GeneratorConfig {
        seed,
        emitters,
        description: Some(name.to_string()),
        ..GeneratorConfig::default()
    })
}
