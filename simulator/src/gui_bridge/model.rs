use guardcore::GuardReport;
use serde::Serialize;

/// What the dashboard endpoint serves.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardModel {
    pub scenario: Option<String>,
    pub sweeps_completed: usize,
    pub elapsed_ms: u32,
    pub report: Option<GuardReport>,
}

impl DashboardModel {
    pub fn headline(&self) -> String {
        match &self.report {
            Some(report) => format!(
                "devices {} (high risk {}), jamming {:?}, spoofing {:?}, threat {:?}",
                report.devices.len(),
                report.high_risk_devices(),
                report.jamming_status,
                report.spoofing_status,
                report.max_threat_level
            ),
            None => "no sweep completed yet".to_string(),
        }
    }
}
