use ocppsim_core::v16::messages::boot_notification::BootNotificationRequest;

use crate::v16::telemetry::{TelemetryConfig, TelemetryConfigPatch};

pub const DEFAULT_SUBPROTOCOLS: [&str; 2] = ["ocpp1.6j", "ocpp1.6"];

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChargingMode {
    #[default]
    Normal,
    Fast,
}

impl ChargingMode {
    /// Overrides applied on top of the configured telemetry at session
    /// start. Normal mode uses the configuration as is.
    pub fn telemetry_patch(&self) -> TelemetryConfigPatch {
        match self {
            ChargingMode::Normal => TelemetryConfigPatch::default(),
            ChargingMode::Fast => TelemetryConfigPatch {
                max_power_kw: Some(50.0),
                ramp_up_seconds: Some(2.0),
                taper_start_soc: Some(95.0),
                battery_capacity_kwh: Some(50.0),
                time_target_min: Some(1.5),
                ..Default::default()
            },
        }
    }

    pub fn meter_interval_ms(&self) -> u64 {
        match self {
            ChargingMode::Normal => 5000,
            ChargingMode::Fast => 2000,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChargePointConfig {
    pub endpoint_url: String,
    pub charge_point_id: String,
    pub connector_id: usize,
    pub id_tag: String,
    pub subprotocols: Vec<String>,
    pub call_timeout_ms: u64,
    pub boot_info: BootNotificationRequest,
    pub mode: ChargingMode,
    pub meter_interval_ms: Option<u64>,
    pub target_soc: f64,
    pub price_per_kwh: f64,
    pub meter_start_wh: Option<u64>,
    pub meter_stop_wh: Option<u64>,
    pub finishing_delay_ms: u64,
    pub reconnect_delay_ms: Option<u64>,
    pub cable_connected: bool,
    pub seed: u64,
    pub telemetry: TelemetryConfig,
}

impl Default for ChargePointConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "ws://127.0.0.1:3000/ocpp/CentralSystemService".to_string(),
            charge_point_id: "DRBAKANA-TEST-03".to_string(),
            connector_id: 1,
            id_tag: "IGEA-USER-001".to_string(),
            subprotocols: DEFAULT_SUBPROTOCOLS.iter().map(|s| s.to_string()).collect(),
            call_timeout_ms: 20_000,
            boot_info: BootNotificationRequest {
                charge_box_serial_number: None,
                charge_point_model: "Sim1.6J".to_string(),
                charge_point_serial_number: None,
                charge_point_vendor: "IGE2A".to_string(),
                firmware_version: Some("1.0.0".to_string()),
                iccid: None,
                imsi: None,
                meter_serial_number: None,
                meter_type: None,
            },
            mode: ChargingMode::Normal,
            meter_interval_ms: None,
            target_soc: 80.0,
            price_per_kwh: 1.99,
            meter_start_wh: None,
            meter_stop_wh: None,
            finishing_delay_ms: 2000,
            reconnect_delay_ms: None,
            cable_connected: true,
            seed: 0,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ChargePointConfig {
    /// Same settings for another charge point; the seed is derived from the
    /// id so parallel simulators do not share a noise sequence.
    pub fn for_charge_point(&self, charge_point_id: &str) -> Self {
        let seed = charge_point_id
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
        Self {
            charge_point_id: charge_point_id.to_string(),
            seed,
            ..self.clone()
        }
    }

    pub fn url(&self) -> Option<String> {
        build_endpoint_url(&self.endpoint_url, &self.charge_point_id)
    }
}

/// `<base>/ocpp/CentralSystemService/<id>`, unless `base` already names the
/// service, in which case the id is only appended when no path segment
/// follows it. `None` when the URL or a required id is empty.
pub fn build_endpoint_url(base: &str, charge_point_id: &str) -> Option<String> {
    let base = base.trim();
    let base = base.strip_suffix('/').unwrap_or(base);
    let charge_point_id = charge_point_id.trim();
    if base.is_empty() {
        return None;
    }
    if let Some(idx) = base.rfind("CentralSystemService") {
        let tail = &base[idx + "CentralSystemService".len()..];
        let has_id = tail
            .strip_prefix('/')
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'));
        if has_id {
            return Some(base.to_string());
        }
        if charge_point_id.is_empty() {
            return None;
        }
        return Some(format!("{}/{}", base, charge_point_id));
    }
    if charge_point_id.is_empty() {
        return None;
    }
    Some(format!("{}/ocpp/CentralSystemService/{}", base, charge_point_id))
}

/// Offer sets tried in order until a handshake succeeds.
pub fn subprotocol_candidates(configured: &[String]) -> Vec<Vec<String>> {
    let configured: Vec<String> = configured
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let mut candidates: Vec<Vec<String>> = Vec::new();
    match configured.as_slice() {
        [] => {
            candidates.push(DEFAULT_SUBPROTOCOLS.iter().map(|s| s.to_string()).collect());
            for s in DEFAULT_SUBPROTOCOLS {
                candidates.push(vec![s.to_string()]);
            }
        }
        [single] => {
            for s in [single.as_str(), "ocpp1.6", "ocpp1.6j"] {
                let candidate = vec![s.to_string()];
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        many => {
            candidates.push(many.to_vec());
            for s in many {
                let candidate = vec![s.clone()];
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}
