use ocppsim_core::v16::types::{ChargingProfile, ChargingRateUnitType, ChargingSchedule};

use crate::v16::{
    cp::core::ChargePointCore,
    telemetry::{TelemetryConfig, TelemetryConfigPatch},
};

pub const MIN_POWER_LIMIT_KW: f64 = 0.5;
pub const MIN_CURRENT_LIMIT_A: f64 = 1.0;

/// Power and current limits in force when a session started; restored by
/// ClearChargingProfile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargingLimits {
    pub max_power_kw: f64,
    pub max_current_a: f64,
}

impl ChargingLimits {
    pub fn capture(config: &TelemetryConfig) -> Self {
        Self {
            max_power_kw: config.max_power_kw,
            max_current_a: config.max_current_a,
        }
    }

    pub fn as_patch(&self) -> TelemetryConfigPatch {
        TelemetryConfigPatch {
            max_power_kw: Some(self.max_power_kw),
            max_current_a: Some(self.max_current_a),
            ..Default::default()
        }
    }
}

/// Telemetry limits expressed by the first period of `schedule`, or `None`
/// when it carries no usable limit.
pub fn limits_from_schedule(
    schedule: &ChargingSchedule,
    nominal_voltage: f64,
) -> Option<TelemetryConfigPatch> {
    let period = schedule.charging_schedule_period.first()?;
    let limit = period.limit;
    if !limit.is_finite() || limit < 0.0 {
        return None;
    }
    let patch = match schedule.charging_rate_unit {
        ChargingRateUnitType::W => TelemetryConfigPatch {
            max_power_kw: Some((limit / 1000.0).max(MIN_POWER_LIMIT_KW)),
            ..Default::default()
        },
        ChargingRateUnitType::A => TelemetryConfigPatch {
            max_current_a: Some(limit.max(MIN_CURRENT_LIMIT_A)),
            max_power_kw: Some((limit * nominal_voltage / 1000.0).max(MIN_POWER_LIMIT_KW)),
            ..Default::default()
        },
    };
    Some(patch)
}

impl ChargePointCore {
    pub(crate) fn apply_charging_profile(&mut self, profile: &ChargingProfile) {
        let nominal_voltage = self.telemetry.config().nominal_voltage;
        match limits_from_schedule(&profile.charging_schedule, nominal_voltage) {
            Some(patch) => {
                self.telemetry.apply_config(&patch);
                let config = self.telemetry.config();
                let text = format!(
                    "Charging profile {} applied: {:.2} kW / {:.1} A",
                    profile.charging_profile_id, config.max_power_kw, config.max_current_a
                );
                self.log_info(text);
            }
            None => self.log_info(format!(
                "Charging profile {} has no usable limit",
                profile.charging_profile_id
            )),
        }
    }

    pub(crate) fn restore_session_limits(&mut self) {
        let patch = self.session_limits.as_patch();
        self.telemetry.apply_config(&patch);
        self.log_info(format!(
            "Charging limits restored: {:.2} kW / {:.1} A",
            self.session_limits.max_power_kw, self.session_limits.max_current_a
        ));
    }
}
