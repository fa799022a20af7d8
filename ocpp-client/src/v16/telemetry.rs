//! Physical model of an EV charging session.
//!
//! The simulator is a function of elapsed time and configuration: it ramps
//! power up linearly, tapers it above a state-of-charge threshold, keeps
//! `P = V * I` exact under a current cap, and integrates energy and SoC.
//! Small uniform noise is drawn from a seedable [`SmallRng`].

use chrono::{DateTime, Utc};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// SoC every session starts from after [`Telemetry::reset`].
pub const INITIAL_SOC: f64 = 20.0;

const POWER_NOISE_KW: f64 = 0.05;
const VOLTAGE_NOISE_V: f64 = 3.0;
const TEMPERATURE_NOISE_C: f64 = 0.02;
const MIN_VOLTAGE_V: f64 = 210.0;
const TAPER_FLOOR: f64 = 0.1;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryConfig {
    #[serde(rename = "maxPowerKW")]
    pub max_power_kw: f64,
    pub nominal_voltage: f64,
    #[serde(rename = "maxCurrentA")]
    pub max_current_a: f64,
    pub ramp_up_seconds: f64,
    pub taper_start_soc: f64,
    pub target_soc: f64,
    pub temp_base: f64,
    pub temp_rate: f64,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    #[serde(rename = "batteryCapacityKWh")]
    pub battery_capacity_kwh: f64,
    /// Minutes in which SoC should travel from its session start value to
    /// `target_soc`; `None` leaves SoC driven by energy alone.
    pub time_target_min: Option<f64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_power_kw: 7.0,
            nominal_voltage: 400.0,
            max_current_a: 16.0,
            ramp_up_seconds: 20.0,
            taper_start_soc: 70.0,
            target_soc: 80.0,
            temp_base: 28.0,
            temp_rate: 0.02,
            price_per_kwh: 1.99,
            battery_capacity_kwh: 80.0,
            time_target_min: Some(5.0),
        }
    }
}

/// Partial update for [`TelemetryConfig`]; absent keys are left untouched.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryConfigPatch {
    #[serde(rename = "maxPowerKW", skip_serializing_if = "Option::is_none")]
    pub max_power_kw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominal_voltage: Option<f64>,
    #[serde(rename = "maxCurrentA", skip_serializing_if = "Option::is_none")]
    pub max_current_a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp_up_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taper_start_soc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_soc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_rate: Option<f64>,
    #[serde(rename = "pricePerKWh", skip_serializing_if = "Option::is_none")]
    pub price_per_kwh: Option<f64>,
    #[serde(rename = "batteryCapacityKWh", skip_serializing_if = "Option::is_none")]
    pub battery_capacity_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_target_min: Option<f64>,
}

impl From<TelemetryConfig> for TelemetryConfigPatch {
    fn from(config: TelemetryConfig) -> Self {
        Self {
            max_power_kw: Some(config.max_power_kw),
            nominal_voltage: Some(config.nominal_voltage),
            max_current_a: Some(config.max_current_a),
            ramp_up_seconds: Some(config.ramp_up_seconds),
            taper_start_soc: Some(config.taper_start_soc),
            target_soc: Some(config.target_soc),
            temp_base: Some(config.temp_base),
            temp_rate: Some(config.temp_rate),
            price_per_kwh: Some(config.price_per_kwh),
            battery_capacity_kwh: Some(config.battery_capacity_kwh),
            time_target_min: config.time_target_min,
        }
    }
}

/// Immutable view of the simulation at one instant.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
    pub voltage_v: f64,
    pub current_a: f64,
    pub energy_wh: f64,
    #[serde(rename = "energyKWh")]
    pub energy_kwh: f64,
    pub duration_min: u64,
    pub temperature_c: f64,
    pub soc: f64,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    pub total_cost: f64,
    pub session_start: Option<DateTime<Utc>>,
    pub running: bool,
}

pub struct Telemetry {
    config: TelemetryConfig,
    rng: SmallRng,
    elapsed_sec: f64,
    energy_wh: f64,
    power_kw: f64,
    voltage_v: f64,
    current_a: f64,
    temperature_c: f64,
    soc: f64,
    start_soc: Option<f64>,
    session_start: Option<DateTime<Utc>>,
    running: bool,
}

impl Telemetry {
    pub fn new(config: TelemetryConfig, seed: u64) -> Self {
        let mut telemetry = Self {
            rng: SmallRng::seed_from_u64(seed),
            elapsed_sec: 0.0,
            energy_wh: 0.0,
            power_kw: 0.0,
            voltage_v: 0.0,
            current_a: 0.0,
            temperature_c: config.temp_base,
            soc: INITIAL_SOC,
            start_soc: None,
            session_start: None,
            running: false,
            config,
        };
        telemetry.voltage_v = telemetry.config.nominal_voltage;
        telemetry
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restores every dynamic field; configuration is kept.
    pub fn reset(&mut self) {
        self.elapsed_sec = 0.0;
        self.energy_wh = 0.0;
        self.power_kw = 0.0;
        self.voltage_v = self.config.nominal_voltage;
        self.current_a = 0.0;
        self.temperature_c = self.config.temp_base;
        self.soc = INITIAL_SOC;
        self.start_soc = None;
        self.session_start = None;
        self.running = false;
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.running = true;
        self.session_start = Some(now);
        self.start_soc = Some(self.soc);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Applies the keys present in `patch`. Non-finite values are skipped.
    pub fn apply_config(&mut self, patch: &TelemetryConfigPatch) {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        let c = &mut self.config;
        if let Some(v) = finite(patch.max_power_kw) {
            c.max_power_kw = v.max(0.0);
        }
        if let Some(v) = finite(patch.nominal_voltage) {
            c.nominal_voltage = v.max(0.0);
        }
        if let Some(v) = finite(patch.max_current_a) {
            c.max_current_a = v.max(0.0);
        }
        if let Some(v) = finite(patch.ramp_up_seconds) {
            c.ramp_up_seconds = v.max(0.0);
        }
        if let Some(v) = finite(patch.taper_start_soc) {
            c.taper_start_soc = v.clamp(0.0, 100.0);
        }
        if let Some(v) = finite(patch.target_soc) {
            c.target_soc = v.clamp(0.0, 100.0);
        }
        if let Some(v) = finite(patch.temp_base) {
            c.temp_base = v;
        }
        if let Some(v) = finite(patch.temp_rate) {
            c.temp_rate = v;
        }
        if let Some(v) = finite(patch.price_per_kwh) {
            if v > 0.0 {
                c.price_per_kwh = v;
            }
        }
        if let Some(v) = finite(patch.battery_capacity_kwh) {
            c.battery_capacity_kwh = v.max(1.0);
        }
        if let Some(v) = finite(patch.time_target_min) {
            c.time_target_min = Some(v.max(1.0));
        }
    }

    /// Non-finite or non-positive prices are ignored.
    pub fn set_price_per_kwh(&mut self, price: f64) {
        if price.is_finite() && price > 0.0 {
            self.config.price_per_kwh = price;
        }
    }

    /// Clamped to `[taper_start_soc, 100]`.
    pub fn set_soc_target(&mut self, target: f64) {
        if target.is_finite() {
            self.config.target_soc = target.clamp(self.config.taper_start_soc, 100.0);
        }
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.random_range(-amplitude..amplitude)
    }

    pub fn update(&mut self, dt: f64) -> TelemetrySnapshot {
        if !self.running || dt.is_nan() || dt <= 0.0 {
            return self.snapshot();
        }
        self.elapsed_sec += dt;

        let ramp = if self.config.ramp_up_seconds > 0.0 {
            (self.elapsed_sec / self.config.ramp_up_seconds).min(1.0)
        } else {
            1.0
        };

        let taper_start = self.config.taper_start_soc;
        let taper = if self.soc >= taper_start && taper_start < 100.0 {
            let progress = (self.soc - taper_start) / (100.0 - taper_start);
            (1.0 - progress * 0.9).max(TAPER_FLOOR)
        } else {
            1.0
        };

        let target_kw =
            (self.config.max_power_kw * ramp * taper + self.noise(POWER_NOISE_KW)).max(0.0);

        let voltage = (self.config.nominal_voltage + self.noise(VOLTAGE_NOISE_V)).max(MIN_VOLTAGE_V);
        let current = (target_kw * 1000.0 / voltage).min(self.config.max_current_a);
        let power_w = voltage * current;
        self.voltage_v = voltage;
        self.current_a = current;
        self.power_kw = power_w / 1000.0;

        let d_wh = power_w * dt / 3600.0;
        self.energy_wh += d_wh;

        self.temperature_c += self.config.temp_rate * dt + self.noise(TEMPERATURE_NOISE_C);

        let cap = self.config.target_soc.min(100.0);
        let gap = (cap - self.soc).max(0.0);
        let d_soc_energy = (d_wh / 1000.0 / self.config.battery_capacity_kwh) * 100.0;
        let d_soc_time = match (self.config.time_target_min, self.start_soc) {
            (Some(minutes), Some(start_soc)) if minutes > 0.0 => {
                let rate = (self.config.target_soc - start_soc).max(0.0) / (minutes * 60.0);
                (rate * dt).min(gap)
            }
            _ => 0.0,
        };
        self.soc = (self.soc + d_soc_energy.max(d_soc_time))
            .min(cap)
            .max(self.soc)
            .clamp(0.0, 100.0);

        self.snapshot()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let energy_kwh = self.energy_wh / 1000.0;
        TelemetrySnapshot {
            power_kw: self.power_kw,
            voltage_v: self.voltage_v,
            current_a: self.current_a,
            energy_wh: self.energy_wh,
            energy_kwh,
            duration_min: (self.elapsed_sec / 60.0).floor() as u64,
            temperature_c: self.temperature_c,
            soc: self.soc,
            price_per_kwh: self.config.price_per_kwh,
            total_cost: energy_kwh * self.config.price_per_kwh,
            session_start: self.session_start,
            running: self.running,
        }
    }
}
