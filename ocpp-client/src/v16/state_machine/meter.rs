use chrono::Utc;
use ocppsim_core::v16::{
    messages::meter_values::MeterValuesRequest,
    types::{
        Location, Measurand, MeterValue, Phase, ReadingContext, SampledValue, UnitOfMeasure,
        ValueFormat,
    },
};

use crate::v16::{cp::core::ChargePointCore, telemetry::TelemetrySnapshot};

use super::{call::CallAction, session::SessionState, ticker::Periodic};

fn sampled(
    value: String,
    context: &ReadingContext,
    measurand: Measurand,
    unit: UnitOfMeasure,
    location: Option<Location>,
    phase: Option<Phase>,
) -> SampledValue {
    SampledValue {
        value,
        context: Some(context.clone()),
        format: Some(ValueFormat::Raw),
        measurand: Some(measurand),
        phase,
        location,
        unit: Some(unit),
    }
}

/// The six measurands reported for every sample, formatted as the CSMS
/// expects them on the wire.
pub(crate) fn sampled_values(
    snapshot: &TelemetrySnapshot,
    register_wh: u64,
    context: ReadingContext,
) -> Vec<SampledValue> {
    vec![
        sampled(
            register_wh.to_string(),
            &context,
            Measurand::EnergyActiveImportRegister,
            UnitOfMeasure::Wh,
            Some(Location::Outlet),
            None,
        ),
        sampled(
            format!("{:.3}", snapshot.power_kw),
            &context,
            Measurand::PowerActiveImport,
            UnitOfMeasure::Kw,
            Some(Location::Outlet),
            None,
        ),
        sampled(
            format!("{}", snapshot.voltage_v.round() as i64),
            &context,
            Measurand::Voltage,
            UnitOfMeasure::V,
            Some(Location::Outlet),
            Some(Phase::L1N),
        ),
        sampled(
            format!("{:.2}", snapshot.current_a),
            &context,
            Measurand::CurrentImport,
            UnitOfMeasure::A,
            Some(Location::Outlet),
            Some(Phase::L1),
        ),
        sampled(
            format!("{:.2}", snapshot.temperature_c),
            &context,
            Measurand::Temperature,
            UnitOfMeasure::Celsius,
            Some(Location::Body),
            None,
        ),
        sampled(
            format!("{}", snapshot.soc.round() as i64),
            &context,
            Measurand::SoC,
            UnitOfMeasure::Percent,
            None,
            None,
        ),
    ]
}

impl ChargePointCore {
    pub(crate) fn meter_interval_ms(&self) -> u64 {
        self.config
            .meter_interval_ms
            .unwrap_or_else(|| self.config.mode.meter_interval_ms())
    }

    pub(crate) fn start_meter_ticker(&mut self) {
        let interval_ms = self.meter_interval_ms();
        self.start_ticker(Periodic::MeterValues, interval_ms);
    }

    pub(crate) fn on_meter_values_timer(&mut self) {
        if self.session == SessionState::Active {
            self.send_meter_values(ReadingContext::SamplePeriodic, None);
        }
    }

    /// `register_wh` overrides the register reading derived from telemetry.
    pub(crate) fn send_meter_values(&mut self, context: ReadingContext, register_wh: Option<u64>) {
        let Some(tx) = &self.transaction else {
            return;
        };
        let snapshot = self.telemetry.snapshot();
        let register_wh = register_wh
            .unwrap_or_else(|| (tx.meter_start_wh as f64 + snapshot.energy_wh).round() as u64);
        let req = MeterValuesRequest {
            connector_id: tx.connector_id,
            transaction_id: tx.transaction_id,
            meter_value: vec![MeterValue {
                timestamp: Utc::now(),
                sampled_value: sampled_values(&snapshot, register_wh, context),
            }],
        };
        self.enqueue_call(CallAction::MeterValues, req);
    }
}
