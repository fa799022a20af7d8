//! Charging session lifecycle: authorize, start watchdog, active
//! reporting and stop.

use chrono::{DateTime, Utc};
use ocppsim_core::v16::{
    messages::{
        authorize::AuthorizeRequest, start_transaction::StartTransactionRequest,
        stop_transaction::StopTransactionRequest,
    },
    types::{ChargingProfile, ReadingContext, Reason},
};

use crate::v16::{
    cp::core::ChargePointCore,
    interface::{SessionRecord, SimEvent, TimerId},
    telemetry::TelemetryConfigPatch,
};

use super::{
    call::CallAction,
    connector::{ConnectorState, Trigger},
    profile::ChargingLimits,
    ticker::Periodic,
};

pub const START_ATTEMPTS: u8 = 3;
/// Delay before attempt 2 and attempt 3.
pub const START_RETRY_BACKOFF_MS: [u64; 2] = [1500, 3000];
pub const TICK_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Authorizing,
    /// StartTransaction attempt in flight.
    Starting { attempt: u8 },
    /// Waiting out the backoff after a failed attempt.
    RetryWait { attempt: u8 },
    Active,
    Stopping,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TransactionContext {
    pub transaction_id: Option<i32>,
    pub connector_id: usize,
    pub id_tag: String,
    pub meter_start_wh: u64,
    pub meter_stop_wh: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub stop_reason: Option<Reason>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct StartRequest {
    pub id_tag: Option<String>,
    pub connector_id: Option<usize>,
    pub skip_authorize: bool,
    pub profile: Option<ChargingProfile>,
}

impl ChargePointCore {
    pub(crate) fn start_session(&mut self, req: StartRequest) {
        if self.session != SessionState::Idle {
            self.log_err("Session already in progress, start ignored");
            return;
        }
        if !self.cable_connected {
            self.log_err("Cable not connected, start aborted");
            return;
        }
        let connector_id = req.connector_id.unwrap_or(self.config.connector_id);
        let id_tag = req.id_tag.unwrap_or_else(|| self.config.id_tag.clone());
        let meter_start_wh = self
            .config
            .meter_start_wh
            .unwrap_or(self.meter_register_wh)
            .max(1);

        self.prepare_telemetry();
        self.session_limits = ChargingLimits::capture(self.telemetry.config());
        self.transaction = Some(TransactionContext {
            transaction_id: None,
            connector_id,
            id_tag: id_tag.clone(),
            meter_start_wh,
            meter_stop_wh: None,
            started_at: Utc::now(),
            stop_reason: None,
        });
        if let Some(profile) = req.profile {
            self.apply_charging_profile(&profile);
        }
        self.zero_power_ticks = 0;
        self.start_ticker(Periodic::Tick, TICK_INTERVAL_MS);
        self.log_info(format!(
            "Starting session for {} on connector {} (meterStart {} Wh)",
            id_tag, connector_id, meter_start_wh
        ));

        if !self.transition(Trigger::AuthorizeAccepted) {
            self.force_state(ConnectorState::Preparing);
        }

        if req.skip_authorize {
            self.send_start_transaction(1);
        } else {
            self.session = SessionState::Authorizing;
            self.enqueue_call(CallAction::Authorize, AuthorizeRequest { id_tag });
        }
    }

    fn prepare_telemetry(&mut self) {
        self.telemetry
            .apply_config(&TelemetryConfigPatch::from(self.config.telemetry.clone()));
        self.telemetry.apply_config(&self.config.mode.telemetry_patch());
        self.telemetry.set_soc_target(self.config.target_soc);
        self.telemetry.set_price_per_kwh(self.config.price_per_kwh);
        self.telemetry.reset();
        self.telemetry.start(Utc::now());
    }

    pub(crate) fn on_authorized(&mut self) {
        if self.session == SessionState::Authorizing {
            self.send_start_transaction(1);
        }
    }

    pub(crate) fn send_start_transaction(&mut self, attempt: u8) {
        let Some(tx) = &self.transaction else {
            return;
        };
        let req = StartTransactionRequest {
            connector_id: tx.connector_id,
            id_tag: tx.id_tag.clone(),
            meter_start: tx.meter_start_wh,
            reservation_id: None,
            timestamp: Utc::now(),
        };
        self.session = SessionState::Starting { attempt };
        self.log_info(format!("StartTransaction attempt {}/{}", attempt, START_ATTEMPTS));
        self.enqueue_call(CallAction::StartTransaction { attempt }, req);
    }

    /// Outcome of one StartTransaction attempt. `None` means the CSMS did
    /// not hand out an id.
    pub(crate) fn on_start_attempt(&mut self, attempt: u8, transaction_id: Option<i32>) {
        if let (Some(id), Some(tx)) = (transaction_id, self.transaction.as_mut()) {
            if tx.transaction_id.is_none() {
                tx.transaction_id = Some(id);
            }
        }
        if self.session != (SessionState::Starting { attempt }) {
            log::debug!("late StartTransaction result for attempt {}", attempt);
            return;
        }
        match transaction_id {
            Some(id) => {
                self.log_info(format!("Transaction {} started", id));
                self.activate_session();
            }
            None if attempt >= START_ATTEMPTS => {
                self.log_err(format!(
                    "Start.watchdog.giveup after {} attempts without transactionId",
                    attempt
                ));
                self.abort_start();
            }
            None => {
                let delay_ms = START_RETRY_BACKOFF_MS
                    .get(usize::from(attempt.saturating_sub(1)))
                    .copied()
                    .unwrap_or(START_RETRY_BACKOFF_MS[1]);
                self.log_err(format!(
                    "No transactionId on attempt {}, retrying in {} ms",
                    attempt, delay_ms
                ));
                self.session = SessionState::RetryWait { attempt };
                self.add_timeout(TimerId::StartRetry, delay_ms);
            }
        }
    }

    pub(crate) fn on_start_retry_timer(&mut self) {
        if let SessionState::RetryWait { attempt } = self.session {
            self.send_start_transaction(attempt + 1);
        }
    }

    /// Abandons a start that never became active. The connector keeps the
    /// status it announced.
    pub(crate) fn abort_start(&mut self) {
        self.remove_timeout(TimerId::StartRetry);
        self.stop_ticker(Periodic::Tick);
        self.telemetry.stop();
        self.transaction = None;
        self.session = SessionState::Idle;
        self.emit(SimEvent::IndicatorsReset);
    }

    fn activate_session(&mut self) {
        self.session = SessionState::Active;
        self.zero_power_ticks = 0;
        if !self.transition(Trigger::StartTransaction) {
            self.force_state(ConnectorState::Charging);
        }
        self.send_meter_values(ReadingContext::TransactionBegin, None);
        self.start_meter_ticker();
    }

    pub(crate) fn stop_session(&mut self, reason: Reason) {
        match self.session {
            SessionState::Idle => {
                self.log_info("No session to stop");
                return;
            }
            SessionState::Stopping => {
                log::debug!("stop already in progress");
                return;
            }
            _ => {}
        }
        let Some(tx) = self.transaction.clone() else {
            self.session = SessionState::Idle;
            return;
        };
        let was_active = self.session == SessionState::Active;
        self.remove_timeout(TimerId::StartRetry);
        self.stop_ticker(Periodic::MeterValues);

        let energy_wh = self.telemetry.snapshot().energy_wh;
        let meter_stop = self
            .config
            .meter_stop_wh
            .unwrap_or_else(|| (tx.meter_start_wh as f64 + energy_wh).ceil() as u64);
        if was_active {
            self.send_meter_values(ReadingContext::TransactionEnd, Some(meter_stop));
        }

        self.session = SessionState::Stopping;
        self.enter_finishing();
        self.telemetry.stop();
        if let Some(ctx) = self.transaction.as_mut() {
            ctx.stop_reason = Some(reason.clone());
            ctx.meter_stop_wh = Some(meter_stop);
        }
        self.log_info(format!("Stopping session ({}), meterStop {} Wh", reason, meter_stop));
        let req = StopTransactionRequest {
            id_tag: Some(tx.id_tag),
            meter_stop,
            timestamp: Utc::now(),
            transaction_id: tx.transaction_id,
            reason: Some(reason),
            transaction_data: None,
        };
        self.enqueue_call(CallAction::StopTransaction, req);
    }

    /// Runs after the StopTransaction outcome, confirmed or not.
    pub(crate) fn finish_session(&mut self, confirmed: bool) {
        if self.session != SessionState::Stopping {
            return;
        }
        let tx = self.transaction.take();
        if let (true, Some(tx)) = (confirmed, tx) {
            let record = self.session_record(&tx);
            if let Some(meter_stop) = tx.meter_stop_wh {
                self.meter_register_wh = meter_stop;
            }
            self.log_info(format!(
                "Session saved: {:.3} kWh, {:.2} cost",
                record.energy_kwh, record.total_cost
            ));
            self.save_session(record);
        }
        self.stop_ticker(Periodic::Tick);
        self.emit(SimEvent::IndicatorsReset);
        self.schedule_finishing();
        self.session = SessionState::Idle;
    }

    fn session_record(&self, tx: &TransactionContext) -> SessionRecord {
        let snapshot = self.telemetry.snapshot();
        let avg_power_kw = if snapshot.duration_min > 0 {
            snapshot.energy_kwh / (snapshot.duration_min as f64 / 60.0)
        } else {
            snapshot.power_kw
        };
        SessionRecord {
            charge_point_id: self.config.charge_point_id.clone(),
            transaction_id: tx.transaction_id,
            start_time: snapshot.session_start.unwrap_or(tx.started_at),
            end_time: Utc::now(),
            duration_min: snapshot.duration_min,
            energy_kwh: snapshot.energy_kwh,
            avg_power_kw,
            total_cost: snapshot.total_cost,
            price_per_kwh: snapshot.price_per_kwh,
            reason: tx.stop_reason.clone().unwrap_or(Reason::Local),
        }
    }
}
