use std::collections::{BTreeMap, VecDeque};

use ocppsim_core::{
    format::error::GenericError,
    v16::{protocol_error::ProtocolError, types::RegistrationStatus},
};

use crate::v16::{
    events::operator::OperatorCommand,
    interface::TimerId,
    state_machine::{
        actions::CoreActions,
        boot::BootState,
        call::{CallAction, PendingCall},
        connection::ConnectionState,
        connector::{ConnectorState, ConnectorStateMachine},
        heartbeat::DEFAULT_HEARTBEAT_INTERVAL_SECS,
        profile::ChargingLimits,
        session::{SessionState, TransactionContext},
        ticker::Periodic,
    },
    telemetry::{Telemetry, TelemetrySnapshot},
};

use super::config::{subprotocol_candidates, ChargePointConfig};

pub(crate) type OcppError = ocppsim_core::format::error::OcppError<ProtocolError>;

/// I/O-free charge point. Every public entry point handles one input and
/// returns the effects the driver must carry out, in order.
pub struct ChargePointCore {
    pub(crate) config: ChargePointConfig,
    pub(crate) endpoint_url: String,
    pub(crate) candidates: Vec<Vec<String>>,
    pub(crate) connection: ConnectionState,
    pub(crate) ws_connected: bool,
    pub(crate) manual_disconnect: bool,
    pub(crate) queued_actions: VecDeque<CoreActions>,
    pub(crate) call_seq: u64,
    pub(crate) pending_calls: BTreeMap<String, PendingCall>,
    pub(crate) offline_rejections: VecDeque<CallAction>,
    pub(crate) boot_state: BootState,
    pub(crate) registration_status: Option<RegistrationStatus>,
    pub(crate) heartbeat_interval_secs: u64,
    pub(crate) tickers: BTreeMap<Periodic, u64>,
    pub(crate) connector: ConnectorStateMachine,
    pub(crate) telemetry: Telemetry,
    pub(crate) session_limits: ChargingLimits,
    pub(crate) session: SessionState,
    pub(crate) transaction: Option<TransactionContext>,
    pub(crate) zero_power_ticks: u32,
    pub(crate) cable_connected: bool,
    pub(crate) meter_register_wh: u64,
}

impl ChargePointCore {
    pub fn new(config: ChargePointConfig) -> Self {
        let endpoint_url = config.url().unwrap_or_else(|| config.endpoint_url.clone());
        let telemetry = Telemetry::new(config.telemetry.clone(), config.seed);
        let session_limits = ChargingLimits::capture(telemetry.config());
        Self {
            endpoint_url,
            candidates: subprotocol_candidates(&config.subprotocols),
            connection: ConnectionState::Idle,
            ws_connected: false,
            manual_disconnect: false,
            queued_actions: VecDeque::new(),
            call_seq: 0,
            pending_calls: BTreeMap::new(),
            offline_rejections: VecDeque::new(),
            boot_state: BootState::Idle,
            registration_status: None,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            tickers: BTreeMap::new(),
            connector: ConnectorStateMachine::new(),
            telemetry,
            session_limits,
            session: SessionState::Idle,
            transaction: None,
            zero_power_ticks: 0,
            cable_connected: config.cable_connected,
            meter_register_wh: 0,
            config,
        }
    }

    fn finish(&mut self) -> Vec<CoreActions> {
        self.settle_offline_rejections();
        self.drain_actions()
    }

    pub fn init(&mut self) -> Vec<CoreActions> {
        self.log_info(format!("Charge point {} ready", self.config.charge_point_id));
        self.open_connection();
        self.finish()
    }
    pub fn ws_connected(&mut self, protocol: Option<String>) -> Vec<CoreActions> {
        self.on_transport_open(protocol);
        self.finish()
    }
    pub fn ws_connect_failed(&mut self, err: GenericError) -> Vec<CoreActions> {
        self.on_handshake_failed(err);
        self.finish()
    }
    pub fn ws_disconnected(&mut self) -> Vec<CoreActions> {
        self.on_transport_closed();
        self.finish()
    }
    pub fn got_ws_msg(&mut self, msg: String) -> Vec<CoreActions> {
        self.got_ws_msg_helper(msg);
        self.finish()
    }
    pub fn handle_timeout(&mut self, id: TimerId) -> Vec<CoreActions> {
        self.handle_timeout_helper(id);
        self.finish()
    }
    pub fn operator_command(&mut self, cmd: OperatorCommand) -> Vec<CoreActions> {
        self.operator_command_helper(cmd);
        self.finish()
    }

    pub fn config(&self) -> &ChargePointConfig {
        &self.config
    }
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
    pub fn is_connected(&self) -> bool {
        self.ws_connected
    }
    pub fn registration_status(&self) -> Option<&RegistrationStatus> {
        self.registration_status.as_ref()
    }
    pub fn connector_state(&self) -> ConnectorState {
        self.connector.state()
    }
    pub fn session_state(&self) -> SessionState {
        self.session
    }
    pub fn transaction_id(&self) -> Option<i32> {
        self.transaction.as_ref().and_then(|tx| tx.transaction_id)
    }
    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }
    pub fn meter_register_wh(&self) -> u64 {
        self.meter_register_wh
    }
}
