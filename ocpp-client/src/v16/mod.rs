mod cp;
mod drivers;
mod events;
mod interface;
mod services;
mod state_machine;
mod telemetry;

pub use cp::{
    config::{build_endpoint_url, subprotocol_candidates, ChargePointConfig, ChargingMode},
    core::ChargePointCore,
    r#async::ChargePoint,
};
pub use drivers::{history::InMemoryHistory, timers::TokioTimerManager};
#[cfg(feature = "tokio_ws")]
pub use drivers::websocket::TokioWsClient;
pub use events::{inbound::InboundCall, operator::OperatorCommand};
pub use interface::{
    ConnectionStatus, EventSink, LogDirection, SessionHistory, SessionRecord, SimEvent, Timeout,
    TimerId, WebsocketIo,
};
pub use state_machine::{
    actions::CoreActions,
    connector::{ConnectorState, ConnectorStateMachine, IllegalTransition, StateChange, Trigger},
    profile::{limits_from_schedule, ChargingLimits},
    session::SessionState,
};
pub use telemetry::{Telemetry, TelemetryConfig, TelemetryConfigPatch, TelemetrySnapshot};
