use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use ocppsim_core::{format::error::GenericError, v16::types::Reason};

use super::{state_machine::connector::StateChange, telemetry::TelemetrySnapshot};

/// Every timer the core arms. Re-arming an id replaces its deadline.
#[derive(Eq, Hash, Clone, Copy, PartialEq, PartialOrd, Ord, Debug)]
pub enum TimerId {
    Boot,
    Heartbeat,
    /// Timeout of the outbound call with this sequence number.
    Call(u64),
    StartRetry,
    MeterValues,
    /// One-second telemetry and supervision tick.
    Tick,
    Finishing,
    Reconnect,
}

#[async_trait::async_trait]
pub trait WebsocketIo: Send + Unpin + 'static {
    /// Opens a connection offering `protocols` as subprotocols and returns
    /// the one the server selected.
    async fn connect(
        &mut self,
        url: String,
        protocols: Vec<String>,
    ) -> Result<Option<String>, GenericError>;
    /// `Ready(None)` means the connection is gone.
    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<String>>;
    async fn send(&mut self, msg: String) -> Result<(), GenericError>;
    async fn close(&mut self);
}

pub trait Timeout: Send + Unpin + 'static {
    fn add_or_update_timeout(&mut self, id: TimerId, timeout_ms: u64);
    fn remove_timeout(&mut self, id: TimerId);
    fn remove_all_timeouts(&mut self);
    /// Yields each expired id once; the id is no longer armed afterwards.
    fn poll_timeout(&mut self, cx: &mut Context<'_>) -> Poll<TimerId>;
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogDirection {
    Out,
    In,
    Info,
    Err,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionStatus {
    Connecting { url: String, protocols: Vec<String> },
    Connected { protocol: Option<String> },
    Disconnected,
}

/// One completed charging session.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub charge_point_id: String,
    pub transaction_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_min: u64,
    #[serde(rename = "energyKWh")]
    pub energy_kwh: f64,
    #[serde(rename = "avgPowerKW")]
    pub avg_power_kw: f64,
    pub total_cost: f64,
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    pub reason: Reason,
}

/// What the core surfaces to whoever renders the simulator.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Metrics(TelemetrySnapshot),
    StateChanged(StateChange),
    Log { direction: LogDirection, text: String },
    Connection(ConnectionStatus),
    SessionSaved(SessionRecord),
    IndicatorsReset,
}

pub trait EventSink: Send + 'static {
    fn on_event(&mut self, event: SimEvent);
}

pub trait SessionHistory: Send + 'static {
    fn append(&mut self, record: SessionRecord);
    fn read_all(&self) -> Vec<SessionRecord>;

    fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.read_all()).unwrap_or_else(|_| "[]".to_string())
    }
}
