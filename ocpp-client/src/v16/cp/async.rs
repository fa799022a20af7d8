use flume::Receiver;
use tokio_util::sync::CancellationToken;

use crate::v16::{
    events::operator::OperatorCommand,
    interface::{EventSink, SessionHistory, Timeout, WebsocketIo},
    services::{
        timeout::TimeoutService,
        websocket::{WebsocketResponse, WebsocketService},
    },
    state_machine::actions::CoreActions,
};

use super::{config::ChargePointConfig, core::ChargePointCore};

/// Runs a [`ChargePointCore`] against real I/O until `stop_token` fires.
pub struct ChargePoint<WS: WebsocketIo, T: Timeout, E: EventSink, H: SessionHistory> {
    config: ChargePointConfig,
    ws: WebsocketService<WS>,
    timeout: TimeoutService<T>,
    events: E,
    history: H,
    input_rx: Receiver<OperatorCommand>,
    stop_token: CancellationToken,
}

impl<WS: WebsocketIo, T: Timeout, E: EventSink, H: SessionHistory> ChargePoint<WS, T, E, H> {
    pub fn new(
        ws: WS,
        timeout: T,
        events: E,
        history: H,
        config: ChargePointConfig,
        stop_token: CancellationToken,
        input_rx: Receiver<OperatorCommand>,
    ) -> Self {
        Self {
            config,
            ws: WebsocketService::new(ws),
            timeout: TimeoutService::new(timeout),
            events,
            history,
            input_rx,
            stop_token,
        }
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    async fn execute(&mut self, actions: Vec<CoreActions>) {
        for action in actions {
            match action {
                CoreActions::Connect { url, protocols } => {
                    log::debug!("connect, url: {}, protocols: {:?}", url, protocols);
                    self.ws.connect(url, protocols).await;
                }
                CoreActions::Disconnect => {
                    log::debug!("disconnect");
                    self.ws.close_connection().await;
                }
                CoreActions::SendWsMsg(msg) => {
                    if let Err(e) = self.ws.send_msg(msg).await {
                        log::warn!("send failed: {}", e);
                    }
                }
                CoreActions::AddTimeout(id, timeout_ms) => {
                    log::trace!("add timeout, id: {:?}, after: {} ms", id, timeout_ms);
                    self.timeout.add_or_update(id, timeout_ms);
                }
                CoreActions::RemoveTimeout(id) => {
                    log::trace!("remove timeout, id: {:?}", id);
                    self.timeout.remove_timeout(id);
                }
                CoreActions::Emit(event) => self.events.on_event(event),
                CoreActions::SaveSession(record) => self.history.append(record),
            }
        }
    }

    /// Drives the charge point and hands back the collaborators on shutdown.
    pub async fn run(mut self) -> Self {
        let mut cp = ChargePointCore::new(self.config.clone());
        let actions = cp.init();
        self.execute(actions).await;
        let mut input_open = true;
        loop {
            let actions = tokio::select! {
                biased;
                _ = self.stop_token.cancelled() => {
                    break;
                }
                cmd = self.input_rx.recv_async(), if input_open => {
                    match cmd {
                        Ok(cmd) => cp.operator_command(cmd),
                        Err(_) => {
                            log::debug!("operator channel closed");
                            input_open = false;
                            continue;
                        }
                    }
                }
                msg = &mut self.ws => {
                    match msg {
                        WebsocketResponse::Connected(protocol) => {
                            log::info!("ws connected, protocol: {:?}", protocol);
                            cp.ws_connected(protocol)
                        }
                        WebsocketResponse::HandshakeFailed(e) => {
                            log::warn!("ws handshake failed: {}", e);
                            cp.ws_connect_failed(e)
                        }
                        WebsocketResponse::Disconnected => {
                            log::info!("ws disconnected");
                            cp.ws_disconnected()
                        }
                        WebsocketResponse::WsMsg(msg) => cp.got_ws_msg(msg),
                    }
                }
                id = &mut self.timeout => {
                    cp.handle_timeout(id)
                }
            };
            self.execute(actions).await;
        }
        log::info!("charge point {} shutting down", self.config.charge_point_id);
        self.timeout.remove_all_timeouts();
        self.ws.close_connection().await;
        self
    }
}
