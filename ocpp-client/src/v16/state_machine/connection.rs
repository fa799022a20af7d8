use ocppsim_core::format::error::GenericError;

use crate::v16::{
    cp::core::ChargePointCore,
    interface::{ConnectionStatus, SimEvent, TimerId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConnectionState {
    Idle,
    /// Handshake in flight with the candidate at this index.
    Connecting(usize),
    Connected,
}

impl ChargePointCore {
    pub(crate) fn open_connection(&mut self) {
        if self.connection != ConnectionState::Idle {
            log::debug!("connect ignored, transport is {:?}", self.connection);
            return;
        }
        self.manual_disconnect = false;
        self.remove_timeout(TimerId::Reconnect);
        self.try_candidate(0);
    }

    fn try_candidate(&mut self, index: usize) {
        let Some(protocols) = self.candidates.get(index).cloned() else {
            return;
        };
        let url = self.endpoint_url.clone();
        self.log_info(format!("Connecting to {} with [{}]", url, protocols.join(", ")));
        self.emit(SimEvent::Connection(ConnectionStatus::Connecting {
            url: url.clone(),
            protocols: protocols.clone(),
        }));
        self.connection = ConnectionState::Connecting(index);
        self.connect(url, protocols);
    }

    pub(crate) fn on_handshake_failed(&mut self, err: GenericError) {
        let ConnectionState::Connecting(index) = self.connection else {
            log::debug!("stale handshake failure: {}", err);
            return;
        };
        self.log_err(format!("Handshake failed: {}", err));
        if index + 1 < self.candidates.len() {
            self.try_candidate(index + 1);
            return;
        }
        self.log_err("All subprotocol candidates failed");
        self.connection = ConnectionState::Idle;
        self.emit(SimEvent::Connection(ConnectionStatus::Disconnected));
        self.schedule_reconnect();
    }

    pub(crate) fn on_transport_open(&mut self, protocol: Option<String>) {
        self.connection = ConnectionState::Connected;
        self.ws_connected = true;
        self.log_info(format!(
            "Connected (subprotocol: {})",
            protocol.as_deref().unwrap_or("none")
        ));
        self.emit(SimEvent::Connection(ConnectionStatus::Connected { protocol }));
        self.on_boot_connected();
    }

    pub(crate) fn on_transport_closed(&mut self) {
        if !self.ws_connected {
            return;
        }
        self.ws_connected = false;
        self.connection = ConnectionState::Idle;
        self.log_err("Connection closed");
        self.on_outgoing_offline();
        self.on_boot_disconnected();
        self.emit(SimEvent::Connection(ConnectionStatus::Disconnected));
        self.schedule_reconnect();
    }

    /// Operator disconnect. Never followed by an automatic reconnect.
    pub(crate) fn close_connection(&mut self) {
        self.manual_disconnect = true;
        self.remove_timeout(TimerId::Reconnect);
        if self.connection == ConnectionState::Idle {
            return;
        }
        self.disconnect();
        if self.ws_connected {
            self.on_transport_closed();
        } else {
            self.connection = ConnectionState::Idle;
            self.emit(SimEvent::Connection(ConnectionStatus::Disconnected));
        }
    }

    fn schedule_reconnect(&mut self) {
        if self.manual_disconnect {
            return;
        }
        if let Some(delay_ms) = self.config.reconnect_delay_ms {
            log::debug!("reconnecting in {} ms", delay_ms);
            self.add_timeout(TimerId::Reconnect, delay_ms);
        }
    }

    pub(crate) fn on_reconnect_timer(&mut self) {
        if self.connection == ConnectionState::Idle && !self.manual_disconnect {
            self.open_connection();
        }
    }
}
