use ocppsim_core::format::error::GenericError;

use crate::v16::{
    cp::core::ChargePointCore,
    interface::{LogDirection, SessionRecord, SimEvent, TimerId},
};

/// Effects requested by the core, executed in order by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreActions {
    Connect { url: String, protocols: Vec<String> },
    Disconnect,
    SendWsMsg(String),
    AddTimeout(TimerId, u64),
    RemoveTimeout(TimerId),
    Emit(SimEvent),
    SaveSession(SessionRecord),
}

impl ChargePointCore {
    pub fn drain_actions(&mut self) -> Vec<CoreActions> {
        self.queued_actions.drain(..).collect()
    }

    pub(crate) fn connect(&mut self, url: String, protocols: Vec<String>) {
        self.queued_actions
            .push_back(CoreActions::Connect { url, protocols });
    }

    pub(crate) fn disconnect(&mut self) {
        self.queued_actions.push_back(CoreActions::Disconnect);
    }

    /// Queues a frame. Callers check `ws_connected` first; a frame queued
    /// while offline is dropped.
    pub(crate) fn send_ws_msg(&mut self, msg: String) -> Result<(), GenericError> {
        if !self.ws_connected {
            return Err(GenericError::Offline);
        }
        log::info!("[MSG_OUT] {}", msg);
        self.emit(SimEvent::Log {
            direction: LogDirection::Out,
            text: msg.clone(),
        });
        self.queued_actions.push_back(CoreActions::SendWsMsg(msg));
        Ok(())
    }

    pub(crate) fn add_timeout(&mut self, timer_id: TimerId, timeout_ms: u64) {
        self.queued_actions
            .push_back(CoreActions::AddTimeout(timer_id, timeout_ms));
    }

    pub(crate) fn remove_timeout(&mut self, timer_id: TimerId) {
        self.queued_actions
            .push_back(CoreActions::RemoveTimeout(timer_id));
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.queued_actions.push_back(CoreActions::Emit(event));
    }

    pub(crate) fn save_session(&mut self, record: SessionRecord) {
        self.queued_actions
            .push_back(CoreActions::SaveSession(record.clone()));
        self.emit(SimEvent::SessionSaved(record));
    }

    pub(crate) fn log_info(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("[{}] {}", self.config.charge_point_id, text);
        self.emit(SimEvent::Log {
            direction: LogDirection::Info,
            text,
        });
    }

    pub(crate) fn log_err(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("[{}] {}", self.config.charge_point_id, text);
        self.emit(SimEvent::Log {
            direction: LogDirection::Err,
            text,
        });
    }
}
