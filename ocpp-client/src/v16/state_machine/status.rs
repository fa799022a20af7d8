use chrono::Utc;
use ocppsim_core::v16::{
    messages::status_notification::StatusNotificationRequest,
    types::{ChargePointErrorCode, ChargePointStatus},
};

use crate::v16::{
    cp::core::ChargePointCore,
    interface::{SimEvent, TimerId},
};

use super::{
    call::CallAction,
    connector::{ConnectorState, StateChange, Trigger},
};

impl ChargePointCore {
    /// Fires a guarded transition. Illegal triggers are logged and ignored.
    pub(crate) fn transition(&mut self, trigger: Trigger) -> bool {
        let finish_was_pending = self.connector.finish_pending();
        match self.connector.fire(trigger) {
            Ok(change) => {
                if finish_was_pending && trigger != Trigger::FinishElapsed {
                    self.remove_timeout(TimerId::Finishing);
                }
                self.publish_state_change(change);
                true
            }
            Err(e) => {
                log::debug!("[{}] {}", self.config.charge_point_id, e);
                false
            }
        }
    }

    pub(crate) fn force_state(&mut self, state: ConnectorState) {
        let finish_was_pending = self.connector.finish_pending();
        if let Some(change) = self.connector.set_state(state) {
            if finish_was_pending {
                self.remove_timeout(TimerId::Finishing);
            }
            self.publish_state_change(change);
        }
    }

    fn publish_state_change(&mut self, change: StateChange) {
        self.log_info(format!("State {} -> {}", change.previous, change.next));
        self.emit(SimEvent::StateChanged(change));
        self.send_status_notification(change.next.status());
    }

    pub(crate) fn send_status_notification(&mut self, status: ChargePointStatus) {
        let connector_id = self
            .transaction
            .as_ref()
            .map(|tx| tx.connector_id)
            .unwrap_or(self.config.connector_id);
        let req = StatusNotificationRequest {
            connector_id,
            error_code: ChargePointErrorCode::NoError,
            info: None,
            status,
            timestamp: Some(Utc::now()),
            vendor_id: None,
            vendor_error_code: None,
        };
        self.enqueue_call(CallAction::StatusNotification, req);
    }

    /// Moves to `Finishing`: through the guarded trigger when charging,
    /// by override from any other state.
    pub(crate) fn enter_finishing(&mut self) {
        if !self.transition(Trigger::StopTransaction) {
            self.force_state(ConnectorState::Finishing);
        }
    }

    pub(crate) fn schedule_finishing(&mut self) {
        if self.connector.schedule_finish() {
            self.add_timeout(TimerId::Finishing, self.config.finishing_delay_ms);
        }
    }

    pub(crate) fn on_finishing_timer(&mut self) {
        if self.connector.finish_pending() {
            self.transition(Trigger::FinishElapsed);
        }
    }
}
