use chrono::{DateTime, Utc};
use ocppsim_core::{
    format::{
        error::GenericError,
        frame::{Call, CallError, CallResult},
        message::{CallResponse, EncodeDecode},
    },
    v16::protocol_error::ProtocolError,
};
use serde::Serialize;

use crate::v16::{
    cp::core::{ChargePointCore, OcppError},
    interface::TimerId,
};

/// Outbound action plus whatever the continuation needs to resume.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CallAction {
    BootNotification,
    Heartbeat,
    Authorize,
    StatusNotification,
    StartTransaction { attempt: u8 },
    MeterValues,
    StopTransaction,
}

impl CallAction {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            CallAction::BootNotification => "BootNotification",
            CallAction::Heartbeat => "Heartbeat",
            CallAction::Authorize => "Authorize",
            CallAction::StatusNotification => "StatusNotification",
            CallAction::StartTransaction { .. } => "StartTransaction",
            CallAction::MeterValues => "MeterValues",
            CallAction::StopTransaction => "StopTransaction",
        }
    }
}

impl core::fmt::Display for CallAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PendingCall {
    pub action: CallAction,
    pub seq: u64,
    pub created_at: DateTime<Utc>,
}

impl ChargePointCore {
    fn next_unique_id(&mut self) -> (u64, String) {
        self.call_seq += 1;
        let id = format!("msg_{}_{}", Utc::now().timestamp_millis(), self.call_seq);
        (self.call_seq, id)
    }

    /// Sends a call and registers its pending entry and timeout. While the
    /// transport is down the call is rejected with `Offline` once the
    /// current input has been processed.
    pub(crate) fn enqueue_call<T: Serialize>(&mut self, action: CallAction, payload: T) {
        if !self.ws_connected {
            self.offline_rejections.push_back(action);
            return;
        }
        let (seq, unique_id) = self.next_unique_id();
        let call = Call::new(unique_id.clone(), action.to_string(), payload);
        if self.send_ws_msg(call.encode()).is_err() {
            self.offline_rejections.push_back(action);
            return;
        }
        self.pending_calls.insert(
            unique_id,
            PendingCall {
                action,
                seq,
                created_at: Utc::now(),
            },
        );
        self.add_timeout(TimerId::Call(seq), self.config.call_timeout_ms);
    }

    pub(crate) fn send_result<T: Serialize>(&mut self, unique_id: String, payload: T) {
        let res = CallResult::new(unique_id, payload);
        if let Err(e) = self.send_ws_msg(res.encode()) {
            log::warn!("could not answer call: {}", e);
        }
    }

    pub(crate) fn send_error(
        &mut self,
        unique_id: String,
        code: ProtocolError,
        description: impl Into<String>,
    ) {
        let err = CallError::new(unique_id, code).with_description(description);
        if let Err(e) = self.send_ws_msg(err.encode()) {
            log::warn!("could not answer call with error: {}", e);
        }
    }

    /// Check-and-delete: whoever removes the entry first owns the outcome.
    fn take_pending(&mut self, unique_id: &str) -> Option<PendingCall> {
        let pending = self.pending_calls.remove(unique_id)?;
        self.remove_timeout(TimerId::Call(pending.seq));
        Some(pending)
    }

    pub(crate) fn handle_call_response(&mut self, res: CallResponse<ProtocolError>) {
        let unique_id = res.get_unique_id();
        let Some(pending) = self.take_pending(&unique_id) else {
            log::debug!("ignoring response to unknown or expired call {}", unique_id);
            return;
        };
        let result = match res {
            CallResponse::CallResult(t) => Ok(t.payload),
            CallResponse::CallError(t) => Err(OcppError::Protocol {
                code: t.error_code,
                description: t.error_description,
            }),
        };
        self.dispatch_response(pending.action, result);
    }

    /// Resolves a pending call whose response frame could not be decoded.
    pub(crate) fn fail_pending_call(&mut self, unique_id: &str, err: GenericError) {
        if let Some(pending) = self.take_pending(unique_id) {
            self.dispatch_response(pending.action, Err(OcppError::Other(err)));
        }
    }

    pub(crate) fn on_call_timeout(&mut self, seq: u64) {
        let unique_id = self
            .pending_calls
            .iter()
            .find(|(_, pending)| pending.seq == seq)
            .map(|(id, _)| id.clone());
        let Some(pending) = unique_id.and_then(|id| self.pending_calls.remove(&id)) else {
            return;
        };
        let waited = Utc::now() - pending.created_at;
        self.log_err(format!(
            "{} timed out after {} ms",
            pending.action,
            waited.num_milliseconds()
        ));
        self.dispatch_response(pending.action, Err(OcppError::Other(GenericError::TimeOut)));
    }

    pub(crate) fn on_outgoing_offline(&mut self) {
        let drained = core::mem::take(&mut self.pending_calls);
        for (_, pending) in drained {
            self.remove_timeout(TimerId::Call(pending.seq));
            self.dispatch_response(pending.action, Err(OcppError::Other(GenericError::Offline)));
        }
    }

    pub(crate) fn settle_offline_rejections(&mut self) {
        while let Some(action) = self.offline_rejections.pop_front() {
            self.log_err(format!("{} not sent: transport offline", action));
            self.dispatch_response(action, Err(OcppError::Other(GenericError::Offline)));
        }
    }

    pub fn pending_call_count(&self) -> usize {
        self.pending_calls.len()
    }

    fn parse_response<T: serde::de::DeserializeOwned>(
        res: Result<serde_json::Value, OcppError>,
    ) -> Result<T, OcppError> {
        res.and_then(|f| {
            serde_json::from_value::<T>(f).map_err(|_| OcppError::Other(GenericError::ParsingError))
        })
    }

    fn dispatch_response(&mut self, action: CallAction, res: Result<serde_json::Value, OcppError>) {
        match action {
            CallAction::BootNotification => {
                self.boot_notification_response(Self::parse_response(res))
            }
            CallAction::Heartbeat => self.heartbeat_response(Self::parse_response(res)),
            CallAction::Authorize => self.authorize_response(Self::parse_response(res)),
            CallAction::StatusNotification => {
                self.status_notification_response(Self::parse_response(res))
            }
            CallAction::StartTransaction { attempt } => {
                self.start_transaction_response(attempt, Self::parse_response(res))
            }
            CallAction::MeterValues => self.meter_values_response(Self::parse_response(res)),
            CallAction::StopTransaction => {
                self.stop_transaction_response(Self::parse_response(res))
            }
        }
    }
}
