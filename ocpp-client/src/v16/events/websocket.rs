use ocppsim_core::{
    format::{
        error::GenericError,
        message::{OcppMessage, MESSAGE_TYPE_CALL, MESSAGE_TYPE_CALL_ERROR, MESSAGE_TYPE_CALL_RESULT},
    },
    v16::protocol_error::ProtocolError,
};

use crate::v16::{
    cp::core::ChargePointCore,
    interface::{LogDirection, SimEvent},
};

use super::inbound::InboundCall;

impl ChargePointCore {
    pub(crate) fn got_ws_msg_helper(&mut self, msg: String) {
        log::info!("[MSG_IN] {}", msg);
        self.emit(SimEvent::Log {
            direction: LogDirection::In,
            text: msg.clone(),
        });

        match OcppMessage::<ProtocolError>::decode(msg) {
            OcppMessage::Call(call) => {
                let inbound = InboundCall::decode(&call.action, call.payload);
                self.handle_inbound_call(call.unique_id, inbound);
            }
            OcppMessage::CallResponse(res) => {
                self.handle_call_response(res);
            }
            OcppMessage::Invalid(invalid) => {
                log::warn!("discarding malformed frame: {}", invalid.err_msg);
                let Some(uid) = invalid.unique_id else {
                    return;
                };
                match invalid.message_type {
                    Some(MESSAGE_TYPE_CALL) => {
                        self.send_error(uid, ProtocolError::FormationViolation, invalid.err_msg);
                    }
                    Some(MESSAGE_TYPE_CALL_RESULT) | Some(MESSAGE_TYPE_CALL_ERROR) => {
                        self.fail_pending_call(&uid, GenericError::ParsingError);
                    }
                    _ => {}
                }
            }
        }
    }

    fn handle_inbound_call(&mut self, unique_id: String, call: InboundCall) {
        match call {
            InboundCall::RemoteStartTransaction(req) => {
                self.remote_start_transaction_ocpp(unique_id, req)
            }
            InboundCall::RemoteStopTransaction(req) => {
                self.remote_stop_transaction_ocpp(unique_id, req)
            }
            InboundCall::Reset(req) => self.reset_ocpp(unique_id, req),
            InboundCall::UnlockConnector(req) => self.unlock_connector_ocpp(unique_id, req),
            InboundCall::ChangeAvailability(req) => self.change_availability_ocpp(unique_id, req),
            InboundCall::ChangeConfiguration(req) => {
                self.change_configuration_ocpp(unique_id, req)
            }
            InboundCall::SetChargingProfile(req) => self.set_charging_profile_ocpp(unique_id, req),
            InboundCall::ClearChargingProfile(req) => {
                self.clear_charging_profile_ocpp(unique_id, req)
            }
            InboundCall::Unsupported(action) => {
                self.log_err(format!("Unsupported action {}", action));
                self.send_error(
                    unique_id,
                    ProtocolError::NotSupported,
                    format!("Action {} not supported", action),
                );
            }
        }
    }
}
