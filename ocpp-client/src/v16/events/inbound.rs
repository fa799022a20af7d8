use ocppsim_core::v16::messages::{
    change_availability::ChangeAvailabilityRequest,
    change_configuration::ChangeConfigurationRequest,
    clear_charging_profile::ClearChargingProfileRequest,
    remote_start_transaction::RemoteStartTransactionRequest,
    remote_stop_transaction::RemoteStopTransactionRequest, reset::ResetRequest,
    set_charging_profile::SetChargingProfileRequest, unlock_connector::UnlockConnectorRequest,
};
use serde::de::DeserializeOwned;

/// CSMS-initiated calls the simulator reacts to, with their payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundCall {
    RemoteStartTransaction(RemoteStartTransactionRequest),
    RemoteStopTransaction(RemoteStopTransactionRequest),
    Reset(ResetRequest),
    UnlockConnector(UnlockConnectorRequest),
    ChangeAvailability(ChangeAvailabilityRequest),
    ChangeConfiguration(ChangeConfigurationRequest),
    SetChargingProfile(SetChargingProfileRequest),
    ClearChargingProfile(ClearChargingProfileRequest),
    Unsupported(String),
}

fn lenient<T: DeserializeOwned + Default>(action: &str, payload: serde_json::Value) -> T {
    match serde_json::from_value::<T>(payload) {
        Ok(req) => req,
        Err(e) => {
            log::warn!("{} payload not understood ({}), using defaults", action, e);
            T::default()
        }
    }
}

impl InboundCall {
    /// Payloads that do not match the expected shape fall back to their
    /// defaults so the call is still answered.
    pub fn decode(action: &str, payload: serde_json::Value) -> Self {
        match action {
            "RemoteStartTransaction" => {
                InboundCall::RemoteStartTransaction(lenient(action, payload))
            }
            "RemoteStopTransaction" => InboundCall::RemoteStopTransaction(lenient(action, payload)),
            "Reset" => InboundCall::Reset(lenient(action, payload)),
            "UnlockConnector" => InboundCall::UnlockConnector(lenient(action, payload)),
            "ChangeAvailability" => InboundCall::ChangeAvailability(lenient(action, payload)),
            "ChangeConfiguration" => InboundCall::ChangeConfiguration(lenient(action, payload)),
            "SetChargingProfile" => InboundCall::SetChargingProfile(lenient(action, payload)),
            "ClearChargingProfile" => InboundCall::ClearChargingProfile(lenient(action, payload)),
            other => InboundCall::Unsupported(other.to_string()),
        }
    }

    pub fn action(&self) -> &str {
        match self {
            InboundCall::RemoteStartTransaction(_) => "RemoteStartTransaction",
            InboundCall::RemoteStopTransaction(_) => "RemoteStopTransaction",
            InboundCall::Reset(_) => "Reset",
            InboundCall::UnlockConnector(_) => "UnlockConnector",
            InboundCall::ChangeAvailability(_) => "ChangeAvailability",
            InboundCall::ChangeConfiguration(_) => "ChangeConfiguration",
            InboundCall::SetChargingProfile(_) => "SetChargingProfile",
            InboundCall::ClearChargingProfile(_) => "ClearChargingProfile",
            InboundCall::Unsupported(action) => action,
        }
    }
}
