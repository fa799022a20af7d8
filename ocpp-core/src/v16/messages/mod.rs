//! Request/response payloads, one module per OCPP action.
//!
//! Requests initiated by the central system derive `Default` and tolerate
//! missing fields: the charge point acknowledges them without validating
//! schema conformance.

pub mod authorize;
pub mod boot_notification;
pub mod change_availability;
pub mod change_configuration;
pub mod clear_charging_profile;
pub mod heart_beat;
pub mod meter_values;
pub mod remote_start_transaction;
pub mod remote_stop_transaction;
pub mod reset;
pub mod set_charging_profile;
pub mod start_transaction;
pub mod status_notification;
pub mod stop_transaction;
pub mod unlock_connector;
