pub(crate) mod change_availability;
pub(crate) mod change_configuration;
pub(crate) mod clear_charging_profile;
pub(crate) mod remote_start_transaction;
pub(crate) mod remote_stop_transaction;
pub(crate) mod reset;
pub(crate) mod set_charging_profile;
pub(crate) mod unlock_connector;
