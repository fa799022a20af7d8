mod authorization_status;
mod availability_status;
mod availability_type;
mod charge_point_error_code;
mod charge_point_status;
mod charging_profile;
mod charging_profile_kind_type;
mod charging_profile_purpose_type;
mod charging_profile_status;
mod charging_rate_unit_type;
mod charging_schedule;
mod charging_schedule_period;
mod clear_charging_profile_status;
mod configuration_status;
mod id_tag_info;
mod location;
mod measurand;
mod meter_value;
mod phase;
mod reading_context;
mod reason;
mod recurrency_kind_type;
mod registration_status;
mod remote_start_stop_status;
mod reset_status;
mod reset_type;
mod sampled_value;
mod unit_of_measure;
mod unlock_status;
mod value_format;

pub use authorization_status::AuthorizationStatus;
pub use availability_status::AvailabilityStatus;
pub use availability_type::AvailabilityType;
pub use charge_point_error_code::ChargePointErrorCode;
pub use charge_point_status::ChargePointStatus;
pub use charging_profile::ChargingProfile;
pub use charging_profile_kind_type::ChargingProfileKindType;
pub use charging_profile_purpose_type::ChargingProfilePurposeType;
pub use charging_profile_status::ChargingProfileStatus;
pub use charging_rate_unit_type::ChargingRateUnitType;
pub use charging_schedule::ChargingSchedule;
pub use charging_schedule_period::ChargingSchedulePeriod;
pub use clear_charging_profile_status::ClearChargingProfileStatus;
pub use configuration_status::ConfigurationStatus;
pub use id_tag_info::IdTagInfo;
pub use location::Location;
pub use measurand::Measurand;
pub use meter_value::MeterValue;
pub use phase::Phase;
pub use reading_context::ReadingContext;
pub use reason::Reason;
pub use recurrency_kind_type::RecurrencyKindType;
pub use registration_status::RegistrationStatus;
pub use remote_start_stop_status::RemoteStartStopStatus;
pub use reset_status::ResetStatus;
pub use reset_type::ResetType;
pub use sampled_value::SampledValue;
pub use unit_of_measure::UnitOfMeasure;
pub use unlock_status::UnlockStatus;
pub use value_format::ValueFormat;
