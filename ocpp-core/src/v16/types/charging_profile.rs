use chrono::{DateTime, Utc};

use super::{ChargingProfileKindType, ChargingProfilePurposeType, ChargingSchedule, RecurrencyKindType};

/// Missing bookkeeping fields fall back to their defaults so that a bare
/// schedule is still usable as a limit.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargingProfile {
    #[serde(default)]
    pub charging_profile_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i32>,
    #[serde(default)]
    pub stack_level: i32,
    #[serde(default)]
    pub charging_profile_purpose: ChargingProfilePurposeType,
    #[serde(default)]
    pub charging_profile_kind: ChargingProfileKindType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrency_kind: Option<RecurrencyKindType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
    pub charging_schedule: ChargingSchedule,
}
