use super::super::types::{ChargingProfile, ChargingProfileStatus};

/// Also accepts the profile under `chargingProfile`, the key used by
/// RemoteStartTransaction, which some central systems send here too.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SetChargingProfileRequest {
    pub connector_id: i32,
    #[serde(
        rename = "csChargingProfiles",
        alias = "chargingProfile",
        skip_serializing_if = "Option::is_none"
    )]
    pub cs_charging_profiles: Option<ChargingProfile>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetChargingProfileResponse {
    pub status: ChargingProfileStatus,
}
