use super::super::types::{AvailabilityStatus, AvailabilityType};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeAvailabilityRequest {
    pub connector_id: usize,
    #[serde(rename = "type")]
    pub kind: AvailabilityType,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ChangeAvailabilityResponse {
    pub status: AvailabilityStatus,
}
