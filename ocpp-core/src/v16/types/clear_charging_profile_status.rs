#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum ClearChargingProfileStatus {
    Accepted,
    Unknown,
}
