#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum ChargingRateUnitType {
    W,
    A,
}
