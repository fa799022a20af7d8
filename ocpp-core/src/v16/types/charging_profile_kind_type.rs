#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
pub enum ChargingProfileKindType {
    #[default]
    Absolute,
    Recurring,
    Relative,
}
