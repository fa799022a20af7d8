#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
pub enum AvailabilityType {
    Inoperative,
    #[default]
    Operative,
}
