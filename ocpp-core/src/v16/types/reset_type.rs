#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
pub enum ResetType {
    Hard,
    #[default]
    Soft,
}
