#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum RecurrencyKindType {
    Daily,
    Weekly,
}
