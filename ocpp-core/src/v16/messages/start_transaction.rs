use super::super::types::IdTagInfo;

use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartTransactionRequest {
    pub connector_id: usize,
    pub id_tag: String,
    pub meter_start: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// Central systems in the wild sometimes omit `idTagInfo` or spell the id
/// `transaction_id`; both are tolerated, and a missing id is treated as a
/// failed attempt by the caller.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartTransactionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_tag_info: Option<IdTagInfo>,
    #[serde(default, alias = "transaction_id")]
    pub transaction_id: Option<i32>,
}
