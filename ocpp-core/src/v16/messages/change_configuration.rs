use super::super::types::ConfigurationStatus;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ChangeConfigurationRequest {
    pub key: String,
    pub value: String,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ChangeConfigurationResponse {
    pub status: ConfigurationStatus,
}
