#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum AvailabilityStatus {
    Accepted,
    Rejected,
    Scheduled,
}
