use serde::{Deserialize, Serialize};

use super::field::OptionalField;
use super::plate::Destination;

/// Kind of movement a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    In,
    Out,
    Return,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Return => "RETURN",
        }
    }
}

/// TransactionLog: one batch movement. Logs are append-only and kept most
/// recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLog {
    /// Millisecond timestamp of creation, rendered as a decimal string.
    pub id: String,

    #[serde(rename = "type")]
    pub log_type: LogType,

    pub start_number: u32,
    pub end_number: u32,

    /// Always `end_number - start_number + 1`.
    pub count: u32,

    pub equipment_name: String,

    /// OUT entries only.
    #[serde(default, skip_serializing_if = "OptionalField::is_absent")]
    pub destination: OptionalField<Destination>,

    pub timestamp: String,
}

impl TransactionLog {
    pub fn id_millis(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}
