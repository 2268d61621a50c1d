// src/models/records.rs - Incoming batch rows and historical ledger rows

use serde::{Deserialize, Serialize};

/// One row of the uploaded weekly batch. Immutable for the duration of a
/// detection pass; free-text fields are normalized lazily by the matchers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Book", default)]
    pub book: String,
    #[serde(rename = "Language", default)]
    pub language: String,
}

/// One row of the append-only sent-records ledger. Rows are created only by a
/// completed send (outside this crate) and are never mutated or deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Book", default)]
    pub book: String,
    #[serde(rename = "Language", default)]
    pub language: String,
    #[serde(rename = "Sent_Date", default)]
    pub sent_date: String,
    #[serde(rename = "Message_Type", default)]
    pub message_type: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}
