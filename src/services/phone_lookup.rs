// src/services/phone_lookup.rs - Interface to the external phone-metadata
// service (carrier, line type, location).

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneMetadata {
    pub is_valid: bool,
    pub formatted_phone: String,
    pub carrier: String,
    pub line_type: String,
    pub is_mobile: bool,
    pub is_landline: bool,
    pub is_voip: bool,
    pub location: String,
    pub timezone: String,
    pub error: Option<String>,
}

/// External phone-metadata collaborator. Implementations own their rate
/// limiting and retry policy.
pub trait PhoneMetadataService {
    fn lookup(
        &self,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<PhoneMetadata>> + Send;
}
