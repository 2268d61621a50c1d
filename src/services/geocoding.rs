// src/services/geocoding.rs - Interface to the external address-validation
// service. Nothing in the detection core depends on these results; they feed
// the validation report only.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of geocoding one free-text address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub is_valid: bool,
    pub formatted_address: String,
    /// 0-100, a weighted blend of location-precision tier, partial-match
    /// penalty, and component completeness computed by the provider adapter.
    pub confidence: u8,
    /// Component type (street_number, route, locality, ...) to value.
    pub components: HashMap<String, String>,
    pub coordinates: Option<(f64, f64)>,
    pub error: Option<String>,
}

/// External geocoding collaborator. Implementations own their rate limiting
/// and retry policy.
pub trait GeocodingService {
    fn geocode(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<GeocodedAddress>> + Send;
}
