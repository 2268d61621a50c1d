pub mod gateway;
pub mod geocoding;
pub mod phone_lookup;
