// Duplicate and repeat-customer detection core for free-book outreach
// campaigns: normalizes phones and addresses, cross-references incoming
// requests against the sent-records ledger, and gates resends of the same
// book to the same person. External validation and dispatch services are
// consumed through the traits in `services`.

pub mod ingest;
pub mod matching;
pub mod messaging;
pub mod models;
pub mod services;
pub mod utils;

pub use matching::address::{address_similarity, clean_address, parse_components, AddressComponents};
pub use matching::engine::{find_duplicates, DetectionConfig};
pub use matching::phone::{normalize_phone, phones_match};
pub use matching::send_gate::{already_sent, is_historical_customer};
pub use models::matching::{
    DetectionResult, DetectionStats, DuplicateRecord, DuplicateSummary, MatchEvidence, MatchType,
};
pub use models::records::{HistoricalRecord, Request};
pub use utils::progress::ProgressCallback;
