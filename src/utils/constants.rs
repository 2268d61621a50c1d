// src/utils/constants.rs

/// Minimum weighted similarity for two addresses to count as the same place.
pub const ADDRESS_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Below this edit-similarity, street names get no partial credit at all;
/// low similarities would otherwise conflate unrelated streets.
pub const STREET_NAME_SIMILARITY_CUTOFF: f64 = 0.8;

/// Score granted when two street names differ only by directional spelling
/// (north vs n, northeast vs ne, ...).
pub const DIRECTIONAL_STREET_NAME_SCORE: f64 = 0.9;

/// Hard ceiling on detection workers regardless of core count.
pub const MAX_DETECTION_WORKERS: usize = 10;

/// Batches smaller than workers * this run sequentially; partitioning
/// overhead dominates at that size.
pub const SEQUENTIAL_FALLBACK_PER_WORKER: usize = 16;

/// Progress callbacks fire once per this many processed requests.
pub const PROGRESS_UPDATE_EVERY: usize = 10;

/// Applied when a batch row leaves the book or language column blank.
pub const DEFAULT_BOOK_CODE: &str = "GG";
pub const DEFAULT_LANGUAGE: &str = "English";

/// Collaborator send retries: fixed attempt count, linearly increasing delay.
pub const MAX_SEND_ATTEMPTS: u32 = 3;
pub const SEND_RETRY_BASE_DELAY_MS: u64 = 500;
