// src/models/matching.rs - Match evidence and per-pass result structures

use serde::{Deserialize, Serialize};

use crate::models::records::HistoricalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    Phone,
    Address,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Phone => "phone",
            MatchType::Address => "address",
        }
    }
}

/// Evidence that one incoming request matched one ledger row.
/// `similarity` is populated for address matches only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvidence {
    pub match_type: MatchType,
    /// Position of the matched row in the ledger slice handed to the engine.
    pub ledger_index: usize,
    pub record: HistoricalRecord,
    pub similarity: Option<f64>,
}

/// Aggregated match evidence for one request. A request only produces a
/// `DuplicateRecord` when at least one evidence entry was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateRecord {
    /// Position of the request in the incoming batch.
    pub request_index: usize,
    pub name: String,
    /// Normalized phone, empty when the raw value could not be normalized.
    pub phone: String,
    /// Cleaned address, empty when the raw value was blank.
    pub address: String,
    pub book: String,
    pub language: String,
    pub phone_matches: Vec<MatchEvidence>,
    pub address_matches: Vec<MatchEvidence>,
    pub total_matches: usize,
}

impl DuplicateRecord {
    /// Most recent piece of evidence, preferring phone matches; drives the
    /// repeat-customer message template.
    pub fn primary_evidence(&self) -> Option<&MatchEvidence> {
        self.phone_matches
            .first()
            .or_else(|| self.address_matches.first())
    }
}

/// Breakdown of a detection pass by evidence kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSummary {
    pub total_duplicates: usize,
    pub phone_duplicates: usize,
    pub address_duplicates: usize,
    pub both_duplicates: usize,
}

impl DuplicateSummary {
    pub fn from_records(records: &[DuplicateRecord]) -> Self {
        let mut summary = DuplicateSummary {
            total_duplicates: records.len(),
            ..Default::default()
        };
        for record in records {
            let by_phone = !record.phone_matches.is_empty();
            let by_address = !record.address_matches.is_empty();
            if by_phone {
                summary.phone_duplicates += 1;
            }
            if by_address {
                summary.address_duplicates += 1;
            }
            if by_phone && by_address {
                summary.both_duplicates += 1;
            }
        }
        summary
    }
}

/// Counters surfaced alongside the duplicate set so callers can report
/// processed/matched/skipped totals without re-deriving them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionStats {
    pub requests_processed: usize,
    pub requests_matched: usize,
    /// Requests with neither a usable phone nor a usable address.
    pub requests_skipped: usize,
    /// Parallel chunks that panicked and contributed no results.
    pub chunk_failures: usize,
}

impl DetectionStats {
    pub fn merge(&mut self, other: &DetectionStats) {
        self.requests_processed += other.requests_processed;
        self.requests_matched += other.requests_matched;
        self.requests_skipped += other.requests_skipped;
        self.chunk_failures += other.chunk_failures;
    }
}

/// Output of one detection pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub duplicates: Vec<DuplicateRecord>,
    pub stats: DetectionStats,
}

impl DetectionResult {
    pub fn summary(&self) -> DuplicateSummary {
        DuplicateSummary::from_records(&self.duplicates)
    }
}
