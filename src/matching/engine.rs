// src/matching/engine.rs - Cross-references an incoming batch against the
// historical ledger: exact phone+name evidence plus weighted fuzzy address
// evidence, with chunked parallel execution for large batches.

use futures::future::join_all;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::matching::address::{address_similarity, clean_address};
use crate::matching::normalize_name;
use crate::matching::phone::normalize_phone;
use crate::models::matching::{
    DetectionResult, DetectionStats, DuplicateRecord, MatchEvidence, MatchType,
};
use crate::models::records::{HistoricalRecord, Request};
use crate::utils::constants::{
    ADDRESS_SIMILARITY_THRESHOLD, MAX_DETECTION_WORKERS, SEQUENTIAL_FALLBACK_PER_WORKER,
};
use crate::utils::progress::{report_progress, ProgressCallback};

/// Tuning knobs for one detection pass.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Worker count for chunked execution; the batch is split into this many
    /// contiguous chunks.
    pub workers: usize,
    /// Minimum address similarity treated as evidence.
    pub similarity_threshold: f64,
    /// Batches below workers * this run sequentially.
    pub sequential_fallback_per_worker: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_DETECTION_WORKERS),
            similarity_threshold: ADDRESS_SIMILARITY_THRESHOLD,
            sequential_fallback_per_worker: SEQUENTIAL_FALLBACK_PER_WORKER,
        }
    }
}

/// One detection pass over `requests` x `ledger`. The ledger is read-only for
/// the duration of the pass. Large batches are partitioned into contiguous
/// chunks evaluated concurrently on blocking workers; a panicked chunk is
/// logged and contributes nothing rather than aborting the pass.
pub async fn find_duplicates(
    requests: Arc<Vec<Request>>,
    ledger: Arc<Vec<HistoricalRecord>>,
    config: DetectionConfig,
    progress: Option<ProgressCallback>,
) -> DetectionResult {
    if ledger.is_empty() {
        warn!("No historical ledger data available for duplicate detection");
        return DetectionResult::default();
    }
    if requests.is_empty() {
        return DetectionResult::default();
    }

    let workers = config.workers.max(1);
    let total = requests.len();
    let sequential_cutoff = workers * config.sequential_fallback_per_worker.max(1);

    if workers == 1 || total < sequential_cutoff {
        debug!(
            "Detection pass running sequentially ({} requests, {} ledger rows)",
            total,
            ledger.len()
        );
        let counter = AtomicUsize::new(0);
        let (duplicates, stats) = scan_requests(
            &requests,
            0,
            &ledger,
            config.similarity_threshold,
            &counter,
            total,
            &progress,
        );
        return DetectionResult { duplicates, stats };
    }

    debug!(
        "Detection pass running on {} workers ({} requests, {} ledger rows)",
        workers,
        total,
        ledger.len()
    );

    let counter = Arc::new(AtomicUsize::new(0));
    let chunk_size = (total + workers - 1) / workers;
    let mut handles = Vec::with_capacity(workers);

    for chunk_start in (0..total).step_by(chunk_size) {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let requests = Arc::clone(&requests);
        let ledger = Arc::clone(&ledger);
        let counter = Arc::clone(&counter);
        let progress = progress.clone();
        let threshold = config.similarity_threshold;

        handles.push(tokio::task::spawn_blocking(move || {
            scan_requests(
                &requests[chunk_start..chunk_end],
                chunk_start,
                &ledger,
                threshold,
                &counter,
                total,
                &progress,
            )
        }));
    }

    let mut result = DetectionResult::default();
    for outcome in join_all(handles).await {
        match outcome {
            Ok((duplicates, stats)) => {
                result.duplicates.extend(duplicates);
                result.stats.merge(&stats);
            }
            Err(join_error) => {
                warn!(
                    "Detection chunk failed and contributed no results: {}",
                    join_error
                );
                result.stats.chunk_failures += 1;
            }
        }
    }
    result
}

/// Full ledger scan for one contiguous slice of the batch. `base_index`
/// offsets the emitted request indices back into batch coordinates.
fn scan_requests(
    requests: &[Request],
    base_index: usize,
    ledger: &[HistoricalRecord],
    similarity_threshold: f64,
    processed_counter: &AtomicUsize,
    total: usize,
    progress: &Option<ProgressCallback>,
) -> (Vec<DuplicateRecord>, DetectionStats) {
    let mut duplicates = Vec::new();
    let mut stats = DetectionStats::default();

    for (offset, request) in requests.iter().enumerate() {
        let processed = processed_counter.fetch_add(1, Ordering::SeqCst) + 1;
        report_progress(progress, processed, total);
        stats.requests_processed += 1;

        let request_phone = normalize_phone(&request.phone);
        let request_address = clean_address(&request.address);
        let request_name = normalize_name(&request.name);

        // Nothing to compare on; conservative under-detection.
        if request_phone.is_empty() && request_address.is_empty() {
            stats.requests_skipped += 1;
            continue;
        }

        let mut phone_matches = Vec::new();
        let mut address_matches = Vec::new();

        for (ledger_index, record) in ledger.iter().enumerate() {
            // Phone evidence needs the name too: a shared family landline
            // alone must not flag a different person.
            if !request_phone.is_empty()
                && !request_name.is_empty()
                && request_phone == normalize_phone(&record.phone)
                && request_name == normalize_name(&record.name)
            {
                phone_matches.push(MatchEvidence {
                    match_type: MatchType::Phone,
                    ledger_index,
                    record: record.clone(),
                    similarity: None,
                });
            }

            if !request_address.is_empty() {
                let record_address = clean_address(&record.address);
                if !record_address.is_empty() {
                    let similarity = address_similarity(&request_address, &record_address);
                    if similarity >= similarity_threshold {
                        address_matches.push(MatchEvidence {
                            match_type: MatchType::Address,
                            ledger_index,
                            record: record.clone(),
                            similarity: Some(similarity),
                        });
                    }
                }
            }
        }

        if !phone_matches.is_empty() || !address_matches.is_empty() {
            stats.requests_matched += 1;
            let total_matches = phone_matches.len() + address_matches.len();
            duplicates.push(DuplicateRecord {
                request_index: base_index + offset,
                name: request.name.clone(),
                phone: request_phone,
                address: request_address,
                book: request.book.clone(),
                language: request.language.clone(),
                phone_matches,
                address_matches,
                total_matches,
            });
        }
    }

    (duplicates, stats)
}
