// src/utils/progress.rs - Progress callback plumbing for long detection passes

use std::sync::Arc;

use crate::utils::constants::PROGRESS_UPDATE_EVERY;

/// Callback invoked with (processed_count, total_count) at a coarse
/// granularity. Purely observational; has no effect on results.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Fires the callback on the configured cadence plus the final request, so
/// observers always see `processed == total` at the end of a pass.
pub fn report_progress(callback: &Option<ProgressCallback>, processed: usize, total: usize) {
    if let Some(cb) = callback {
        if processed % PROGRESS_UPDATE_EVERY == 0 || processed == total {
            cb(processed.min(total), total);
        }
    }
}
