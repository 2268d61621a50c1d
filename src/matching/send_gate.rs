// src/matching/send_gate.rs - Resend gating and repeat-customer lookup at
// send time. Both checks scan the ledger passed in by the caller; the ledger
// may have grown since the detection pass and that is expected.

use log::debug;

use crate::matching::{normalize_book_code, normalize_name};
use crate::matching::phone::normalize_phone;
use crate::models::records::HistoricalRecord;

/// True when this exact (name, phone, book) triple already received a send.
/// A prior record for the same person with a *different* book never blocks;
/// a different book is always eligible.
pub fn already_sent(name: &str, phone: &str, book: &str, ledger: &[HistoricalRecord]) -> bool {
    let current_name = normalize_name(name);
    let current_phone = normalize_phone(phone);
    let current_book = normalize_book_code(book);

    if current_phone.is_empty() || current_book.is_empty() {
        return false;
    }

    for record in ledger {
        if normalize_name(&record.name) != current_name {
            continue;
        }
        if normalize_phone(&record.phone) != current_phone {
            continue;
        }
        if normalize_book_code(&record.book) == current_book {
            debug!(
                "Blocking resend: {} / {} already received book {} on {}",
                record.name, current_phone, current_book, record.sent_date
            );
            return true;
        }
    }
    false
}

/// True when the person appears anywhere in the ledger by name or phone.
/// Looser than the send gate: this only picks the message template family,
/// it never blocks a send.
pub fn is_historical_customer(name: &str, phone: &str, ledger: &[HistoricalRecord]) -> bool {
    let current_name = normalize_name(name);
    let current_phone = normalize_phone(phone);

    ledger.iter().any(|record| {
        (!current_name.is_empty() && normalize_name(&record.name) == current_name)
            || (!current_phone.is_empty() && normalize_phone(&record.phone) == current_phone)
    })
}
