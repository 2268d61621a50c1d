// src/messaging/templates.rs - Outreach message bodies for new and repeat
// customers, plus the book-code table they share.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::matching::DuplicateRecord;
use crate::models::records::Request;

/// Book codes as they appear in batch uploads and the ledger.
static BOOK_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("GG", "Gyaan Ganga"),
        ("GTGA", "Gita Tera Gyan Amrit"),
        ("JKR", "Jeene ki Rah"),
        ("YBB", "Yatharth Bhakti Bodh"),
        ("BSBT", "Bhakti se bhagwan tak"),
        ("KP", "Kabir parichay"),
        ("GGK", "Garima Gitya ki"),
        ("HDM", "Hindu Dharma Mahaan"),
    ]
    .into_iter()
    .collect()
});

/// Full title for a book code; unknown codes pass through untranslated.
pub fn book_display_name(code: &str) -> String {
    let trimmed = code.trim();
    BOOK_NAMES
        .get(trimmed.to_uppercase().as_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Confirmation message for a requester our records say was already mailed a
/// book. The referenced book/language come from the matched ledger row, not
/// the incoming request.
pub fn repeat_customer_message(duplicate: &DuplicateRecord) -> Option<String> {
    let evidence = duplicate.primary_evidence()?;
    let book_name = book_display_name(&evidence.record.book);
    let language = evidence.record.language.trim();

    Some(format!(
        "Hello, you requested a free book called *{}* in {} from Sant Rampal Ji Maharaj.\n\n\
         However our records indicate that we had already mailed you a free book in the past. \
         Can you please confirm if you already received a book in the past?",
        book_name, language
    ))
}

/// First-contact message. When both book and language are known we confirm
/// the address; otherwise we also ask for the language.
pub fn new_customer_message(request: &Request) -> String {
    let book_name = book_display_name(&request.book);
    let language = request.language.trim();
    let has_book_and_language = !book_name.is_empty() && !language.is_empty();

    if has_book_and_language {
        format!(
            "Hello, you requested a free book called *{}* in {} from Sant Rampal Ji Maharaj.\n\n\
             Can you please confirm / provide the address to ensure it's not incorrect and has \
             the full details (apartment or suite number) to be able to mail it:\n\n{}\n{}",
            book_name, language, request.name, request.address
        )
    } else {
        format!(
            "Hello, you requested a free book called *{}* from Sant Rampal Ji Maharaj. \
             Can you please let me know what language did you request it in \
             (Hindi, English, Punjabi, Gujrati, other?).\n\n\
             Can you please confirm / provide the address to ensure it's not incorrect and has \
             the full details to be able to mail it:\n\n{}\n{}",
            book_name, request.name, request.address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matching::{MatchEvidence, MatchType};
    use crate::models::records::HistoricalRecord;

    #[test]
    fn known_codes_map_to_full_titles() {
        assert_eq!(book_display_name("GG"), "Gyaan Ganga");
        assert_eq!(book_display_name(" jkr "), "Jeene ki Rah");
        assert_eq!(book_display_name("ZZZ"), "ZZZ");
    }

    #[test]
    fn repeat_message_references_the_matched_ledger_book() {
        let duplicate = DuplicateRecord {
            request_index: 0,
            name: "John Smith".into(),
            phone: "12065044242".into(),
            address: String::new(),
            book: "YBB".into(),
            language: "English".into(),
            phone_matches: vec![MatchEvidence {
                match_type: MatchType::Phone,
                ledger_index: 0,
                record: HistoricalRecord {
                    book: "GG".into(),
                    language: "Hindi".into(),
                    ..HistoricalRecord::default()
                },
                similarity: None,
            }],
            address_matches: Vec::new(),
            total_matches: 1,
        };
        let message = repeat_customer_message(&duplicate).expect("evidence present");
        assert!(message.contains("*Gyaan Ganga*"));
        assert!(message.contains("in Hindi"));
        assert!(message.contains("already mailed you a free book"));
    }

    #[test]
    fn new_customer_message_asks_for_language_only_when_unknown() {
        let mut request = Request {
            name: "Mary Jones".into(),
            phone: "3125551212".into(),
            address: "456 Oak Ave Chicago IL".into(),
            book: "JKR".into(),
            language: "Punjabi".into(),
        };
        let message = new_customer_message(&request);
        assert!(message.contains("*Jeene ki Rah* in Punjabi"));
        assert!(!message.contains("what language"));

        request.language.clear();
        let message = new_customer_message(&request);
        assert!(message.contains("what language did you request it in"));
        assert!(message.contains("Mary Jones"));
    }
}
