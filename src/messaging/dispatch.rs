// src/messaging/dispatch.rs - Pre-send planning: the send gate and template
// selection replayed as a pure pass over (batch, detection result, ledger).
// Actual delivery belongs to the MessagingGateway collaborator.

use log::info;
use serde::Serialize;
use std::collections::HashMap;

use crate::matching::send_gate::{already_sent, is_historical_customer};
use crate::messaging::templates::{new_customer_message, repeat_customer_message};
use crate::models::matching::DuplicateRecord;
use crate::models::records::Request;
use crate::models::records::HistoricalRecord;
use crate::utils::constants::{DEFAULT_BOOK_CODE, DEFAULT_LANGUAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Name or phone column was blank; there is no one to message.
    BlankContact,
    /// The send gate found this exact (name, phone, book) triple in the ledger.
    AlreadySentBook,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::BlankContact => "empty name or phone number",
            SkipReason::AlreadySentBook => "message already sent for this book previously",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemplateKind {
    RepeatCustomer,
    NewCustomer,
}

#[derive(Debug, Clone, Serialize)]
pub enum SendDecision {
    Skip(SkipReason),
    Send { template: TemplateKind, body: String },
}

/// Planned action for one batch row.
#[derive(Debug, Clone, Serialize)]
pub struct SendPlan {
    pub request_index: usize,
    pub name: String,
    pub phone: String,
    pub decision: SendDecision,
}

fn field_or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decides, per request, whether to skip and which template to send. Consults
/// the ledger at planning time, which may have grown since the detection pass
/// that produced `duplicates`.
pub fn plan_sends(
    requests: &[Request],
    duplicates: &[DuplicateRecord],
    ledger: &[HistoricalRecord],
) -> Vec<SendPlan> {
    let duplicates_by_index: HashMap<usize, &DuplicateRecord> = duplicates
        .iter()
        .map(|dup| (dup.request_index, dup))
        .collect();

    let mut plans = Vec::with_capacity(requests.len());
    for (request_index, request) in requests.iter().enumerate() {
        let mut plan = SendPlan {
            request_index,
            name: request.name.clone(),
            phone: request.phone.clone(),
            decision: SendDecision::Skip(SkipReason::BlankContact),
        };

        if request.name.trim().is_empty() || request.phone.trim().is_empty() {
            info!("Skipping request {}: empty name or phone", request_index);
            plans.push(plan);
            continue;
        }

        let book = field_or_default(&request.book, DEFAULT_BOOK_CODE);
        if already_sent(&request.name, &request.phone, &book, ledger) {
            plan.decision = SendDecision::Skip(SkipReason::AlreadySentBook);
            plans.push(plan);
            continue;
        }

        let repeat_body = if is_historical_customer(&request.name, &request.phone, ledger) {
            duplicates_by_index
                .get(&request_index)
                .and_then(|dup| repeat_customer_message(dup))
        } else {
            None
        };

        plan.decision = match repeat_body {
            Some(body) => SendDecision::Send {
                template: TemplateKind::RepeatCustomer,
                body,
            },
            None => {
                // Historical customers without fresh evidence fall back to
                // the new-customer template with defaulted book/language.
                let mut templated = request.clone();
                templated.book = book;
                templated.language = field_or_default(&request.language, DEFAULT_LANGUAGE);
                SendDecision::Send {
                    template: TemplateKind::NewCustomer,
                    body: new_customer_message(&templated),
                }
            }
        };
        plans.push(plan);
    }
    plans
}
