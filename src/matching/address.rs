// src/matching/address.rs - Address cleaning, component parsing, and the
// weighted similarity used for duplicate detection.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use strsim::normalized_levenshtein;

use crate::utils::constants::{
    DIRECTIONAL_STREET_NAME_SCORE, STREET_NAME_SIMILARITY_CUTOFF,
};

// Component weights sum to 1.0. Street number and street name are the
// strongest identity signals for physical mail delivery; zip and state are
// abbreviation/typo-prone and carry little weight alone.
const WEIGHT_STREET_NUMBER: f64 = 0.25;
const WEIGHT_STREET_NAME: f64 = 0.35;
const WEIGHT_STREET_TYPE: f64 = 0.05;
const WEIGHT_CITY: f64 = 0.20;
const WEIGHT_STATE: f64 = 0.10;
const WEIGHT_ZIP: f64 = 0.05;

// Penalty multipliers applied after weighting, only when both sides carry a
// value for the field.
const PENALTY_STREET_NUMBER_MISMATCH: f64 = 0.3;
const PENALTY_STREET_NAME_DISSIMILAR: f64 = 0.5;
const PENALTY_CITY_MISMATCH: f64 = 0.4;

/// Word-boundary rewrites applied during cleaning, full form to abbreviation.
static ABBREVIATION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let rules: [(&str, &str); 19] = [
        ("street", "st"),
        ("avenue", "ave"),
        ("road", "rd"),
        ("drive", "dr"),
        ("lane", "ln"),
        ("boulevard", "blvd"),
        ("court", "ct"),
        ("place", "pl"),
        ("circle", "cir"),
        ("parkway", "pkwy"),
        ("trail", "tr"),
        ("apartment", "apt"),
        ("suite", "ste"),
        ("northeast", "ne"),
        ("northwest", "nw"),
        ("southeast", "se"),
        ("southwest", "sw"),
        ("north", "n"),
        ("south", "s"),
    ];
    let mut compiled = Vec::with_capacity(rules.len() + 2);
    for (full, abbrev) in rules {
        compiled.push((
            Regex::new(&format!(r"\b{}\b", full)).expect("static abbreviation pattern"),
            abbrev,
        ));
    }
    // "east"/"west" last so the compound directionals above win first.
    compiled.push((Regex::new(r"\beast\b").expect("static pattern"), "e"));
    compiled.push((Regex::new(r"\bwest\b").expect("static pattern"), "w"));
    compiled
});

/// Street-type tokens the component parser anchors on.
static STREET_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "st", "ave", "rd", "dr", "ln", "blvd", "ct", "pl", "way", "cir", "pkwy", "tr",
    ]
    .into_iter()
    .collect()
});

/// Alias groups for street types: both spellings map to one canonical form.
static STREET_TYPE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("street", "st"),
        ("st", "st"),
        ("avenue", "ave"),
        ("ave", "ave"),
        ("road", "rd"),
        ("rd", "rd"),
        ("drive", "dr"),
        ("dr", "dr"),
        ("lane", "ln"),
        ("ln", "ln"),
        ("boulevard", "blvd"),
        ("blvd", "blvd"),
        ("court", "ct"),
        ("ct", "ct"),
        ("place", "pl"),
        ("pl", "pl"),
        ("way", "way"),
        ("circle", "cir"),
        ("cir", "cir"),
        ("parkway", "pkwy"),
        ("pkwy", "pkwy"),
        ("trail", "tr"),
        ("tr", "tr"),
    ]
    .into_iter()
    .collect()
});

/// Full US state names mapped to their two-letter codes.
static STATE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("alabama", "al"),
        ("alaska", "ak"),
        ("arizona", "az"),
        ("arkansas", "ar"),
        ("california", "ca"),
        ("colorado", "co"),
        ("connecticut", "ct"),
        ("delaware", "de"),
        ("florida", "fl"),
        ("georgia", "ga"),
        ("hawaii", "hi"),
        ("idaho", "id"),
        ("illinois", "il"),
        ("indiana", "in"),
        ("iowa", "ia"),
        ("kansas", "ks"),
        ("kentucky", "ky"),
        ("louisiana", "la"),
        ("maine", "me"),
        ("maryland", "md"),
        ("massachusetts", "ma"),
        ("michigan", "mi"),
        ("minnesota", "mn"),
        ("mississippi", "ms"),
        ("missouri", "mo"),
        ("montana", "mt"),
        ("nebraska", "ne"),
        ("nevada", "nv"),
        ("new hampshire", "nh"),
        ("new jersey", "nj"),
        ("new mexico", "nm"),
        ("new york", "ny"),
        ("north carolina", "nc"),
        ("north dakota", "nd"),
        ("ohio", "oh"),
        ("oklahoma", "ok"),
        ("oregon", "or"),
        ("pennsylvania", "pa"),
        ("rhode island", "ri"),
        ("south carolina", "sc"),
        ("south dakota", "sd"),
        ("tennessee", "tn"),
        ("texas", "tx"),
        ("utah", "ut"),
        ("vermont", "vt"),
        ("virginia", "va"),
        ("washington", "wa"),
        ("west virginia", "wv"),
        ("wisconsin", "wi"),
        ("wyoming", "wy"),
    ]
    .into_iter()
    .collect()
});

static STATE_ABBREVS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STATE_NAMES.values().copied().collect());

/// Directional words and their abbreviations, full form to short form.
static DIRECTIONALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("north", "n"),
        ("south", "s"),
        ("east", "e"),
        ("west", "w"),
        ("northeast", "ne"),
        ("northwest", "nw"),
        ("southeast", "se"),
        ("southwest", "sw"),
    ]
    .into_iter()
    .collect()
});

/// Structured decomposition of a free-text address. Every field is an empty
/// string when the heuristic parse could not identify it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressComponents {
    pub street_number: String,
    pub street_name: String,
    pub street_type: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub full_street: String,
    pub full_address: String,
}

impl AddressComponents {
    /// True when the parse identified at least one concrete component.
    pub fn has_identifiable_components(&self) -> bool {
        !self.street_number.is_empty()
            || !self.street_name.is_empty()
            || !self.street_type.is_empty()
            || !self.city.is_empty()
            || !self.state.is_empty()
            || !self.zip_code.is_empty()
    }

    /// True when the parse anchored on real structure. A street name alone
    /// means the whole string fell through the heuristics unrecognized, so it
    /// does not count.
    fn parsed_structure(&self) -> bool {
        !self.street_number.is_empty()
            || !self.street_type.is_empty()
            || !self.city.is_empty()
            || !self.state.is_empty()
            || !self.zip_code.is_empty()
    }
}

/// Lowercases, strips punctuation, collapses whitespace, and rewrites the
/// fixed expansion dictionary to abbreviations. Blank or literal "nan" input
/// (spreadsheet artifact) yields an empty string.
pub fn clean_address(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    let filtered: String = lower
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let mut cleaned = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    for (pattern, abbrev) in ABBREVIATION_RULES.iter() {
        cleaned = pattern.replace_all(&cleaned, *abbrev).into_owned();
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn is_state_token(token: &str) -> bool {
    STATE_ABBREVS.contains(token) || STATE_NAMES.contains_key(token)
}

fn canonical_state(value: &str) -> Option<&'static str> {
    if let Some(abbrev) = STATE_NAMES.get(value) {
        return Some(abbrev);
    }
    STATE_ABBREVS.get(value).copied()
}

/// Best-effort decomposition of a free-text address. Never fails; components
/// the heuristics cannot place stay empty.
pub fn parse_components(raw: &str) -> AddressComponents {
    let cleaned = clean_address(raw);
    let mut components = AddressComponents {
        full_address: cleaned.clone(),
        ..Default::default()
    };
    if cleaned.is_empty() {
        return components;
    }

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();

    // Zip: an exactly-5-digit trailing token.
    if let Some(last) = tokens.last() {
        if last.len() == 5 && is_all_digits(last) {
            components.zip_code = tokens.pop().unwrap_or_default().to_string();
        }
    }

    // State: the (new) trailing token as a two-letter code or full name.
    if let Some(last) = tokens.last() {
        if is_state_token(last) {
            components.state = tokens.pop().unwrap_or_default().to_string();
        }
    }

    // Anchor on the last street-type token so street names that contain one
    // ("e st louis ave") keep the real type and the city stays clean.
    if let Some(type_idx) = tokens.iter().rposition(|t| STREET_TYPES.contains(*t)) {
        components.street_type = tokens[type_idx].to_string();
        let street_segment = &tokens[..type_idx];
        let mut name_tokens: &[&str] = street_segment;
        if let Some(first) = street_segment.first() {
            if is_all_digits(first) {
                components.street_number = first.to_string();
                name_tokens = &street_segment[1..];
            }
        }
        // A repeated street-type token at the end of the segment is noise
        // ("123 main st st" style double entry).
        if let Some((last, rest)) = name_tokens.split_last() {
            if *last == components.street_type {
                name_tokens = rest;
            }
        }
        components.street_name = name_tokens.join(" ");
        components.city = tokens[type_idx + 1..].join(" ");
    } else if !tokens.is_empty() {
        // No street-type anchor: a leading numeric token still reads as the
        // street number, everything else as the street name.
        if is_all_digits(tokens[0]) {
            components.street_number = tokens[0].to_string();
            components.street_name = tokens[1..].join(" ");
        } else {
            components.street_name = tokens.join(" ");
        }
    }

    let mut full_street_parts = Vec::new();
    for part in [
        &components.street_number,
        &components.street_name,
        &components.street_type,
    ] {
        if !part.is_empty() {
            full_street_parts.push(part.as_str());
        }
    }
    components.full_street = full_street_parts.join(" ");
    components
}

/// 1.0 when both spellings belong to the same alias group, otherwise a plain
/// edit-similarity ratio between the raw strings.
pub fn street_type_score(a: &str, b: &str) -> f64 {
    if let (Some(canon_a), Some(canon_b)) = (STREET_TYPE_ALIASES.get(a), STREET_TYPE_ALIASES.get(b))
    {
        if canon_a == canon_b {
            return 1.0;
        }
    }
    normalized_levenshtein(a, b)
}

/// All-or-nothing: 1.0 when literally equal or both resolve to the same US
/// state, else 0.0.
pub fn state_score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    match (canonical_state(a), canonical_state(b)) {
        (Some(canon_a), Some(canon_b)) if canon_a == canon_b => 1.0,
        _ => 0.0,
    }
}

fn rewrite_directionals(name: &str) -> String {
    name.split_whitespace()
        .map(|token| DIRECTIONALS.get(token).copied().unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact match scores 1.0, a purely-directional spelling difference 0.9, and
/// anything else its edit-similarity ratio with a hard cutoff below 0.8.
pub fn street_name_score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if rewrite_directionals(a) == rewrite_directionals(b) {
        return DIRECTIONAL_STREET_NAME_SCORE;
    }
    let ratio = normalized_levenshtein(a, b);
    if ratio >= STREET_NAME_SIMILARITY_CUTOFF {
        ratio
    } else {
        0.0
    }
}

/// Empty/exact rules shared by every component: both absent is neutral, one
/// absent is no evidence, equal strings are a full score. Anything else is
/// delegated to the component's fuzzy scorer, or scored 0.0 for exact-only
/// components.
fn component_score(a: &str, b: &str, fuzzy: Option<fn(&str, &str) -> f64>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 0.5,
        (true, false) | (false, true) => 0.0,
        (false, false) if a == b => 1.0,
        _ => fuzzy.map_or(0.0, |score| score(a, b)),
    }
}

/// Weighted component similarity between two free-text addresses, in [0, 1].
/// Scores at or above `ADDRESS_SIMILARITY_THRESHOLD` are treated as the same
/// physical place by the detection engine.
pub fn address_similarity(addr1: &str, addr2: &str) -> f64 {
    let c1 = parse_components(addr1);
    let c2 = parse_components(addr2);

    if c1.full_address.is_empty() || c2.full_address.is_empty() {
        return 0.0;
    }
    // When either side defeats the component parser entirely, fall back to a
    // whole-string ratio over the cleaned text.
    if !c1.parsed_structure() || !c2.parsed_structure() {
        return normalized_levenshtein(&c1.full_address, &c2.full_address).clamp(0.0, 1.0);
    }

    let mut score = 0.0;
    score += WEIGHT_STREET_NUMBER * component_score(&c1.street_number, &c2.street_number, None);
    score += WEIGHT_STREET_NAME
        * component_score(&c1.street_name, &c2.street_name, Some(street_name_score));
    score += WEIGHT_STREET_TYPE
        * component_score(&c1.street_type, &c2.street_type, Some(street_type_score));
    score += WEIGHT_CITY * component_score(&c1.city, &c2.city, None);
    score += WEIGHT_STATE * component_score(&c1.state, &c2.state, Some(state_score));
    score += WEIGHT_ZIP * component_score(&c1.zip_code, &c2.zip_code, None);

    if !c1.street_number.is_empty()
        && !c2.street_number.is_empty()
        && c1.street_number != c2.street_number
    {
        score *= PENALTY_STREET_NUMBER_MISMATCH;
    }
    if !c1.street_name.is_empty()
        && !c2.street_name.is_empty()
        && street_name_score(&c1.street_name, &c2.street_name) < STREET_NAME_SIMILARITY_CUTOFF
    {
        score *= PENALTY_STREET_NAME_DISSIMILAR;
    }
    if !c1.city.is_empty() && !c2.city.is_empty() && c1.city != c2.city {
        score *= PENALTY_CITY_MISMATCH;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::ADDRESS_SIMILARITY_THRESHOLD;

    #[test]
    fn clean_address_rewrites_expansions_and_strips_punctuation() {
        assert_eq!(
            clean_address("123 Main Street, Springfield, IL"),
            "123 main st springfield il"
        );
        assert_eq!(
            clean_address("  456  North   Oak Avenue "),
            "456 n oak ave"
        );
        assert_eq!(clean_address("789 Northeast Elm Boulevard"), "789 ne elm blvd");
    }

    #[test]
    fn clean_address_handles_degenerate_input() {
        assert_eq!(clean_address(""), "");
        assert_eq!(clean_address("   "), "");
        assert_eq!(clean_address("nan"), "");
        assert_eq!(clean_address("NaN"), "");
    }

    #[test]
    fn parse_extracts_all_six_components() {
        let c = parse_components("123 Main Street, Springfield, IL 62704");
        assert_eq!(c.street_number, "123");
        assert_eq!(c.street_name, "main");
        assert_eq!(c.street_type, "st");
        assert_eq!(c.city, "springfield");
        assert_eq!(c.state, "il");
        assert_eq!(c.zip_code, "62704");
        assert_eq!(c.full_street, "123 main st");
    }

    #[test]
    fn parse_accepts_full_state_names() {
        let c = parse_components("9 Oak Ave Portland Oregon");
        assert_eq!(c.state, "oregon");
        assert_eq!(c.city, "portland");
    }

    #[test]
    fn parse_joins_multi_word_cities() {
        let c = parse_components("77 Sunset Blvd Los Angeles CA 90001");
        assert_eq!(c.city, "los angeles");
        assert_eq!(c.street_name, "sunset");
    }

    #[test]
    fn parse_anchors_on_the_last_street_type_token() {
        let c = parse_components("100 E St Louis Ave Chicago");
        assert_eq!(c.street_number, "100");
        assert_eq!(c.street_name, "e st louis");
        assert_eq!(c.street_type, "ave");
        assert_eq!(c.city, "chicago");
    }

    #[test]
    fn parse_drops_a_doubled_street_type() {
        let c = parse_components("123 Main St St Springfield");
        assert_eq!(c.street_name, "main");
        assert_eq!(c.street_type, "st");
        assert_eq!(c.city, "springfield");
    }

    #[test]
    fn parse_without_street_type_splits_number_and_name() {
        let c = parse_components("1600 Pennsylvania");
        assert_eq!(c.street_number, "1600");
        assert_eq!(c.street_name, "pennsylvania");
        assert_eq!(c.street_type, "");
        assert_eq!(c.city, "");
    }

    #[test]
    fn parse_without_any_anchor_keeps_remainder_as_street_name() {
        let c = parse_components("rural route box twelve");
        assert_eq!(c.street_number, "");
        assert_eq!(c.street_name, "rural route box twelve");
    }

    #[test]
    fn parse_never_panics_on_junk() {
        let c = parse_components("!!! ,,, ###");
        assert!(!c.has_identifiable_components());
    }

    #[test]
    fn street_type_alias_groups_score_full() {
        assert_eq!(street_type_score("street", "st"), 1.0);
        assert_eq!(street_type_score("avenue", "ave"), 1.0);
        assert!(street_type_score("st", "blvd") < 1.0);
    }

    #[test]
    fn state_score_is_all_or_nothing() {
        assert_eq!(state_score("ca", "california"), 1.0);
        assert_eq!(state_score("il", "il"), 1.0);
        assert_eq!(state_score("ca", "co"), 0.0);
        assert_eq!(state_score("ca", "oregon"), 0.0);
    }

    #[test]
    fn street_name_directional_swap_scores_point_nine() {
        assert_eq!(street_name_score("north main", "n main"), 0.9);
        assert_eq!(street_name_score("oak southwest", "oak sw"), 0.9);
    }

    #[test]
    fn street_name_low_similarity_gets_no_partial_credit() {
        assert_eq!(street_name_score("main", "elm"), 0.0);
        // One edit in five characters stays above the cutoff.
        assert!(street_name_score("mains", "main") >= 0.8);
    }

    #[test]
    fn similarity_is_reflexive_for_fully_parseable_addresses() {
        let addr = "123 Main St, Springfield, IL 62704";
        assert_eq!(address_similarity(addr, addr), 1.0);
    }

    #[test]
    fn similarity_tolerates_abbreviation_variants() {
        let score = address_similarity(
            "123 Main St Los Angeles CA 90001",
            "123 Main Street Los Angeles California 90001",
        );
        assert!(score >= 0.95, "score was {score}");
    }

    #[test]
    fn differing_street_numbers_fall_below_half() {
        let score = address_similarity(
            "123 Main St, Springfield, IL",
            "456 Main St, Springfield, IL",
        );
        assert!(score < 0.5, "score was {score}");
        assert!(score < ADDRESS_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn differing_cities_are_penalized() {
        let same_city = address_similarity("123 Main St Springfield IL", "123 Main St Springfield IL");
        let other_city = address_similarity("123 Main St Springfield IL", "123 Main St Chicago IL");
        assert!(other_city < same_city);
        assert!(other_city < ADDRESS_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn unparseable_sides_fall_back_to_whole_string_ratio() {
        let score = address_similarity("general delivery", "general delivery");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn empty_addresses_never_match_anything() {
        assert_eq!(address_similarity("", "123 Main St"), 0.0);
        assert_eq!(address_similarity("", ""), 0.0);
        assert_eq!(address_similarity("nan", "123 Main St"), 0.0);
    }
}
