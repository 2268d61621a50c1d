// src/matching/phone.rs - Canonical phone form used for exact comparison

/// Canonicalizes a free-text phone number to an 11-digit string with a
/// leading '1' country digit. Returns an empty string for anything that
/// cannot be normalized; never panics.
///
/// Spreadsheet exports routinely coerce phone columns to floats
/// ("2065044242.0"), so values containing a decimal point are parsed as a
/// float and truncated before digit extraction.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return String::new();
    }

    let mut digits: String = if trimmed.contains('.') {
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => {
                (value.trunc() as u64).to_string()
            }
            _ => trimmed.chars().filter(|c| c.is_ascii_digit()).collect(),
        }
    } else {
        trimmed.chars().filter(|c| c.is_ascii_digit()).collect()
    };

    if digits.len() == 10 {
        digits.insert(0, '1');
    } else if digits.len() == 11 && digits.starts_with('1') {
        // Already canonical.
    } else if digits.len() > 11 {
        digits = digits[digits.len() - 11..].to_string();
    } else {
        return String::new();
    }

    if digits.len() == 11 {
        digits
    } else {
        String::new()
    }
}

/// Two numbers are the same line iff both normalize to the same non-empty
/// canonical form.
pub fn phones_match(a: &str, b: &str) -> bool {
    let norm_a = normalize_phone(a);
    !norm_a.is_empty() && norm_a == normalize_phone(b)
}
