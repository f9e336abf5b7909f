//! Locale-aware parsing of numeric text fields.
//!
//! A decimal comma and a decimal point are both accepted, but never
//! together: "1.234,5" could be a thousands separator or a typo, so any
//! text with more than one separator is rejected.

/// Split an optional sign from the rest of the text.
fn strip_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Parse strictly; `None` for empty or rejected text.
fn parse_strict(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, body) = strip_sign(trimmed);
    let separators = body.chars().filter(|c| *c == ',' || *c == '.').count();
    if separators > 1 {
        return None;
    }
    if !body.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }
    if !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (int_part, frac_part) = match body.find([',', '.']) {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };
    let canonical = format!(
        "{}.{}",
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part }
    );

    let value: f64 = canonical.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse a number typed with a decimal comma or point.
///
/// Empty, ambiguous or malformed text yields 0. `"0,"` (mid-typing) yields
/// the integer part.
pub fn parse_locale_number(text: &str) -> f64 {
    parse_strict(text).unwrap_or(0.0)
}

/// Like [`parse_locale_number`], but `None` for empty or rejected text.
///
/// For optional fields where "no value" must stay distinct from 0.
pub fn parse_optional_number(text: &str) -> Option<f64> {
    parse_strict(text)
}

/// Whether `text` is a valid, possibly incomplete, number while typing.
///
/// Pattern: one or more digits, optionally followed by a single decimal
/// separator and zero or more digits. The empty string is accepted so a
/// field can be cleared.
pub fn is_partial_valid_input(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }

    let int_len = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if int_len == 0 {
        return false;
    }

    let mut rest = text[int_len..].chars();
    match rest.next() {
        None => true,
        Some(',') | Some('.') => rest.all(|c| c.is_ascii_digit()),
        Some(_) => false,
    }
}
