use regex::Regex;
use std::sync::OnceLock;

/// Text shown for a select field with no real choice made.
pub const PLACEHOLDER: &str = "--Select--";

fn int_re() -> &'static Regex {
    static INT_RE: OnceLock<Regex> = OnceLock::new();
    INT_RE.get_or_init(|| Regex::new(r"^-?[0-9]+$").unwrap())
}

pub fn is_placeholder(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || t == PLACEHOLDER
}

/// Integer-format check: optional sign, digits only, and representable as i64.
pub fn check_valid_int(raw: &str) -> bool {
    let t = raw.trim();
    int_re().is_match(t) && t.parse::<i64>().is_ok()
}

pub fn check_valid_string(raw: &str) -> bool {
    !raw.trim().is_empty()
}

pub fn parse_session_id(raw: &str) -> Option<i64> {
    if is_placeholder(raw) || !check_valid_int(raw) {
        return None;
    }
    raw.trim().parse::<i64>().ok()
}
