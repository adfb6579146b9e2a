//! WhatsApp deep links from hand-entered contact cells.
//!
//! Accepted inputs include `6289...`, `+62 89...`, `089...`, `wa.me/6289...`,
//! `https://wa.me/6289...` and `https://api.whatsapp.com/send?phone=6289...`.

use std::sync::LazyLock;

use regex::Regex;

/// Deep-link prefix; the digit run is appended.
const WA_LINK_PREFIX: &str = "https://wa.me/";

/// Indonesian country calling code replacing a local leading zero.
const COUNTRY_CODE: &str = "62";

/// Shorter digit runs are treated as truncated entries.
const MIN_DIGITS: usize = 9;

static WA_ME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)wa\.me/([0-9]+)").expect("valid wa.me pattern"));

static API_SEND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)api\.whatsapp\.com/send\?phone=([0-9]+)").expect("valid api.whatsapp pattern")
});

/// Derive `https://wa.me/<digits>` from a contact cell, or `None` when no usable number is present.
///
/// Digits found in an existing link are taken as they are. Otherwise all
/// non-digits are dropped, a single leading `0` becomes `62`, and runs
/// shorter than nine digits are rejected.
#[must_use]
pub fn whatsapp_link(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(digits) = capture_digits(&WA_ME, raw).or_else(|| capture_digits(&API_SEND, raw)) {
        return Some(format!("{WA_LINK_PREFIX}{digits}"));
    }

    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if let Some(local) = digits.strip_prefix('0') {
        digits = format!("{COUNTRY_CODE}{local}");
    }

    (digits.len() >= MIN_DIGITS).then(|| format!("{WA_LINK_PREFIX}{digits}"))
}

fn capture_digits<'a>(pattern: &Regex, raw: &'a str) -> Option<&'a str> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
