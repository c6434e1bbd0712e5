//! Ticket number extraction.
//!
//! A ticket number is any run of exactly 9 ASCII digits. Labelled numbers
//! win over bare ones; no checksum is applied.

use super::patterns::ticket_patterns;

/// Length of a ticket number in digits.
pub const TICKET_NUMBER_LEN: usize = 9;

/// Extract the ticket number from page text.
///
/// Labels are tried in order (`biljettnummer`, `biljett`, `nummer`), then a
/// standalone 9-digit token anywhere in the text. The first hit wins.
pub fn extract_ticket_number(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    ticket_patterns()
        .into_iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Whether `value` has the shape of a ticket number.
pub fn is_ticket_number(value: &str) -> bool {
    value.len() == TICKET_NUMBER_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
