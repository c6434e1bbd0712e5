//! Regex patterns for Parkster receipt pages.
//!
//! Every pattern is case-insensitive; receipts are matched against the raw
//! page text without normalising it first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Ticket numbers, most specific label first
    pub static ref TICKET_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)biljettnummer[:\s]*([0-9]{9})"
    ).unwrap();

    pub static ref TICKET_LABELED: Regex = Regex::new(
        r"(?i)biljett[:\s]*([0-9]{9})"
    ).unwrap();

    pub static ref NUMBER_LABELED: Regex = Regex::new(
        r"(?i)nummer[:\s]*([0-9]{9})"
    ).unwrap();

    pub static ref TICKET_STANDALONE: Regex = Regex::new(
        r"\b([0-9]{9})\b"
    ).unwrap();

    // Gross amounts (Swedish format: 45,50 kr or 45.50 SEK)
    pub static ref GROSS_WITH_CURRENCY: Regex = Regex::new(
        r"(?i)brutto[:\s]*([0-9]+[,.]?[0-9]*)\s*kr?"
    ).unwrap();

    pub static ref AMOUNT_KR: Regex = Regex::new(
        r"(?i)([0-9]+[,.]?[0-9]*)\s*kr"
    ).unwrap();

    pub static ref AMOUNT_SEK: Regex = Regex::new(
        r"(?i)([0-9]+[,.]?[0-9]*)\s*sek"
    ).unwrap();

    pub static ref GROSS_BARE: Regex = Regex::new(
        r"(?i)brutto[:\s]*([0-9]+[,.]?[0-9]*)"
    ).unwrap();

    // ISO-like dates, structure only
    pub static ref DATE_YMD: Regex = Regex::new(
        r"([0-9]{4}-[0-9]{2}-[0-9]{2})"
    ).unwrap();
}

/// Ticket-number patterns in the order they are tried.
pub fn ticket_patterns() -> [&'static Regex; 4] {
    [
        &*TICKET_NUMBER_LABELED,
        &*TICKET_LABELED,
        &*NUMBER_LABELED,
        &*TICKET_STANDALONE,
    ]
}

/// Amount patterns in the order they are tried.
pub fn amount_patterns() -> [&'static Regex; 4] {
    [&*GROSS_WITH_CURRENCY, &*AMOUNT_KR, &*AMOUNT_SEK, &*GROSS_BARE]
}
