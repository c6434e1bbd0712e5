//! Rule-based field extractors for parking receipt pages.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod ticket;

pub use amounts::{format_currency, parse_amount, parse_swedish_number, CURRENCY_SUFFIX};
pub use dates::extract_date;
pub use ticket::{extract_ticket_number, is_ticket_number, TICKET_NUMBER_LEN};
