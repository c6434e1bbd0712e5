//! Plain text summary of a processing result.

mod summary;

pub use summary::{render_summary, write_summary};
