//! Output rendering for record tables.

mod csv;
mod json;

pub use csv::to_csv;
pub use json::{to_json, JsonFormat};
