//! I/O module
//!
//! Handles fixture loading and CSV output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, page serialization)
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `fixtures` - Loading a fixture directory into domain values

pub mod async_reader;
pub mod csv_format;
pub mod fixtures;

pub use async_reader::AsyncReader;
pub use csv_format::write_payments_csv;
pub use fixtures::Fixtures;
