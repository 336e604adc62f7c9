//! Store implementations
//!
//! - `memory` - In-memory store backing every repository trait, plus an
//!   in-memory receiver directory

pub mod memory;

pub use memory::{MemoryReceiverDirectory, MemoryStore};
