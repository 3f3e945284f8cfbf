//! # Contracts
//!
//! Frozen interface contracts for the metrics pipeline, defining the data
//! structures and traits shared between crates. All business crates depend
//! only on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Points carry a UTC timestamp assigned at submission time
//! - Ordering inside a batch is insertion order, never timestamp order

mod backend;
mod config;
mod error;
mod monitor;
mod point;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use monitor::*;
pub use point::*;
