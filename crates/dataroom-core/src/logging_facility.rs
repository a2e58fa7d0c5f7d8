//! Structured logging for engine operations
//!
//! - [`init`] installs a subscriber for a [`Profile`]; front ends call it once
//! - `log_op_*!` macros emit events keyed by the canonical field names in
//!   `dataroom_core_types::schema`
//! - [`init_test_capture`] records events in memory for assertions
//!
//! ```rust
//! use dataroom_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
