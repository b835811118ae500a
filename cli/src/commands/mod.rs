//! Subcommand handlers
//!
//! Handlers return `Ok(true)` on success, `Ok(false)` when the command ran
//! but the answer is negative (an invalid value, say), and `Err` when the
//! command itself could not run.

pub mod cart;
pub mod simulate;
pub mod tools;
