//! Scope a unit of work to exactly one database connection.
//!
//! A [`ConnectionScope`] either borrows a connection from the caller or leases
//! one from a [`Driver`], runs the [`Work`] once against it and, for leased
//! connections, releases it whatever the outcome.
pub use tether_core::*;
