//! Core types and trait definitions for dining notice coordination.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It holds
//! the order entity, its status machine, and the seams every terminal and
//! store adapter plugs into.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod code;
pub mod error;
pub mod notify;
pub mod order;
pub mod status;
pub mod store;
pub mod transition;

pub use error::{Error, Result};
