//! Services module - external collaborators of the state core.
//!
//! The only collaborator the core requires from its environment besides the
//! durable key-value capability is the fetch: an async operation with no
//! input that resolves exactly once, either with an item list or a failure
//! signal. [`CatalogClient`] is the shipped implementation, a simulated
//! remote source with a configurable delay.
//!
//! # Design Philosophy
//!
//! - **Framework-agnostic**: no UI code, only data
//! - **Async**: resolution re-enters the core through the same dispatch path
//!   as synchronous actions
//! - **Testable**: delay and failure mode are explicit constructor choices

pub mod fetch;

pub use fetch::{CatalogClient, FetchError, sample_catalog};
