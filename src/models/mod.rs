//! Data models for the GameDex core.
//!
//! This module contains the structures the rest of the crate is built on:
//! - [`Item`]: a single catalog entry with a stable identity, title, and year
//! - [`FetchState`]: lifecycle status and current data of the remote catalog load
//! - [`FetchAction`]: the closed set of state machine transitions
//! - [`remove_item`]: pure, idempotent identity-based removal
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Pure**: [`FetchState::apply`] is a pure `(state, action) -> state`
//!   function; all mutation goes through [`StateManager`](crate::state::StateManager)
//! - **Cloneable**: state snapshots are cheap to hand to callers without locks
//! - **Immutable**: lists change by replacement, never in-place

pub mod fetch;
pub mod item;

pub use fetch::{FetchAction, FetchPhase, FetchState};
pub use item::{Item, remove_item};
