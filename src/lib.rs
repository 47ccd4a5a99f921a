// GameDex - searchable, sortable game catalog core
//
// This is the library crate containing the state machine, projection, and
// preference store. The binary crate (main.rs) provides a headless demo
// shell; any rendering layer consumes the same StateManager surface.

pub mod logging;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod services;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use models::{FetchAction, FetchPhase, FetchState, Item, remove_item};
pub use projection::{SortKey, project};
pub use state::{SessionState, StateChange, StateManager};
pub use store::{KeyValueBackend, MemoryBackend, PersistentValueStore, YamlFileBackend};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
