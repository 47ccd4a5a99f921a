//! GameDex - searchable, sortable game catalog
//!
//! Headless demo shell for the state core. It initializes:
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (for the simulated catalog fetch)
//! - Durable preferences ([`YamlFileBackend`] under `GameDex Data/`)
//! - State management ([`StateManager`])
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/gamedex.<date>
//! 2. Open `GameDex Data/prefs.yaml` and restore search term + counter
//! 3. Create StateManager and a change-event listener
//! 4. Run one fetch cycle against the simulated catalog source
//! 5. Log the projected view for the restored search term
//! 6. Bump the interaction counter and shut down

use anyhow::Result;
use gamedex::services::CatalogClient;
use gamedex::store::{PersistentValueStore, YamlFileBackend};
use gamedex::{APP_NAME, StateManager, VERSION};

fn main() -> Result<()> {
    let _guard = gamedex::logging::setup_logging("logs", "gamedex", false, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("gamedex-worker")
        .build()?;

    // Preferences survive process restarts; the first observation of each
    // key after load is suppressed so nothing is rewritten at startup
    let backend = YamlFileBackend::open("GameDex Data/prefs.yaml")?;
    let state_manager = StateManager::new(PersistentValueStore::new(Box::new(backend)));

    // Log every state change as it happens
    let mut rx = state_manager.subscribe();
    runtime.spawn(async move {
        while let Ok(change) = rx.recv().await {
            tracing::debug!("State change: {:?}", change);
        }
    });

    let client = CatalogClient::new();
    runtime.block_on(state_manager.run_fetch(client.fetch_catalog()));

    let state = state_manager.snapshot();
    if state.fetch.is_error() {
        tracing::error!("Catalog fetch failed; nothing to show");
    } else {
        let view = state_manager.projected();
        tracing::info!(
            "{} results for {:?} sorted by {}",
            view.len(),
            state.search_term,
            state.sort_key
        );
        for item in &view {
            tracing::info!("  [{}] {} ({})", item.object_id, item.title, item.year_published);
        }
    }

    state_manager.increment_counter();
    tracing::info!(
        "Session interactions so far: {}",
        state_manager.read(|s| s.interaction_count)
    );

    state_manager.metrics().log_summary();
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    Ok(())
}
