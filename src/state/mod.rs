// State management module
//
// This module provides the StateManager which wraps the session state with
// thread-safe access using Arc<RwLock<T>> and emits change events for
// consumers such as a UI layer.

use crate::metrics::Metrics;
use crate::models::{FetchAction, FetchPhase, FetchState, Item};
use crate::projection::{SortKey, project};
use crate::services::FetchError;
use crate::store::PersistentValueStore;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;

/// Durable key for the search term preference.
pub const SEARCH_TERM_KEY: &str = "search";

/// Durable key for the interaction counter.
pub const COUNTER_KEY: &str = "count";

/// Change events emitted when session state is modified.
///
/// These events notify interested parties (primarily a rendering layer)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A catalog fetch has entered the Loading phase
    FetchStarted,

    /// A catalog fetch resolved with data
    FetchSucceeded { count: usize },

    /// A catalog fetch rejected
    FetchFailed,

    /// An item was removed by identity
    ItemRemoved { object_id: u64 },

    /// The search term preference changed
    SearchTermChanged { term: String },

    /// The sort key changed
    SortKeyChanged { sort_key: SortKey },

    /// The interaction counter changed
    CounterChanged { count: u64 },
}

/// Everything the caller boundary exposes: the fetch lifecycle, the current
/// preferences, and the interaction counter.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub fetch: FetchState,
    pub search_term: String,
    pub sort_key: SortKey,
    pub interaction_count: u64,
}

/// Thread-safe state manager with event emission.
///
/// This is the central component that:
/// - Provides thread-safe access to [`SessionState`] via `Arc<RwLock<T>>`
/// - Applies fetch actions through the pure reducer, strictly in dispatch order
/// - Mirrors preference changes into the [`PersistentValueStore`]
/// - Detects state changes and emits [`StateChange`] events
/// - Drops stale fetch resolutions via a generation counter
///
/// # Usage
///
/// The public operations are the only mutation paths:
/// [`dispatch()`](Self::dispatch), [`change_search_term()`](Self::change_search_term),
/// [`change_sort_key()`](Self::change_sort_key), [`remove_item()`](Self::remove_item),
/// [`increment_counter()`](Self::increment_counter), and the fetch drivers.
/// Use [`read()`](Self::read) or [`snapshot()`](Self::snapshot) for reads and
/// [`subscribe()`](Self::subscribe) to listen for changes.
pub struct StateManager {
    /// The session state protected by RwLock for thread-safe access
    state: Arc<RwLock<SessionState>>,

    /// Durable preference store, single writer per key
    store: Arc<Mutex<PersistentValueStore>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    /// Generation counter for in-flight fetches; resolutions carrying an
    /// older epoch are dropped instead of overwriting newer state
    fetch_epoch: Arc<AtomicU64>,

    /// Runtime counters
    metrics: Arc<Metrics>,
}

impl StateManager {
    /// Create a StateManager over a durable preference store.
    ///
    /// Loads the persisted search term and interaction counter, then performs
    /// the initial observation of each key so the just-loaded values are not
    /// immediately rewritten (the store suppresses those first writes).
    pub fn new(mut store: PersistentValueStore) -> Self {
        let search_term = store.load(SEARCH_TERM_KEY, "");
        let interaction_count: u64 = store.load(COUNTER_KEY, "0").parse().unwrap_or(0);

        let metrics = Arc::new(Metrics::new());
        for (key, value) in [
            (SEARCH_TERM_KEY, search_term.clone()),
            (COUNTER_KEY, interaction_count.to_string()),
        ] {
            match store.write(key, &value) {
                Ok(persisted) => metrics.record_store_write(persisted),
                Err(e) => tracing::warn!("Initial observation of {:?} failed: {:#}", key, e),
            }
        }

        tracing::info!(
            "Session restored: search_term={:?}, interaction_count={}",
            search_term,
            interaction_count
        );

        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(SessionState {
                fetch: FetchState::default(),
                search_term,
                sort_key: SortKey::default(),
                interaction_count,
            })),
            store: Arc::new(Mutex::new(store)),
            state_tx,
            fetch_epoch: Arc::new(AtomicU64::new(0)),
            metrics,
        }
    }

    /// Get a read-only snapshot of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Subscribe to state change events.
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Apply an update under the write lock and emit change events.
    ///
    /// The write lock serializes all mutations, so updates apply strictly in
    /// call order; no two are merged or reordered.
    fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);
        self.metrics.record_state_update();

        let changes = detect_changes(&old_state, &state);
        for change in &changes {
            // A send error just means nobody is listening right now
            match self.state_tx.send(change.clone()) {
                Ok(_) => self.metrics.record_broadcast(),
                Err(_) => self.metrics.record_broadcast_error(),
            }
        }

        changes
    }

    /// Apply a fetch action through the pure reducer.
    ///
    /// This is the only mutation path for fetch state.
    pub fn dispatch(&self, action: FetchAction) -> Vec<StateChange> {
        self.update(|state| state.fetch = state.fetch.apply(&action))
    }

    /// Remove one item from the fetched data by identity.
    ///
    /// Idempotent: removing an absent id changes nothing and emits nothing.
    pub fn remove_item(&self, object_id: u64) -> Vec<StateChange> {
        self.dispatch(FetchAction::RemoveItem(object_id))
    }

    /// Change the search term and mirror it into the durable store.
    ///
    /// Re-asserting the current term is a no-op: nothing is emitted and
    /// nothing is written.
    pub fn change_search_term(&self, term: impl Into<String>) -> Vec<StateChange> {
        let term = term.into();
        let changes = self.update(|state| state.search_term = term.clone());
        if changes
            .iter()
            .any(|c| matches!(c, StateChange::SearchTermChanged { .. }))
        {
            self.persist(SEARCH_TERM_KEY, &term);
        }
        changes
    }

    /// Change the sort key. Session-only; not persisted.
    pub fn change_sort_key(&self, sort_key: SortKey) -> Vec<StateChange> {
        self.update(|state| state.sort_key = sort_key)
    }

    /// Bump the interaction counter and mirror it into the durable store.
    pub fn increment_counter(&self) -> Vec<StateChange> {
        let changes = self.update(|state| state.interaction_count += 1);
        let count = self.read(|state| state.interaction_count);
        self.persist(COUNTER_KEY, &count.to_string());
        changes
    }

    /// Begin a fetch cycle: bump the epoch and enter Loading.
    ///
    /// The returned epoch must be handed back to
    /// [`complete_fetch`](Self::complete_fetch) with the resolution.
    pub fn begin_fetch(&self) -> u64 {
        let epoch = self.fetch_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.metrics.record_fetch_started();
        self.dispatch(FetchAction::FetchStart);
        epoch
    }

    /// Resolve a fetch begun at `epoch`.
    ///
    /// A resolution from a superseded fetch is dropped so it cannot overwrite
    /// state set by a newer one.
    pub fn complete_fetch(
        &self,
        epoch: u64,
        result: Result<Vec<Item>, FetchError>,
    ) -> Vec<StateChange> {
        if self.fetch_epoch.load(Ordering::SeqCst) != epoch {
            tracing::warn!("Dropping stale fetch resolution for epoch {}", epoch);
            self.metrics.record_stale_resolution();
            return Vec::new();
        }

        match result {
            Ok(items) => {
                self.metrics.record_fetch_succeeded();
                self.dispatch(FetchAction::FetchSuccess(items))
            }
            Err(e) => {
                tracing::warn!("Catalog fetch failed: {}", e);
                self.metrics.record_fetch_failed();
                self.dispatch(FetchAction::FetchFailure)
            }
        }
    }

    /// Drive one full fetch cycle against a fetch collaborator.
    ///
    /// Control returns to the caller's executor while the fetch is
    /// outstanding; the resolution re-enters through the same serialized
    /// dispatch path as synchronous actions.
    pub async fn run_fetch<F>(&self, fetch: F) -> Vec<StateChange>
    where
        F: Future<Output = Result<Vec<Item>, FetchError>>,
    {
        let epoch = self.begin_fetch();
        let result = fetch.await;
        self.complete_fetch(epoch, result)
    }

    /// The filtered and sorted view derived from current data and preferences.
    pub fn projected(&self) -> Vec<Item> {
        let state = self.state.read().unwrap();
        project(&state.fetch.data, &state.search_term, state.sort_key)
    }

    fn persist(&self, key: &str, value: &str) {
        let mut store = self.store.lock().unwrap();
        match store.write(key, value) {
            Ok(persisted) => self.metrics.record_store_write(persisted),
            Err(e) => tracing::warn!("Failed to persist {:?}: {:#}", key, e),
        }
    }
}

impl Default for StateManager {
    /// A manager over an ephemeral in-memory store.
    fn default() -> Self {
        Self::new(PersistentValueStore::new(Box::new(
            crate::store::MemoryBackend::new(),
        )))
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            state_tx: self.state_tx.clone(),
            fetch_epoch: Arc::clone(&self.fetch_epoch),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Diff two states and generate the events to emit.
fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<StateChange> {
    let mut changes = Vec::new();

    if old.fetch.phase != new.fetch.phase {
        match new.fetch.phase {
            FetchPhase::Loading => changes.push(StateChange::FetchStarted),
            FetchPhase::Succeeded => changes.push(StateChange::FetchSucceeded {
                count: new.fetch.data.len(),
            }),
            FetchPhase::Failed => changes.push(StateChange::FetchFailed),
            FetchPhase::Idle => {}
        }
    } else if old.fetch.data != new.fetch.data {
        // Same phase, different data: an identity-based removal
        for item in &old.fetch.data {
            if !new
                .fetch
                .data
                .iter()
                .any(|kept| kept.object_id == item.object_id)
            {
                changes.push(StateChange::ItemRemoved {
                    object_id: item.object_id,
                });
            }
        }
    }

    if old.search_term != new.search_term {
        changes.push(StateChange::SearchTermChanged {
            term: new.search_term.clone(),
        });
    }

    if old.sort_key != new.sort_key {
        changes.push(StateChange::SortKeyChanged {
            sort_key: new.sort_key,
        });
    }

    if old.interaction_count != new.interaction_count {
        changes.push(StateChange::CounterChanged {
            count: new.interaction_count,
        });
    }

    changes
}
