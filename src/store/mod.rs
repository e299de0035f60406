//! The dashboard cache store: a per-team, lazily-populated resource cache
//! over the administrative API.
//!
//! One store instance holds everything the dashboard renders for a team:
//! the project list, the AuthConfig list, and per-parent slices of app
//! clients and providers. Child slices are fetched lazily the first time a
//! consumer asks for them; eagerly walking the whole tree would be
//! O(configs x clients x providers) requests against an unpredictable
//! fan-out. Concurrent requests for the same slice are deduplicated so at
//! most one wire request per cache key is outstanding at any time.
//!
//! Mutations never patch cached state in place. After any create, update,
//! or delete, call [`DashboardStore::invalidate_and_refetch`]: it clears
//! the whole cache and re-runs the team bootstrap, so no stale view can
//! survive a write regardless of which screen performed it.
//!
//! Selectors are synchronous and side-effect-free; calling one before the
//! matching loader has ever run returns an empty default, never an error.
//! [`DashboardStore::subscribe`] yields a revision counter that ticks on
//! every state change, for binding selector reads to a rendered view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tokio::sync::{broadcast, watch};

use crate::admin::{AdminApi, AppClient, AuthConfig, Project, Provider};
use crate::error::Error;

/// One cache key per deduplicated request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RequestKey {
    /// The eager team-scope load of projects and AuthConfigs
    Bootstrap,
    /// App clients of one AuthConfig
    AppClients(String),
    /// Providers of one app client, scoped by its AuthConfig
    Providers(String, String),
}

/// What a settled request tells the callers that attached to it.
#[derive(Debug, Clone)]
enum LoadOutcome {
    Success,
    Failure(StoredError),
}

/// A recorded failure for one cache key.
///
/// The unauthorized flag survives so replays of the stored error keep the
/// distinction the consuming application needs to end the session instead
/// of offering a retry.
#[derive(Debug, Clone)]
struct StoredError {
    message: String,
    unauthorized: bool,
}

impl StoredError {
    fn from_error(error: &Error) -> Self {
        Self {
            message: error.to_string(),
            unauthorized: error.is_unauthorized(),
        }
    }

    fn to_error(&self, bootstrap: bool) -> Error {
        if self.unauthorized {
            Error::unauthorized(self.message.clone())
        } else if bootstrap {
            Error::bootstrap(self.message.clone())
        } else {
            Error::general(self.message.clone())
        }
    }
}

/// One child collection in the cache.
///
/// `loaded` is the freshness marker, separate from `items` so a failed
/// reload can record its error while the previous data stays visible.
#[derive(Debug, Clone)]
struct Slice<T> {
    items: Vec<T>,
    loaded: bool,
    error: Option<StoredError>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
        }
    }
}

/// The payload a settled fetch wants to write into the cache.
enum Payload {
    Bootstrap(Vec<Project>, Vec<AuthConfig>),
    AppClients(String, Vec<AppClient>),
    Providers(String, String, Vec<Provider>),
}

#[derive(Default)]
struct StoreState {
    projects: Vec<Project>,
    auth_configs: Vec<AuthConfig>,
    app_clients: HashMap<String, Slice<AppClient>>,
    providers: HashMap<(String, String), Slice<Provider>>,
    bootstrapping: bool,
    bootstrapped: bool,
    bootstrap_error: Option<StoredError>,
    /// Invalidation fence: a settled request only writes the cache if the
    /// generation it started under is still current.
    generation: u64,
    /// Ticks on every state change; mirrored into the watch channel.
    revision: u64,
    /// De-duplication ledger: key -> (generation, settlement channel).
    in_flight: HashMap<RequestKey, (u64, broadcast::Sender<LoadOutcome>)>,
}

/// Per-team resource cache over the administrative API.
///
/// Cloning is cheap and every clone observes the same cache; hand a clone
/// to each consumer rather than sharing one reference.
#[derive(Clone)]
pub struct DashboardStore {
    admin: AdminApi,
    team_id: String,
    state: Arc<Mutex<StoreState>>,
    change: Arc<watch::Sender<u64>>,
}

impl DashboardStore {
    pub(crate) fn new(admin: AdminApi, team_id: &str) -> Self {
        let (change, _) = watch::channel(0);
        Self {
            admin,
            team_id: team_id.to_string(),
            state: Arc::new(Mutex::new(StoreState::default())),
            change: Arc::new(change),
        }
    }

    /// The team this store is scoped to
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Watch the store's revision counter; it ticks on every state change.
    ///
    /// Consumers re-run their selector reads when the value changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.change.subscribe()
    }

    // ---- Selectors ------------------------------------------------------

    /// The cached project list for the team
    pub fn projects(&self) -> Vec<Project> {
        self.state.lock().unwrap().projects.clone()
    }

    /// The cached AuthConfig list for the team
    pub fn auth_configs(&self) -> Vec<AuthConfig> {
        self.state.lock().unwrap().auth_configs.clone()
    }

    /// One cached AuthConfig by id
    pub fn auth_config(&self, config_id: &str) -> Option<AuthConfig> {
        self.state
            .lock()
            .unwrap()
            .auth_configs
            .iter()
            .find(|config| config.id == config_id)
            .cloned()
    }

    /// The cached app clients of an AuthConfig; empty if never loaded
    pub fn app_clients(&self, config_id: &str) -> Vec<AppClient> {
        self.state
            .lock()
            .unwrap()
            .app_clients
            .get(config_id)
            .map(|slice| slice.items.clone())
            .unwrap_or_default()
    }

    /// One cached app client by id, in its AuthConfig's scope
    pub fn app_client(&self, config_id: &str, client_id: &str) -> Option<AppClient> {
        self.state
            .lock()
            .unwrap()
            .app_clients
            .get(config_id)
            .and_then(|slice| slice.items.iter().find(|client| client.id == client_id))
            .cloned()
    }

    /// The last app-client load failure for an AuthConfig, if any
    pub fn app_clients_error(&self, config_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .app_clients
            .get(config_id)
            .and_then(|slice| slice.error.as_ref().map(|err| err.message.clone()))
    }

    /// The cached providers of an app client; empty if never loaded
    pub fn providers(&self, config_id: &str, client_id: &str) -> Vec<Provider> {
        self.state
            .lock()
            .unwrap()
            .providers
            .get(&(config_id.to_string(), client_id.to_string()))
            .map(|slice| slice.items.clone())
            .unwrap_or_default()
    }

    /// The last provider load failure for an app client, if any
    pub fn providers_error(&self, config_id: &str, client_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .providers
            .get(&(config_id.to_string(), client_id.to_string()))
            .and_then(|slice| slice.error.as_ref().map(|err| err.message.clone()))
    }

    /// Whether the initial team-scope load is still in flight
    pub fn is_bootstrapping(&self) -> bool {
        self.state.lock().unwrap().bootstrapping
    }

    /// The last bootstrap failure, if any
    pub fn error(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .bootstrap_error
            .as_ref()
            .map(|err| err.message.clone())
    }

    // ---- Loaders --------------------------------------------------------

    /// Run the eager team-scope load of projects and AuthConfigs.
    ///
    /// A no-op once bootstrapped; concurrent calls share one request. App
    /// clients and providers are deliberately not part of bootstrap.
    pub async fn bootstrap(&self) -> Result<(), Error> {
        self.load(RequestKey::Bootstrap).await
    }

    /// Load the app clients of an AuthConfig if they are not cached yet.
    ///
    /// A no-op when the slice is already loaded; if the last attempt failed,
    /// returns the stored error without a new request (clear the key first
    /// to retry). Concurrent calls for the same config share one request.
    pub async fn fetch_app_clients(&self, config_id: &str) -> Result<(), Error> {
        self.load(RequestKey::AppClients(config_id.to_string())).await
    }

    /// Load the providers of an app client if they are not cached yet.
    ///
    /// Same contract as [`DashboardStore::fetch_app_clients`].
    pub async fn fetch_providers(&self, config_id: &str, client_id: &str) -> Result<(), Error> {
        self.load(RequestKey::Providers(
            config_id.to_string(),
            client_id.to_string(),
        ))
        .await
    }

    /// Drop one provider key's freshness marker and error so the next
    /// [`DashboardStore::fetch_providers`] is a fresh attempt.
    ///
    /// Cached items for the key are kept visible; sibling keys are
    /// untouched. This is the designed retry path after a failure.
    pub fn clear_providers_for_retry(&self, config_id: &str, client_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(slice) = state
            .providers
            .get_mut(&(config_id.to_string(), client_id.to_string()))
        {
            slice.loaded = false;
            slice.error = None;
        }
        let revision = Self::bump(&mut state);
        drop(state);
        let _ = self.change.send(revision);
    }

    /// Drop one AuthConfig key's freshness marker and error so the next
    /// [`DashboardStore::fetch_app_clients`] is a fresh attempt.
    pub fn clear_app_clients_for_retry(&self, config_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(slice) = state.app_clients.get_mut(config_id) {
            slice.loaded = false;
            slice.error = None;
        }
        let revision = Self::bump(&mut state);
        drop(state);
        let _ = self.change.send(revision);
    }

    /// Clear the entire cache and re-run bootstrap.
    ///
    /// The mutation-consistency primitive: every create/update/delete
    /// anywhere in the dashboard calls this afterwards instead of patching
    /// cached entities in place. Lazily loaded child slices lose their
    /// freshness markers, so consumers re-request them on demand. Requests
    /// still in flight when the invalidation starts settle against a
    /// superseded generation and their responses are discarded.
    pub async fn invalidate_and_refetch(&self) -> Result<(), Error> {
        let revision = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.projects.clear();
            state.auth_configs.clear();
            state.app_clients.clear();
            state.providers.clear();
            state.bootstrapped = false;
            state.bootstrap_error = None;
            state.bootstrapping = true;
            state.in_flight.clear();
            debug!(
                "store invalidated for team {}, generation {}",
                self.team_id, state.generation
            );
            Self::bump(&mut state)
        };
        let _ = self.change.send(revision);
        self.load(RequestKey::Bootstrap).await
    }

    // ---- Internals ------------------------------------------------------

    fn bump(state: &mut StoreState) -> u64 {
        state.revision += 1;
        state.revision
    }

    /// The fast path: a settled answer the cache can give without a request.
    fn settled(state: &StoreState, key: &RequestKey) -> Option<Result<(), Error>> {
        match key {
            RequestKey::Bootstrap => {
                if let Some(err) = &state.bootstrap_error {
                    return Some(Err(err.to_error(true)));
                }
                if state.bootstrapped {
                    return Some(Ok(()));
                }
            }
            RequestKey::AppClients(config_id) => {
                if let Some(slice) = state.app_clients.get(config_id) {
                    if let Some(err) = &slice.error {
                        return Some(Err(err.to_error(false)));
                    }
                    if slice.loaded {
                        return Some(Ok(()));
                    }
                }
            }
            RequestKey::Providers(config_id, client_id) => {
                if let Some(slice) = state
                    .providers
                    .get(&(config_id.clone(), client_id.clone()))
                {
                    if let Some(err) = &slice.error {
                        return Some(Err(err.to_error(false)));
                    }
                    if slice.loaded {
                        return Some(Ok(()));
                    }
                }
            }
        }
        None
    }

    /// Load one cache key: settled fast path, attach to an in-flight
    /// request, or register a detached fetch task and await its settlement.
    ///
    /// The wire request always runs on its own task, so a caller that stops
    /// awaiting (a component unmounting mid-fetch) does not cancel it: the
    /// fetch still completes and still writes the cache for any other
    /// consumer of the same key.
    async fn load(&self, key: RequestKey) -> Result<(), Error> {
        let (mut rx, spawn, notify_revision) = {
            let mut state = self.state.lock().unwrap();

            if let Some(result) = Self::settled(&state, &key) {
                debug!("cache hit for {:?}", key);
                return result;
            }

            if let Some((_, tx)) = state.in_flight.get(&key) {
                debug!("attaching to in-flight request for {:?}", key);
                (tx.subscribe(), None, None)
            } else {
                let (tx, rx) = broadcast::channel(1);
                let generation = state.generation;
                state.in_flight.insert(key.clone(), (generation, tx.clone()));

                let notify_revision = if matches!(key, RequestKey::Bootstrap) {
                    state.bootstrapping = true;
                    Some(Self::bump(&mut state))
                } else {
                    None
                };

                (rx, Some((generation, tx)), notify_revision)
            }
        };
        if let Some((generation, tx)) = spawn {
            let store = self.clone();
            let fetch_key = key.clone();
            tokio::spawn(async move {
                store.run_fetch(fetch_key, generation, tx).await;
            });
        }
        if let Some(revision) = notify_revision {
            let _ = self.change.send(revision);
        }

        match rx.recv().await {
            Ok(LoadOutcome::Success) => Ok(()),
            Ok(LoadOutcome::Failure(err)) => {
                Err(err.to_error(matches!(key, RequestKey::Bootstrap)))
            }
            Err(_) => Err(Error::general("request abandoned before completion")),
        }
    }

    /// Perform one registered fetch and settle its cache key.
    ///
    /// Runs detached from every caller; the send at the end fails only when
    /// no caller is awaiting anymore, and the cache is written either way.
    async fn run_fetch(
        self,
        key: RequestKey,
        generation: u64,
        tx: broadcast::Sender<LoadOutcome>,
    ) {
        debug!("fetching {:?} (generation {})", key, generation);
        let result = self.perform(&key).await;

        let (outcome, revision) = {
            let mut state = self.state.lock().unwrap();

            // Only the entry this request registered may be removed; a
            // newer generation may have re-registered the same key.
            let owns_entry = matches!(
                state.in_flight.get(&key),
                Some((entry_generation, _)) if *entry_generation == generation
            );
            if owns_entry {
                state.in_flight.remove(&key);
            }

            let outcome = match &result {
                Ok(_) => LoadOutcome::Success,
                Err(error) => LoadOutcome::Failure(StoredError::from_error(error)),
            };

            if state.generation != generation {
                warn!(
                    "discarding response for {:?}: generation {} superseded by {}",
                    key, generation, state.generation
                );
                (outcome, None)
            } else {
                match result {
                    Ok(ref payload) => Self::commit_success(&mut state, payload),
                    Err(ref error) => {
                        warn!("load failed for {:?}: {}", key, error);
                        Self::commit_failure(&mut state, &key, StoredError::from_error(error));
                    }
                }
                (outcome, Some(Self::bump(&mut state)))
            }
        };

        let _ = tx.send(outcome);
        if let Some(revision) = revision {
            let _ = self.change.send(revision);
        }
    }

    /// Issue the wire request for one cache key. No lock is held here.
    async fn perform(&self, key: &RequestKey) -> Result<Payload, Error> {
        match key {
            RequestKey::Bootstrap => {
                let (projects, auth_configs) = tokio::try_join!(
                    self.admin.list_projects(&self.team_id),
                    self.admin.list_auth_configs(&self.team_id),
                )?;
                Ok(Payload::Bootstrap(projects, auth_configs))
            }
            RequestKey::AppClients(config_id) => {
                let clients = self.admin.list_app_clients(config_id).await?;
                Ok(Payload::AppClients(config_id.clone(), clients))
            }
            RequestKey::Providers(config_id, client_id) => {
                let providers = self.admin.list_providers(config_id, client_id).await?;
                Ok(Payload::Providers(
                    config_id.clone(),
                    client_id.clone(),
                    providers,
                ))
            }
        }
    }

    /// Replace the payload's slice wholesale and clear its error.
    fn commit_success(state: &mut StoreState, payload: &Payload) {
        match payload {
            Payload::Bootstrap(projects, auth_configs) => {
                state.projects = projects.clone();
                state.auth_configs = auth_configs.clone();
                state.bootstrapping = false;
                state.bootstrapped = true;
                state.bootstrap_error = None;
            }
            Payload::AppClients(config_id, clients) => {
                state.app_clients.insert(
                    config_id.clone(),
                    Slice {
                        items: clients.clone(),
                        loaded: true,
                        error: None,
                    },
                );
            }
            Payload::Providers(config_id, client_id, providers) => {
                state.providers.insert(
                    (config_id.clone(), client_id.clone()),
                    Slice {
                        items: providers.clone(),
                        loaded: true,
                        error: None,
                    },
                );
            }
        }
    }

    /// Record the key's error; previously loaded items stay visible.
    fn commit_failure(state: &mut StoreState, key: &RequestKey, error: StoredError) {
        match key {
            RequestKey::Bootstrap => {
                state.bootstrapping = false;
                state.bootstrapped = false;
                state.bootstrap_error = Some(error);
            }
            RequestKey::AppClients(config_id) => {
                state
                    .app_clients
                    .entry(config_id.clone())
                    .or_default()
                    .error = Some(error);
            }
            RequestKey::Providers(config_id, client_id) => {
                state
                    .providers
                    .entry((config_id.clone(), client_id.clone()))
                    .or_default()
                    .error = Some(error);
            }
        }
    }
}
