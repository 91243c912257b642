//! Two-step dependent fetch of a character and its homeworld
//!
//! Every `load` call gets a generation number. The loader publishes state on a
//! `tokio::sync::watch` channel and only accepts a result whose generation is still
//! the current one, so a slow superseded load can never overwrite a newer state.
//! Starting a load also cancels the previous in-flight load, which stops it at its
//! next await point.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{LoadFailure, LoadOutcome, LoadSnapshot, LoadState};
use crate::config::ApiConfig;
use crate::error::{Result, Subject};
use crate::identifier::CharacterId;
use crate::records::{Character, CharacterDetail, Homeworld};
use crate::transport::{Transport, fetch_record};

/// Owner and single writer of the detail [`LoadState`]
pub struct DetailLoader<T> {
    transport: Arc<T>,
    config:    ApiConfig,
    state:     watch::Sender<LoadSnapshot>,
    in_flight: Mutex<CancellationToken>,
}

impl<T> std::fmt::Debug for DetailLoader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailLoader")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Transport + 'static> DetailLoader<T> {
    /// Create an idle loader
    pub fn new(transport: Arc<T>, config: ApiConfig) -> Self {
        let (state, _) = watch::channel(LoadSnapshot::default());
        Self {
            transport,
            config,
            state,
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<LoadSnapshot> {
        self.state.subscribe()
    }

    /// State changes as a stream, starting with the current snapshot
    pub fn updates(&self) -> WatchStream<LoadSnapshot> {
        WatchStream::new(self.subscribe())
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> LoadSnapshot {
        self.state.borrow().clone()
    }

    /// Copy of the current state
    pub fn state(&self) -> LoadState {
        self.state.borrow().state.clone()
    }

    /// Load the character with the given identifier and its homeworld
    ///
    /// Moves the state to [`LoadState::Pending`] immediately, then to exactly one of
    /// [`LoadState::Failed`] or [`LoadState::Ready`], unless a newer call supersedes this
    /// one first. An absent or blank identifier fails without any request.
    pub async fn load<'a>(&self, identifier: impl Into<Option<&'a str>>) -> LoadOutcome {
        let identifier = identifier.into();
        let (generation, token) = self.begin(identifier);
        self.run(generation, token, identifier).await
    }

    /// Load on a background task
    ///
    /// The generation is claimed before the task is spawned, so call order decides
    /// which load wins regardless of how the runtime schedules the tasks.
    pub fn spawn_load(self: &Arc<Self>, identifier: Option<String>) -> JoinHandle<LoadOutcome> {
        let (generation, token) = self.begin(identifier.as_deref());
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.run(generation, token, identifier.as_deref()).await })
    }

    /// Follow an identifier source, loading every distinct value it publishes
    ///
    /// Nothing happens while the source has never held a value. Once it has, a change
    /// back to `None` is loaded like any other value and fails as missing input. The
    /// returned task ends when the source is dropped.
    pub fn follow(self: &Arc<Self>, mut ids: watch::Receiver<Option<String>>) -> JoinHandle<()> {
        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let mut current: Option<Option<String>> = None;
            loop {
                let next = ids.borrow_and_update().clone();
                let seen_value = current.is_some() || next.is_some();
                if seen_value && current.as_ref() != Some(&next) {
                    debug!("Identifier source changed to {next:?}");
                    current = Some(next.clone());
                    loader.spawn_load(next);
                }

                if ids.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Start a new generation: cancel the previous load and publish `Pending`
    fn begin(&self, identifier: Option<&str>) -> (u64, CancellationToken) {
        let token = CancellationToken::new();

        // Held across the publish so token order always matches generation order
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *in_flight, token.clone()).cancel();

        let mut generation = 0;
        self.state.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.identifier = identifier.map(str::to_string);
            snapshot.state = LoadState::Pending;
            generation = snapshot.generation;
        });
        drop(in_flight);

        debug!(generation, "Load started for {identifier:?}");
        (generation, token)
    }

    /// Fetch and commit the load that `begin` registered as `generation`
    async fn run(
        &self,
        generation: u64,
        token: CancellationToken,
        identifier: Option<&str>,
    ) -> LoadOutcome {
        let result = match CharacterId::parse(identifier) {
            Ok(id) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(generation, "Load of {id} superseded before completion");
                        return LoadOutcome::Superseded;
                    }
                    result = self.fetch_detail(&id) => result,
                }
            },
            Err(report) => Err(report),
        };

        let next = match result {
            Ok(detail) => {
                info!(generation, "Loaded {} from {}", detail.name(), detail.homeworld_name());
                LoadState::Ready(Arc::new(detail))
            },
            Err(report) => {
                warn!(generation, "Character load failed: {report:?}");
                LoadState::Failed(LoadFailure::from_error(report.current_context()))
            },
        };

        self.commit(generation, next)
    }

    /// Publish `next` if `generation` is still current
    fn commit(&self, generation: u64, next: LoadState) -> LoadOutcome {
        let mut outcome = LoadOutcome::Superseded;
        self.state.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.state = next;
            outcome = LoadOutcome::Applied(snapshot.state.clone());
            true
        });

        if outcome == LoadOutcome::Superseded {
            debug!(generation, "Discarded result of a stale load");
        }
        outcome
    }

    async fn fetch_detail(&self, id: &CharacterId) -> Result<CharacterDetail> {
        let character_url = self.config.character_url(id);
        let character: Character = fetch_record(
            self.transport.as_ref(),
            Subject::Character,
            &character_url,
            &id.describe(),
        )
        .await?;

        let homeworld_url = character.homeworld.clone();
        let homeworld: Homeworld = fetch_record(
            self.transport.as_ref(),
            Subject::Homeworld,
            &homeworld_url,
            &homeworld_url,
        )
        .await?;

        Ok(CharacterDetail::merge(character, homeworld))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use futures::future::join;

    use super::super::state::LoadStatus;
    use super::*;
    use crate::constants::MSG_UNEXPECTED_FAILURE;
    use crate::error::FailureKind;
    use crate::testing::{
        BASE_URL, ScriptedTransport, character_body, character_url, planet_url, script_character,
    };
    use crate::transport::{FetchResponse, TransportError};

    fn loader(transport: &Arc<ScriptedTransport>) -> Arc<DetailLoader<ScriptedTransport>> {
        Arc::new(DetailLoader::new(
            Arc::clone(transport),
            ApiConfig::new(BASE_URL).unwrap(),
        ))
    }

    fn failure_reason(outcome: &LoadOutcome) -> String {
        match outcome {
            LoadOutcome::Applied(LoadState::Failed(failure)) => failure.reason().to_string(),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let transport = Arc::new(ScriptedTransport::new());
        let loader = loader(&transport);

        assert_eq!(loader.state(), LoadState::Idle);
        assert_eq!(loader.snapshot().generation, 0);
    }

    #[tokio::test]
    async fn test_load_merges_character_and_homeworld() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "1", "Luke Skywalker", "1", "Tatooine");
        let loader = loader(&transport);

        let outcome = loader.load("1").await;

        let Some(LoadState::Ready(detail)) = outcome.state() else {
            panic!("expected ready, got {outcome:?}");
        };
        assert_eq!(detail.name(), "Luke Skywalker");
        assert_eq!(detail.homeworld_name(), "Tatooine");
        assert_eq!(loader.state(), LoadState::Ready(Arc::clone(detail)));
        assert_eq!(transport.calls(), vec![character_url("1"), planet_url("1")]);
    }

    #[tokio::test]
    async fn test_missing_identifier_fails_without_requests() {
        let transport = Arc::new(ScriptedTransport::new());
        let loader = loader(&transport);

        for identifier in [None, Some(""), Some("  ")] {
            let outcome = loader.load(identifier).await;
            assert_eq!(failure_reason(&outcome), "no identifier provided");
        }
        assert!(transport.calls().is_empty());
        assert_eq!(
            loader.state().failure().map(LoadFailure::kind),
            Some(FailureKind::MissingInput)
        );
    }

    #[tokio::test]
    async fn test_primary_rejection_names_status_and_identifier() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(&character_url("999"), FetchResponse::new(404, "Not Found", ""));
        let loader = loader(&transport);

        let reason = failure_reason(&loader.load("999").await);

        assert!(reason.contains("404"));
        assert!(reason.contains("Not Found"));
        assert!(reason.contains("999"));
        assert_eq!(transport.calls(), vec![character_url("999")]);
    }

    #[tokio::test]
    async fn test_primary_connectivity_fault() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(&character_url("1"), TransportError::Connectivity);
        let loader = loader(&transport);

        let outcome = loader.load("1").await;

        assert!(failure_reason(&outcome).contains("unreachable"));
        assert_eq!(
            loader.state().failure().map(LoadFailure::kind),
            Some(FailureKind::ConnectivityFault)
        );
    }

    #[tokio::test]
    async fn test_unparseable_primary_is_unexpected_fault() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(&character_url("1"), FetchResponse::ok(r#"{"detail":"nope"}"#));
        let loader = loader(&transport);

        let outcome = loader.load("1").await;

        assert_eq!(
            failure_reason(&outcome),
            "unexpected error occurred while loading character data"
        );
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_homeworld_rejection_references_homeworld_url() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &character_url("1"),
            FetchResponse::ok(character_body("Luke Skywalker", &planet_url("1"), &[])),
        );
        transport.respond(&planet_url("1"), FetchResponse::new(500, "Internal Server Error", ""));
        let loader = loader(&transport);

        let reason = failure_reason(&loader.load("1").await);

        assert!(reason.contains("homeworld data"));
        assert!(reason.contains(&planet_url("1")));
        assert!(reason.contains("500"));
        assert!(loader.state().detail().is_none());
    }

    #[tokio::test]
    async fn test_homeworld_connectivity_fault() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &character_url("1"),
            FetchResponse::ok(character_body("Luke Skywalker", &planet_url("1"), &[])),
        );
        transport.fail(&planet_url("1"), TransportError::Connectivity);
        let loader = loader(&transport);

        let reason = failure_reason(&loader.load("1").await);

        assert!(reason.contains("homeworld data"));
        assert!(reason.contains(&planet_url("1")));
        assert!(reason.contains("unreachable"));
    }

    #[tokio::test]
    async fn test_newer_load_wins_when_older_resolves_last() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "Y", "Yoda", "5", "Dagobah");
        script_character(&transport, "X", "Han Solo", "22", "Corellia");
        let gate = transport.hold(&character_url("Y"));
        let loader = loader(&transport);

        let older = loader.spawn_load(Some("Y".to_string()));
        tokio::task::yield_now().await;
        while transport.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let newer = loader.load("X").await;
        gate.notify_one();
        let older = older.await.unwrap();

        assert_eq!(older, LoadOutcome::Superseded);
        assert_eq!(
            newer.state().and_then(LoadState::detail).map(CharacterDetail::name),
            Some("Han Solo")
        );
        assert_eq!(loader.state().detail().map(CharacterDetail::name), Some("Han Solo"));
        assert_eq!(loader.snapshot().identifier.as_deref(), Some("X"));
        // The superseded load never reached its homeworld step
        assert!(!transport.calls().contains(&planet_url("5")));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded_at_commit() {
        let transport = Arc::new(ScriptedTransport::new());
        let loader = loader(&transport);

        let (stale, _) = loader.begin(Some("Y"));
        let (current, _) = loader.begin(Some("X"));

        let outcome = loader.commit(
            stale,
            LoadState::Failed(LoadFailure::from_error(&crate::error::Error::MissingIdentifier)),
        );
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(loader.state(), LoadState::Pending);

        let outcome = loader.commit(current, LoadState::Idle);
        assert_eq!(outcome, LoadOutcome::Applied(LoadState::Idle));
    }

    #[tokio::test]
    async fn test_repeated_load_is_idempotent() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "1", "Luke Skywalker", "1", "Tatooine");
        transport.respond(&character_url("2"), FetchResponse::new(404, "Not Found", ""));
        let loader = loader(&transport);

        let first = loader.load("1").await;
        let second = loader.load("1").await;
        assert_eq!(first, second);

        let first = loader.load("2").await;
        let second = loader.load("2").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_subscribers_see_pending_then_terminal() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "1", "Luke Skywalker", "1", "Tatooine");
        let gate = transport.hold(&planet_url("1"));
        let loader = loader(&transport);
        let mut updates = loader.subscribe();

        let observe = async {
            updates.changed().await.unwrap();
            let pending = updates.borrow_and_update().state.clone();
            gate.notify_one();
            updates.changed().await.unwrap();
            let done = updates.borrow_and_update().state.clone();
            (pending, done)
        };
        let ((pending, done), outcome) = join(observe, loader.load("1")).await;

        assert_eq!(pending, LoadState::Pending);
        assert_eq!(done.status(), LoadStatus::Ready);
        assert_eq!(outcome.state(), Some(&done));
    }

    #[tokio::test]
    async fn test_follow_loads_each_distinct_identifier() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "1", "Luke Skywalker", "1", "Tatooine");
        script_character(&transport, "4", "Darth Vader", "1", "Tatooine");
        let loader = loader(&transport);
        let mut updates = loader.subscribe();

        let (route, ids) = watch::channel(None::<String>);
        let follower = loader.follow(ids);

        route.send_replace(Some("1".to_string()));
        updates
            .wait_for(|s| s.state.detail().is_some_and(|d| d.name() == "Luke Skywalker"))
            .await
            .unwrap();

        // Re-sending the same value does not trigger another load
        route.send_replace(Some("1".to_string()));
        route.send_replace(Some("4".to_string()));
        updates
            .wait_for(|s| s.state.detail().is_some_and(|d| d.name() == "Darth Vader"))
            .await
            .unwrap();

        assert_eq!(loader.snapshot().generation, 2);

        drop(route);
        follower.await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_homeworld_is_unexpected_fault() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &character_url("1"),
            FetchResponse::ok(character_body("Luke Skywalker", &planet_url("1"), &[])),
        );
        transport.respond(&planet_url("1"), FetchResponse::ok(r#"{"count": 60}"#));
        let loader = loader(&transport);

        let outcome = loader.load("1").await;

        assert_eq!(failure_reason(&outcome), MSG_UNEXPECTED_FAILURE);
        assert_eq!(
            loader.state().failure().map(LoadFailure::kind),
            Some(FailureKind::UnexpectedFault)
        );
        assert!(loader.state().detail().is_none());
        assert_eq!(transport.calls(), vec![character_url("1"), planet_url("1")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_last_spawned_load_wins_on_worker_thread() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "Y", "Yoda", "5", "Dagobah");
        script_character(&transport, "X", "Han Solo", "22", "Corellia");
        let loader = loader(&transport);

        // Spawned from a worker so the runtime's LIFO slot favours the later task
        let spawner = Arc::clone(&loader);
        let (older, newer) = tokio::spawn(async move {
            let older = spawner.spawn_load(Some("Y".to_string()));
            let newer = spawner.spawn_load(Some("X".to_string()));
            (older.await.unwrap(), newer.await.unwrap())
        })
        .await
        .unwrap();

        assert_eq!(older, LoadOutcome::Superseded);
        assert_eq!(
            newer.state().and_then(LoadState::detail).map(CharacterDetail::name),
            Some("Han Solo")
        );
        let snapshot = loader.snapshot();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.identifier.as_deref(), Some("X"));
        assert_eq!(snapshot.state.detail().map(CharacterDetail::name), Some("Han Solo"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_follow_settles_on_last_route_value() {
        let transport = Arc::new(ScriptedTransport::new());
        script_character(&transport, "1", "Luke Skywalker", "1", "Tatooine");
        script_character(&transport, "4", "Darth Vader", "1", "Tatooine");
        let gate = transport.hold(&character_url("1"));
        let loader = loader(&transport);
        let mut updates = loader.subscribe();

        let (route, ids) = watch::channel(None::<String>);
        let follower = loader.follow(ids);

        route.send_replace(Some("1".to_string()));
        route.send_replace(Some("4".to_string()));
        updates
            .wait_for(|s| s.state.detail().is_some_and(|d| d.name() == "Darth Vader"))
            .await
            .unwrap();

        // Releasing the older route value must not change the outcome
        gate.notify_one();
        drop(route);
        follower.await.unwrap();

        let snapshot = loader.snapshot();
        assert_eq!(snapshot.identifier.as_deref(), Some("4"));
        assert_eq!(snapshot.state.detail().map(CharacterDetail::name), Some("Darth Vader"));
    }
}
