//! Debounced search state for an interactive front end.
//!
//! The controller owns the text the user is typing, waits for it to settle,
//! runs one lookup per settled value and publishes the resulting state on a
//! `watch` channel. Lookups are never cancelled: when responses overlap,
//! whichever finishes last wins the result list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{MovieSummary, SearchCountRecord};
use crate::services::debounce::next_settled;
use crate::services::movie_service::{LookupOutcome, MovieService};

/// Everything a front end needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Raw text as last entered.
    pub query: String,
    /// Last value that survived the debounce window.
    pub settled_query: Option<String>,
    /// Lookups currently in flight.
    pub in_flight: usize,
    pub error_message: Option<String>,
    pub movies: Vec<MovieSummary>,
    pub trending: Vec<SearchCountRecord>,
}

impl QueryState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Collapses the state into what should be displayed. Loading wins over
    /// an error, which wins over results.
    #[must_use]
    pub fn view(&self) -> ViewState {
        if self.is_loading() {
            ViewState::Loading
        } else if let Some(message) = &self.error_message {
            ViewState::Error(message.clone())
        } else {
            ViewState::Loaded(self.movies.clone())
        }
    }

    fn apply(&mut self, outcome: LookupOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            LookupOutcome::Loaded { movies } => {
                self.movies = movies;
                self.error_message = None;
            }
            LookupOutcome::Failed { message } => {
                self.movies.clear();
                self.error_message = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error(String),
    Loaded(Vec<MovieSummary>),
}

pub struct QueryController {
    input: watch::Sender<String>,
    state: Arc<watch::Sender<QueryState>>,
    debounce_task: JoinHandle<()>,
}

impl QueryController {
    /// Starts the controller: loads the trending strip, runs the initial
    /// discover lookup, and begins debouncing input.
    pub fn spawn(service: MovieService, debounce: Duration, trending_limit: u64) -> Self {
        let (input, input_rx) = watch::channel(String::new());
        let (state_tx, _) = watch::channel(QueryState::default());
        let state = Arc::new(state_tx);

        Self::spawn_trending_load(&service, &state, trending_limit);
        Self::spawn_lookup(&service, &state, String::new());

        let debounce_task = tokio::spawn(Self::debounce_loop(
            service,
            state.clone(),
            input_rx,
            debounce,
        ));

        Self {
            input,
            state,
            debounce_task,
        }
    }

    /// Records a keystroke. Only the value left standing after the debounce
    /// window triggers a lookup.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.query.clone_from(&text));
        self.input.send_replace(text);
    }

    #[must_use]
    pub fn snapshot(&self) -> QueryState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.state.borrow().view()
    }

    /// Receiver that wakes on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Stops debouncing. Lookups already in flight still finish.
    pub fn shutdown(self) {
        self.debounce_task.abort();
    }

    async fn debounce_loop(
        service: MovieService,
        state: Arc<watch::Sender<QueryState>>,
        mut input_rx: watch::Receiver<String>,
        debounce: Duration,
    ) {
        // The initial empty query is looked up on start.
        let mut last_settled = String::new();

        while let Some(settled) = next_settled(&mut input_rx, debounce).await {
            if settled == last_settled {
                debug!(query = %settled, "Settled query unchanged, skipping lookup");
                continue;
            }

            last_settled.clone_from(&settled);
            Self::spawn_lookup(&service, &state, settled);
        }
    }

    fn spawn_lookup(service: &MovieService, state: &Arc<watch::Sender<QueryState>>, query: String) {
        state.send_modify(|s| {
            s.in_flight += 1;
            s.error_message = None;
            s.settled_query = Some(query.clone());
        });

        let service = service.clone();
        let state = state.clone();
        tokio::spawn(async move {
            let outcome = service.lookup(&query).await;
            state.send_modify(|s| s.apply(outcome));
        });
    }

    fn spawn_trending_load(
        service: &MovieService,
        state: &Arc<watch::Sender<QueryState>>,
        limit: u64,
    ) {
        let trending = service.trending().clone();
        let state = state.clone();
        tokio::spawn(async move {
            match trending.top_trending(limit).await {
                Ok(records) => state.send_modify(|s| s.trending = records),
                Err(e) => warn!("Error fetching trending movies: {}", e),
            }
        });
    }
}

impl Drop for QueryController {
    fn drop(&mut self) {
        self.debounce_task.abort();
    }
}
