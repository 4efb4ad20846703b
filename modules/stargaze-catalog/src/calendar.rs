//! Calendar: the refresh-query-paginate cycle behind a catalog screen.
//!
//! Holds the current filter and page index. `load` refreshes the producers
//! and re-queries; `set_filter` and page moves work on what is already in
//! the store without touching the network, and `apply_filter` follows the
//! immediate re-query with a refresh cycle. Every new view is also
//! broadcast to subscribers, in the order the views were committed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use stargaze_common::{EventDetail, EventRecord, FilterSpec};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::PageError;
use crate::notices::{notices, Notice};
use crate::page::Paginator;
use crate::query::query;
use crate::store::{EventStore, RefreshReport};

/// What a catalog screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub filter: FilterSpec,
    pub events: Vec<EventRecord>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub notices: Vec<Notice>,
}

struct State {
    filter: FilterSpec,
    results: Vec<EventRecord>,
    page: usize,
}

pub struct Calendar {
    store: Arc<EventStore>,
    clock: Arc<dyn Clock>,
    paginator: Paginator,
    state: Mutex<State>,
    views: watch::Sender<CalendarView>,
}

impl Calendar {
    /// Starts with the all-wildcard filter over whatever the store holds.
    pub fn new(store: Arc<EventStore>, clock: Arc<dyn Clock>, paginator: Paginator) -> Self {
        let filter = FilterSpec::default();
        let union = store.current_union();
        let results: Vec<EventRecord> = query(&union, &filter, clock.now())
            .into_iter()
            .cloned()
            .collect();
        let state = State {
            filter,
            results,
            page: 0,
        };
        let view = render(&paginator, &state);
        let (views, _rx) = watch::channel(view);

        Self {
            store,
            clock,
            paginator,
            state: Mutex::new(state),
            views,
        }
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }

    pub fn filter(&self) -> FilterSpec {
        self.lock().filter
    }

    /// Receiver that sees every view this calendar produces.
    pub fn subscribe(&self) -> watch::Receiver<CalendarView> {
        self.views.subscribe()
    }

    /// The view for the current state.
    pub fn view(&self) -> CalendarView {
        render(&self.paginator, &self.lock())
    }

    /// Refresh both producers, then re-query and return to page 0.
    pub async fn load(&self) -> (CalendarView, RefreshReport) {
        let report = self.store.refresh_all().await;
        let view = self.requery(None);
        (view, report)
    }

    /// Re-query the store's current contents with `filter`. In-flight
    /// refreshes are left alone.
    pub fn set_filter(&self, filter: FilterSpec) -> CalendarView {
        debug!(?filter, "Filter changed");
        self.requery(Some(filter))
    }

    /// Filter change as a screen sees it: the re-queried view is broadcast
    /// right away, then a refresh cycle runs and its view is returned.
    pub async fn apply_filter(&self, filter: FilterSpec) -> (CalendarView, RefreshReport) {
        self.set_filter(filter);
        self.load().await
    }

    /// Jump to page `index`. Out-of-range indices leave the state alone.
    pub fn go_to_page(&self, index: usize) -> Result<CalendarView, PageError> {
        let mut state = self.lock();
        self.paginator.paginate(&state.results, index)?;
        state.page = index;
        let view = render(&self.paginator, &state);
        self.views.send_replace(view.clone());
        Ok(view)
    }

    /// No-op on the last page.
    pub fn next_page(&self) -> CalendarView {
        self.move_page(|state, paginator| {
            if (state.page + 1) * paginator.page_size() < state.results.len() {
                state.page += 1;
            }
        })
    }

    /// No-op on the first page.
    pub fn previous_page(&self) -> CalendarView {
        self.move_page(|state, _| {
            state.page = state.page.saturating_sub(1);
        })
    }

    /// Detail for the event with `id`, wherever the store finds it.
    pub fn select(&self, id: &str) -> Option<EventDetail> {
        self.store.get_by_id(id).map(|e| EventDetail::from(&e))
    }

    // The union is read and the view broadcast under the state lock.
    fn requery(&self, filter: Option<FilterSpec>) -> CalendarView {
        let mut state = self.lock();
        if let Some(filter) = filter {
            state.filter = filter;
        }
        let union = self.store.current_union();
        state.results = query(&union, &state.filter, self.clock.now())
            .into_iter()
            .cloned()
            .collect();
        state.page = 0;
        let view = render(&self.paginator, &state);
        self.views.send_replace(view.clone());
        view
    }

    fn move_page(&self, step: impl FnOnce(&mut State, &Paginator)) -> CalendarView {
        let mut state = self.lock();
        step(&mut state, &self.paginator);
        let view = render(&self.paginator, &state);
        self.views.send_replace(view.clone());
        view
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn render(paginator: &Paginator, state: &State) -> CalendarView {
    let page = paginator.clamp(&state.results, state.page);
    CalendarView {
        filter: state.filter,
        events: page.items.to_vec(),
        page_index: page.index,
        total_pages: page.total_pages,
        total_matches: page.total_items,
        has_previous: page.has_previous,
        has_next: page.has_next,
        notices: notices(&state.results),
    }
}

/// Run `load` now and then on every `interval` tick. Each cycle is its own
/// task, so a slow cycle does not delay the next one. The cycles belong to
/// the returned task: aborting it cancels any still in flight.
pub fn spawn_periodic(calendar: Arc<Calendar>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting periodic refresh");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut cycles = JoinSet::new();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let calendar = Arc::clone(&calendar);
                    cycles.spawn(async move {
                        let (view, report) = calendar.load().await;
                        info!(
                            %report,
                            matches = view.total_matches,
                            "Periodic refresh finished"
                        );
                    });
                }
                Some(done) = cycles.join_next(), if !cycles.is_empty() => {
                    if let Err(e) = done {
                        warn!(error = %e, "Periodic refresh task failed");
                    }
                }
            }
        }
    })
}
