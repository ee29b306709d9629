use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::api::DoctorSearchApi;
use crate::constants::NEAR_END_THRESHOLD;
use crate::doctor::{DoctorRecord, RawDoctor};
use crate::error::ListingError;
use crate::filters::{FilterDimension, FilterState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded {
        page: usize,
        received: usize,
        exhausted: bool,
    },
    Failed(String),
    /// Nothing was requested: a fetch was in flight, the list is exhausted,
    /// or the scroll position was not near the end.
    Skipped,
    /// Filters changed while a fetch was in flight; that fetch reloads page 0.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_index: usize,
    pub page_size: usize,
}

/// What the presentation layer renders. Snapshots are copies.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    pub records: Vec<DoctorRecord>,
    pub exhausted: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub last_error: Option<String>,
}

impl ResultSet {
    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }
}

/// Scroll metrics of the rendered list, in any consistent unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub offset: u64,
    pub viewport: u64,
    pub content: u64,
}

impl ScrollPosition {
    pub fn remaining(&self) -> u64 {
        self.content
            .saturating_sub(self.offset.saturating_add(self.viewport))
    }

    pub fn is_near_end(&self) -> bool {
        self.remaining() <= NEAR_END_THRESHOLD
    }
}

struct ListingState {
    filters: FilterState,
    cursor: PageCursor,
    results: ResultSet,
    // Bumped on every filter mutation; responses tagged with an older value are stale.
    generation: u64,
    in_flight: bool,
}

impl ListingState {
    fn reset(&mut self) {
        self.generation += 1;
        self.cursor.page_index = 0;
        self.results.records.clear();
        self.results.exhausted = false;
        self.results.last_error = None;
        // The in-flight fetch will reload page 0, whatever it was fetching.
        if self.in_flight {
            self.results.is_loading_initial = true;
            self.results.is_loading_more = false;
        }
    }

    fn begin_loading(&mut self, mode: FetchMode) {
        self.results.last_error = None;
        self.results.is_loading_initial = mode == FetchMode::Replace;
        self.results.is_loading_more = mode == FetchMode::Append;
    }

    fn finish_loading(&mut self) {
        self.in_flight = false;
        self.results.is_loading_initial = false;
        self.results.is_loading_more = false;
    }

    fn apply_page(
        &mut self,
        page: usize,
        mode: FetchMode,
        result: Result<Vec<RawDoctor>, ListingError>,
    ) -> FetchOutcome {
        match result {
            Ok(raw) => {
                let received = raw.len();
                let records = raw.into_iter().map(DoctorRecord::from);
                match mode {
                    FetchMode::Replace => self.results.records = records.collect(),
                    FetchMode::Append => self.results.records.extend(records),
                }
                let exhausted = received < self.cursor.page_size;
                self.results.exhausted = exhausted;
                self.cursor.page_index = page;
                tracing::info!(
                    page,
                    received,
                    total = self.results.records.len(),
                    exhausted,
                    "loaded doctor page"
                );
                FetchOutcome::Loaded {
                    page,
                    received,
                    exhausted,
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(page, ?mode, "doctor page fetch failed: {message}");
                self.results.last_error = Some(message.clone());
                self.results.exhausted = true;
                FetchOutcome::Failed(message)
            }
        }
    }
}

/// Holds the in-flight flag for one fetch. Dropping it without `release`
/// (a cancelled fetch future) still clears the flag and the loading state.
struct InFlightGuard<'a> {
    state: &'a Mutex<ListingState>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(state: &'a Mutex<ListingState>) -> Option<Self> {
        let mut locked = lock(state);
        if locked.in_flight {
            return None;
        }
        locked.in_flight = true;
        Some(Self { state, armed: true })
    }

    fn release(mut self, locked: &mut ListingState) {
        locked.finish_loading();
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.state).finish_loading();
        }
    }
}

fn lock(state: &Mutex<ListingState>) -> MutexGuard<'_, ListingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turns filter selections into paginated doctor-search requests and
/// accumulates the results.
///
/// All methods take `&self`; share the controller behind an `Arc` to drive it
/// from several tasks. At most one search request is outstanding at a time.
pub struct ListingController<A> {
    api: A,
    state: Mutex<ListingState>,
}

impl<A: DoctorSearchApi> ListingController<A> {
    pub fn new(api: A, page_size: NonZeroUsize) -> Self {
        Self::with_filters(api, page_size, FilterState::default())
    }

    pub fn with_filters(api: A, page_size: NonZeroUsize, filters: FilterState) -> Self {
        Self {
            api,
            state: Mutex::new(ListingState {
                filters,
                cursor: PageCursor {
                    page_index: 0,
                    page_size: page_size.get(),
                },
                results: ResultSet::default(),
                generation: 0,
                in_flight: false,
            }),
        }
    }

    pub fn filters(&self) -> FilterState {
        lock(&self.state).filters.clone()
    }

    pub fn cursor(&self) -> PageCursor {
        lock(&self.state).cursor
    }

    pub fn results(&self) -> ResultSet {
        lock(&self.state).results.clone()
    }

    pub fn is_fetching(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Loads page 0 for the current filters, discarding anything shown.
    pub async fn load_initial(&self) -> FetchOutcome {
        self.reset_and_refetch(|_| Ok(()))
            .await
            .unwrap_or_else(|err| FetchOutcome::Failed(err.to_string()))
    }

    /// Toggles a checkbox option, or replaces the text of `location`/`search`.
    pub async fn set_filter(
        &self,
        dimension: &str,
        value: &str,
    ) -> Result<FetchOutcome, ListingError> {
        let dimension: FilterDimension = dimension.parse()?;
        self.update_filter(dimension, value).await
    }

    pub async fn update_filter(
        &self,
        dimension: FilterDimension,
        value: &str,
    ) -> Result<FetchOutcome, ListingError> {
        tracing::info!(%dimension, value, "filter changed");
        self.reset_and_refetch(|filters| filters.apply(dimension, value))
            .await
    }

    pub async fn clear_filters(&self) -> FetchOutcome {
        tracing::info!("filters cleared");
        self.reset_and_refetch(|filters| {
            *filters = FilterState::default();
            Ok(())
        })
        .await
        .unwrap_or_else(|err| FetchOutcome::Failed(err.to_string()))
    }

    async fn reset_and_refetch(
        &self,
        mutate: impl FnOnce(&mut FilterState) -> Result<(), ListingError>,
    ) -> Result<FetchOutcome, ListingError> {
        {
            let mut state = lock(&self.state);
            mutate(&mut state.filters)?;
            state.reset();
        }
        Ok(match self.fetch_page(0, FetchMode::Replace).await {
            FetchOutcome::Skipped => FetchOutcome::Deferred,
            outcome => outcome,
        })
    }

    /// Fetches one page. A no-op returning `Skipped` while another fetch is in flight.
    ///
    /// If the filters change before the response arrives, the response is
    /// dropped and page 0 is fetched for the new filters before the in-flight
    /// flag is released.
    pub async fn fetch_page(&self, page_index: usize, mode: FetchMode) -> FetchOutcome {
        let Some(guard) = InFlightGuard::acquire(&self.state) else {
            tracing::debug!(page_index, ?mode, "fetch already in flight; skipping");
            return FetchOutcome::Skipped;
        };

        let (mut page, mut mode) = (page_index, mode);
        loop {
            let (query, generation) = {
                let mut state = lock(&self.state);
                state.begin_loading(mode);
                (
                    state.filters.to_query(page, state.cursor.page_size),
                    state.generation,
                )
            };

            let result = self.api.search(&query).await;

            let mut state = lock(&self.state);
            if state.generation != generation {
                tracing::warn!(page, "discarding response for superseded filters");
                page = 0;
                mode = FetchMode::Replace;
                continue;
            }
            let outcome = state.apply_page(page, mode, result);
            guard.release(&mut state);
            return outcome;
        }
    }

    /// The presentation layer's "near the end of the list" signal.
    pub async fn notify_near_end(&self) -> FetchOutcome {
        let next_page = {
            let state = lock(&self.state);
            if state.in_flight || state.results.exhausted {
                tracing::debug!(
                    in_flight = state.in_flight,
                    exhausted = state.results.exhausted,
                    "ignoring near-end signal"
                );
                return FetchOutcome::Skipped;
            }
            state.cursor.page_index + 1
        };
        self.fetch_page(next_page, FetchMode::Append).await
    }

    pub async fn on_scroll(&self, position: ScrollPosition) -> FetchOutcome {
        if !position.is_near_end() {
            return FetchOutcome::Skipped;
        }
        self.notify_near_end().await
    }
}
