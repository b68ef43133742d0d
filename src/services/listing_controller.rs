// src/services/listing_controller.rs
//
// Paginated Listing Controller
//
// Presents the catalog as successive fixed-size pages for one view.
//
// CRITICAL RULES:
// - At most one fetch in flight per controller; load_more is a no-op otherwise
// - Page size is fixed for the lifetime of the controller
// - A failed fetch never discards accumulated products
// - Completions after detach() or after a newer reset are dropped
// - A changing total is taken as reported; nothing is truncated
// - No connection yet is a pending phase, never an error
//
// The controller is owned by one view and never shared between views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::application::session::Session;
use crate::cache::{with_deadline, QueryPolicy};
use crate::config::{StorefrontConfig, DEFAULT_PAGE_SIZE};
use crate::domain::{PaginatedProducts, Product};
use crate::error::{AppError, AppResult};
use crate::integrations::CatalogBackend;

/// Which products a listing shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingFilter {
    /// Whole catalog, paginated remotely
    #[default]
    All,
    /// One category, fetched once per reset and windowed locally
    Category(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Empty,
    Loading,
    Ready,
    LoadingMore,
    /// Waiting for a session connection; accumulated products are kept
    NotReady,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    More,
}

/// What a fetch brought back from the remote
enum Fetched {
    Page(PaginatedProducts),
    /// Every product of the filtered category
    Category(Arc<Vec<Product>>),
}

/// Point-in-time copy of a listing for rendering
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub filter: ListingFilter,
    pub products: Vec<Product>,
    pub total: u64,
    pub phase: ListingPhase,
    pub error: Option<AppError>,
}

impl ListingSnapshot {
    pub fn has_more(&self) -> bool {
        (self.products.len() as u64) < self.total
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ListingPhase::Loading | ListingPhase::LoadingMore)
    }
}

struct ListingState {
    filter: ListingFilter,
    products: Vec<Product>,
    total: u64,
    phase: ListingPhase,
    error: Option<AppError>,
    failed: Option<FetchKind>,
    /// Full product list of a category filter, held until the next reset
    category: Option<Arc<Vec<Product>>>,
    /// Bumped by every reset; completions carrying an older epoch are dropped
    epoch: u64,
}

impl ListingState {
    fn new(filter: ListingFilter) -> Self {
        Self {
            filter,
            products: Vec::new(),
            total: 0,
            phase: ListingPhase::Empty,
            error: None,
            failed: None,
            category: None,
            epoch: 0,
        }
    }

    fn has_more(&self) -> bool {
        (self.products.len() as u64) < self.total
    }
}

pub struct ListingController {
    session: Arc<Session>,
    page_size: u64,
    policy: QueryPolicy,
    state: Mutex<ListingState>,
    alive: AtomicBool,
}

impl ListingController {
    pub fn new(session: Arc<Session>, filter: ListingFilter) -> Self {
        Self::with_options(session, filter, DEFAULT_PAGE_SIZE, QueryPolicy::default())
    }

    /// `page_size` of zero is treated as one
    pub fn with_options(
        session: Arc<Session>,
        filter: ListingFilter,
        page_size: u64,
        policy: QueryPolicy,
    ) -> Self {
        Self {
            session,
            page_size: page_size.max(1),
            policy,
            state: Mutex::new(ListingState::new(filter)),
            alive: AtomicBool::new(true),
        }
    }

    pub fn from_config(
        session: Arc<Session>,
        filter: ListingFilter,
        config: &StorefrontConfig,
    ) -> Self {
        Self::with_options(
            session,
            filter,
            config.page_size,
            QueryPolicy {
                timeout: config.request_timeout,
                read_retries: config.read_retries,
            },
        )
    }

    fn lock(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        let state = self.lock();
        ListingSnapshot {
            filter: state.filter.clone(),
            products: state.products.clone(),
            total: state.total,
            phase: state.phase,
            error: state.error.clone(),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn total(&self) -> u64 {
        self.lock().total
    }

    pub fn phase(&self) -> ListingPhase {
        self.lock().phase
    }

    pub fn error(&self) -> Option<AppError> {
        self.lock().error.clone()
    }

    pub fn filter(&self) -> ListingFilter {
        self.lock().filter.clone()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// The owning view is gone; pending completions will be ignored.
    pub fn detach(&self) {
        self.alive.store(false, Ordering::SeqCst);
        log::debug!("listing detached");
    }

    /// Discard everything and fetch the first page. Returns false only when
    /// the controller is detached.
    pub async fn reset(&self) -> bool {
        let (epoch, filter) = {
            let mut state = self.lock();
            if !self.is_alive() {
                return false;
            }
            state.epoch += 1;
            state.products.clear();
            state.total = 0;
            state.phase = ListingPhase::Loading;
            state.error = None;
            state.failed = None;
            state.category = None;
            (state.epoch, state.filter.clone())
        };

        let outcome = self.fetch(&filter, 0).await;
        self.apply(epoch, FetchKind::Initial, outcome);
        true
    }

    /// Explicit refresh action; same as `reset`.
    pub async fn refresh(&self) -> bool {
        self.reset().await
    }

    /// Fetch the next page. A no-op (returns false) unless the listing is
    /// Ready with more products to load.
    pub async fn load_more(&self) -> bool {
        self.fetch_next(ListingPhase::Ready).await
    }

    /// Re-issue whatever failed or was waiting for a connection: a next
    /// page is fetched again at the same offset, a first page resets.
    /// No-op outside Error and NotReady.
    pub async fn retry(&self) -> bool {
        let (phase, failed) = {
            let state = self.lock();
            match state.phase {
                ListingPhase::Error | ListingPhase::NotReady => (state.phase, state.failed),
                _ => (state.phase, None),
            }
        };
        match failed {
            Some(FetchKind::More) => self.fetch_next(phase).await,
            Some(FetchKind::Initial) => self.reset().await,
            None => false,
        }
    }

    /// Switch filters; the old accumulation is dropped, never re-filtered.
    pub async fn set_filter(&self, filter: ListingFilter) -> bool {
        {
            let mut state = self.lock();
            let epoch = state.epoch;
            *state = ListingState::new(filter);
            state.epoch = epoch;
        }
        self.reset().await
    }

    pub fn spawn_reset(self: &Arc<Self>) -> JoinHandle<bool> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.reset().await })
    }

    pub fn spawn_load_more(self: &Arc<Self>) -> JoinHandle<bool> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.load_more().await })
    }

    async fn fetch_next(&self, from: ListingPhase) -> bool {
        let (epoch, filter, offset, held) = {
            let mut state = self.lock();
            if !self.is_alive() || state.phase != from {
                return false;
            }
            if from == ListingPhase::Ready && !state.has_more() {
                log::debug!("listing exhausted at {} of {}", state.products.len(), state.total);
                return false;
            }
            state.phase = ListingPhase::LoadingMore;
            state.error = None;
            (
                state.epoch,
                state.filter.clone(),
                state.products.len() as u64,
                state.category.clone(),
            )
        };

        let outcome = match held {
            Some(products) => Ok(Fetched::Category(products)),
            None => self.fetch(&filter, offset).await,
        };
        self.apply(epoch, FetchKind::More, outcome);
        true
    }

    async fn fetch(&self, filter: &ListingFilter, offset: u64) -> AppResult<Fetched> {
        let backend = self.session.backend()?;
        let mut attempt = 0;
        loop {
            let request = fetch_source(backend.as_ref(), filter, offset, self.page_size);
            match with_deadline(self.policy.timeout, request).await {
                Err(error) if attempt < self.policy.read_retries && error.is_retryable() => {
                    attempt += 1;
                    log::warn!("listing page at {} failed ({}), retrying", offset, error);
                }
                outcome => return outcome,
            }
        }
    }

    fn apply(&self, epoch: u64, kind: FetchKind, outcome: AppResult<Fetched>) {
        let mut state = self.lock();
        if !self.is_alive() {
            log::debug!("listing detached, dropping completed fetch");
            return;
        }
        if state.epoch != epoch {
            log::debug!("listing reset while fetching, dropping stale page");
            return;
        }

        match outcome {
            Ok(fetched) => {
                let page = match fetched {
                    Fetched::Page(page) => page,
                    Fetched::Category(products) => {
                        let offset = match kind {
                            FetchKind::Initial => 0,
                            FetchKind::More => state.products.len(),
                        };
                        let page = window(&products, offset, self.page_size);
                        state.category = Some(products);
                        page
                    }
                };
                match kind {
                    FetchKind::Initial => state.products = page.products,
                    FetchKind::More => state.products.extend(page.products),
                }
                state.total = page.total;
                state.phase = ListingPhase::Ready;
                state.error = None;
                state.failed = None;
            }
            Err(AppError::NotReady) => {
                log::debug!("listing waiting for a connection");
                state.phase = ListingPhase::NotReady;
                state.error = None;
                state.failed = Some(kind);
            }
            Err(error) => {
                log::warn!("listing fetch failed: {}", error);
                state.phase = ListingPhase::Error;
                state.error = Some(error);
                state.failed = Some(kind);
            }
        }
    }
}

async fn fetch_source(
    backend: &dyn CatalogBackend,
    filter: &ListingFilter,
    offset: u64,
    limit: u64,
) -> AppResult<Fetched> {
    match filter {
        ListingFilter::All => backend.list_products(offset, limit).await.map(Fetched::Page),
        ListingFilter::Category(category) => backend
            .get_products(Some(category.clone()))
            .await
            .map(|products| Fetched::Category(Arc::new(products))),
    }
}

/// One page of a locally held category list
fn window(products: &[Product], offset: usize, limit: u64) -> PaginatedProducts {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    PaginatedProducts {
        products: products.iter().skip(offset).take(limit).cloned().collect(),
        total: products.len() as u64,
    }
}
