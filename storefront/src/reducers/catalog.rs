//! Event catalog reducer.
//!
//! # Flow
//!
//! 1. `LoadCatalog` fetches all events from the backend
//! 2. `CatalogLoaded` replaces the list and resets to page 1
//! 3. `SearchChanged` / `PageChanged` recompute the visible set
//!    synchronously; filtering is entirely client-side over the fetched
//!    set, with no debounce and no further backend requests
//!
//! A failed fetch leaves the previously displayed list unchanged; the
//! failure is logged and the user's recourse is to reload.

use crate::actions::CatalogAction;
use crate::config::CatalogConfig;
use crate::environment::StorefrontEnvironment;
use crate::providers::{SessionStore, TicketingApi};
use crate::state::{CatalogState, clamp_page};
use prontoticket_core::effect::Effect;
use prontoticket_core::reducer::Reducer;
use prontoticket_core::{SmallVec, smallvec};

/// Event catalog reducer.
#[derive(Debug, Clone)]
pub struct CatalogReducer<A, S> {
    config: CatalogConfig,
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(A, S)>,
}

impl<A, S> CatalogReducer<A, S> {
    /// Create a catalog reducer with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(CatalogConfig::new())
    }

    /// Create a catalog reducer with the given configuration.
    #[must_use]
    pub const fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Events shown per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.config.page_size
    }
}

impl<A, S> Default for CatalogReducer<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Reducer for CatalogReducer<A, S>
where
    A: TicketingApi + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = StorefrontEnvironment<A, S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::LoadCatalog => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    match api.list_events().await {
                        Ok(events) => Some(CatalogAction::CatalogLoaded { events }),
                        Err(error) => Some(CatalogAction::CatalogLoadFailed {
                            error: error.to_string(),
                        }),
                    }
                })]
            },

            CatalogAction::CatalogLoaded { events } => {
                state.events = events;
                state.page = 1;
                smallvec![Effect::None]
            },

            CatalogAction::CatalogLoadFailed { error } => {
                // Previously displayed list stays; no user-facing retry.
                tracing::warn!(%error, "Event catalog fetch failed, keeping current list");
                smallvec![Effect::None]
            },

            CatalogAction::SearchChanged { term } => {
                state.search_term = term;
                state.page = 1;
                smallvec![Effect::None]
            },

            CatalogAction::PageChanged { page } => {
                let visible = state.visible(env.clock.now()).len();
                state.page = clamp_page(page, visible, self.config.page_size);
                smallvec![Effect::None]
            },
        }
    }
}
