//! Storefront environment.
//!
//! All external dependencies of the storefront reducers, injected as one
//! value. This replaces the original storefront's ambient session state
//! (window-scoped flags and broadcast events) with an explicit context
//! passed to everything that needs it.

use crate::providers::{SessionStore, TicketingApi};
use prontoticket_core::environment::Clock;
use std::sync::Arc;

/// Storefront environment.
///
/// # Type Parameters
///
/// - `A`: Backend ticketing API
/// - `S`: Session store
#[derive(Clone)]
pub struct StorefrontEnvironment<A, S>
where
    A: TicketingApi + Clone,
    S: SessionStore + Clone,
{
    /// Backend ticketing API.
    pub api: A,

    /// Persisted session store.
    pub sessions: S,

    /// Clock, injected for deterministic catalog filtering in tests.
    pub clock: Arc<dyn Clock>,
}

impl<A, S> StorefrontEnvironment<A, S>
where
    A: TicketingApi + Clone,
    S: SessionStore + Clone,
{
    /// Create a new storefront environment.
    #[must_use]
    pub fn new(api: A, sessions: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            sessions,
            clock,
        }
    }
}
