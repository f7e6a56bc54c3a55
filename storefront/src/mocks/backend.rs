//! Mock ticketing API for testing.

use crate::error::{Result, StorefrontError};
use crate::providers::TicketingApi;
use prontoticket_backend::{
    BackendError, ConfirmationId, Event, EventId, PaymentRequest, RedirectTarget, TicketType,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build the backend error used for scripted mock failures.
fn scripted_failure(message: &str) -> StorefrontError {
    StorefrontError::Backend(BackendError::Status {
        status: 500,
        message: message.to_string(),
    })
}

fn lock_failure() -> StorefrontError {
    StorefrontError::Backend(BackendError::Transport("mock lock poisoned".to_string()))
}

struct Inner {
    catalog: Mutex<Result<Vec<Event>>>,
    events: Mutex<HashMap<EventId, Event>>,
    ticket_types: Mutex<HashMap<EventId, Vec<TicketType>>>,
    /// Raw payment-link response body; parsed like the real client parses it.
    payment_body: Mutex<Result<String>>,
    payment_delay: Mutex<Option<Duration>>,
    generated: Mutex<Result<usize>>,
    payment_link_calls: AtomicUsize,
    generate_calls: AtomicUsize,
}

/// Mock ticketing API.
///
/// Responses are scripted with the `with_*` / `failing_*` builders; the
/// payment-link "body" goes through the same [`RedirectTarget`] parsing as
/// the real client, so both response shapes (bare URL, `stripeLink` JSON)
/// can be exercised. Call counters make the single-in-flight-request
/// invariant observable.
#[derive(Clone)]
pub struct MockTicketingApi {
    inner: Arc<Inner>,
}

impl MockTicketingApi {
    /// Create a mock with benign defaults: an empty catalog, a valid
    /// payment link, and one generated ticket.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog: Mutex::new(Ok(Vec::new())),
                events: Mutex::new(HashMap::new()),
                ticket_types: Mutex::new(HashMap::new()),
                payment_body: Mutex::new(Ok("https://pay.example/mock".to_string())),
                payment_delay: Mutex::new(None),
                generated: Mutex::new(Ok(1)),
                payment_link_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Script the catalog response.
    #[must_use]
    pub fn with_catalog(self, events: Vec<Event>) -> Self {
        if let Ok(mut catalog) = self.inner.catalog.lock() {
            *catalog = Ok(events);
        }
        self
    }

    /// Make the catalog fetch fail.
    #[must_use]
    pub fn failing_catalog(self, message: &str) -> Self {
        if let Ok(mut catalog) = self.inner.catalog.lock() {
            *catalog = Err(scripted_failure(message));
        }
        self
    }

    /// Register an event and its ticket types for checkout loading.
    #[must_use]
    pub fn with_event(self, event: Event, ticket_types: Vec<TicketType>) -> Self {
        if let Ok(mut events) = self.inner.events.lock() {
            events.insert(event.id, event.clone());
        }
        if let Ok(mut types) = self.inner.ticket_types.lock() {
            types.insert(event.id, ticket_types);
        }
        self
    }

    /// Script the raw payment-link response body.
    #[must_use]
    pub fn with_payment_body(self, body: &str) -> Self {
        if let Ok(mut payment) = self.inner.payment_body.lock() {
            *payment = Ok(body.to_string());
        }
        self
    }

    /// Make the payment-link request fail.
    #[must_use]
    pub fn failing_payment_link(self, message: &str) -> Self {
        if let Ok(mut payment) = self.inner.payment_body.lock() {
            *payment = Err(scripted_failure(message));
        }
        self
    }

    /// Delay the next payment-link response, keeping that request
    /// observably in flight.
    #[must_use]
    pub fn with_payment_delay(self, delay: Duration) -> Self {
        if let Ok(mut slot) = self.inner.payment_delay.lock() {
            *slot = Some(delay);
        }
        self
    }

    /// Script the number of generated tickets.
    #[must_use]
    pub fn with_generated(self, count: usize) -> Self {
        if let Ok(mut generated) = self.inner.generated.lock() {
            *generated = Ok(count);
        }
        self
    }

    /// Make ticket generation fail.
    #[must_use]
    pub fn failing_generation(self, message: &str) -> Self {
        if let Ok(mut generated) = self.inner.generated.lock() {
            *generated = Err(scripted_failure(message));
        }
        self
    }

    /// Number of payment-link requests issued.
    #[must_use]
    pub fn payment_link_calls(&self) -> usize {
        self.inner.payment_link_calls.load(Ordering::SeqCst)
    }

    /// Number of ticket-generation requests issued.
    #[must_use]
    pub fn generate_calls(&self) -> usize {
        self.inner.generate_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTicketingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketingApi for MockTicketingApi {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner
                .catalog
                .lock()
                .map_err(|_| lock_failure())?
                .clone()
        }
    }

    fn get_event(&self, id: EventId) -> impl Future<Output = Result<Event>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner
                .events
                .lock()
                .map_err(|_| lock_failure())?
                .get(&id)
                .cloned()
                .ok_or_else(|| {
                    StorefrontError::Backend(BackendError::Status {
                        status: 404,
                        message: format!("event {id} not found"),
                    })
                })
        }
    }

    fn list_ticket_types(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<TicketType>>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            Ok(inner
                .ticket_types
                .lock()
                .map_err(|_| lock_failure())?
                .get(&event_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn create_payment_link(
        &self,
        _request: &PaymentRequest,
    ) -> impl Future<Output = Result<RedirectTarget>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.payment_link_calls.fetch_add(1, Ordering::SeqCst);

            let delay = inner
                .payment_delay
                .lock()
                .map_err(|_| lock_failure())?
                .take();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let body = inner
                .payment_body
                .lock()
                .map_err(|_| lock_failure())?
                .clone()?;
            Ok(RedirectTarget::parse(&body)?)
        }
    }

    fn generate_tickets(
        &self,
        _confirmation: &ConfirmationId,
    ) -> impl Future<Output = Result<usize>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.generate_calls.fetch_add(1, Ordering::SeqCst);
            inner.generated.lock().map_err(|_| lock_failure())?.clone()
        }
    }
}
